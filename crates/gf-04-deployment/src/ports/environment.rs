//! # Environment Port
//!
//! The explicit handle to the ephemeral execution environment. Every
//! orchestration step receives it by reference; nothing reaches the node
//! any other way.
//!
//! Mutating calls return only once the node has confirmed them, so a
//! caller that awaits each call in turn gets strictly sequential effects.

use async_trait::async_trait;
use shared_types::{Address, Bytes, Hash, U256};

use crate::domain::entities::{Receipt, Transaction};
use crate::domain::errors::EnvironmentError;

#[async_trait]
pub trait Environment: Send + Sync {
    /// Chain id reported by the node.
    async fn chain_id(&self) -> Result<u64, EnvironmentError>;

    /// Unlocked dev accounts; the first one signs deployments.
    async fn accounts(&self) -> Result<Vec<Address>, EnvironmentError>;

    /// Native balance of an account.
    async fn balance(&self, address: Address) -> Result<U256, EnvironmentError>;

    /// Overwrites a native balance.
    async fn set_balance(&self, address: Address, balance: U256) -> Result<(), EnvironmentError>;

    /// Overwrites an account's code.
    async fn set_code(&self, address: Address, code: Bytes) -> Result<(), EnvironmentError>;

    /// Overwrites one storage slot.
    async fn set_storage_at(
        &self,
        address: Address,
        slot: Hash,
        value: Hash,
    ) -> Result<(), EnvironmentError>;

    /// Sends a transaction and waits for a successful receipt.
    async fn send(&self, tx: Transaction) -> Result<Receipt, EnvironmentError>;

    /// Read-only call against the latest state.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, EnvironmentError>;

    /// Full state as `0x` hex of gzip-compressed JSON.
    async fn dump_state(&self) -> Result<String, EnvironmentError>;

    /// Creates a contract and returns its address.
    async fn deploy(
        &self,
        from: Address,
        init_code: Bytes,
        value: U256,
    ) -> Result<Address, EnvironmentError> {
        let receipt = self.send(Transaction::create(from, init_code, value)).await?;
        receipt
            .contract_address
            .ok_or(EnvironmentError::NoContractAddress(receipt.tx_hash))
    }
}
