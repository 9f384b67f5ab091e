//! # Domain Entities

use serde::{Deserialize, Serialize};
use shared_types::{Address, Bytes, DeployedContract, Hash, U256};

/// A transaction sent from an unlocked or impersonated account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub from: Address,
    /// `None` creates a contract.
    pub to: Option<Address>,
    pub data: Bytes,
    pub value: U256,
}

impl Transaction {
    /// A call to `to` with no value attached.
    #[must_use]
    pub fn call(from: Address, to: Address, data: Bytes) -> Self {
        Self {
            from,
            to: Some(to),
            data,
            value: U256::zero(),
        }
    }

    /// A plain value transfer.
    #[must_use]
    pub fn transfer(from: Address, to: Address, value: U256) -> Self {
        Self {
            from,
            to: Some(to),
            data: Bytes::new(),
            value,
        }
    }

    /// A contract creation.
    #[must_use]
    pub fn create(from: Address, init_code: Bytes, value: U256) -> Self {
        Self {
            from,
            to: None,
            data: init_code,
            value,
        }
    }

    /// First four bytes of the calldata, if any.
    #[must_use]
    pub fn selector(&self) -> Option<[u8; 4]> {
        self.data.0.get(..4).and_then(|s| s.try_into().ok())
    }
}

/// The confirmed outcome of a successful transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: Hash,
    pub contract_address: Option<Address>,
}

/// Everything the later pipeline stages need from a deployment run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentReport {
    /// Account that deployed and initialized the contracts.
    pub signer: Address,
    /// One entry per logical contract, in deployment order.
    pub contracts: Vec<DeployedContract>,
}
