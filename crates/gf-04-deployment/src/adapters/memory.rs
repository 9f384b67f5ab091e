//! # In-Memory Environment
//!
//! Deterministic stand-in for the dev node. It does not execute bytecode:
//!
//! - contract creation stores the init code as the account's code at the
//!   CREATE address a real node would pick
//! - value transfers move native balance and fail on insufficient funds
//! - read-only calls return a programmed result, or a zero word
//! - every port call is journaled, so tests can assert on exactly what
//!   the orchestrator asked for

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use parking_lot::Mutex;
use sha3::{Digest, Keccak256};
use shared_types::{ether_to_wei, Address, Bytes, Hash, U256};

use gf_03_state_capture::{encode_dump, DumpAccount, StateDump};

use crate::domain::create::compute_contract_address;
use crate::domain::entities::{Receipt, Transaction};
use crate::domain::errors::EnvironmentError;
use crate::ports::environment::Environment;

/// Default dev accounts, in node order.
const DEV_ACCOUNTS: [&str; 5] = [
    "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
    "0x70997970c51812dc3a010c7d01b50e0d17dc79c8",
    "0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc",
    "0x90f79bf6eb2c4f870365e785982e1f101e93b906",
    "0x15d34aaf54267db7d7c367839aaf71a00a2c6a65",
];

/// Balance of each dev account at startup, in ether.
const DEV_BALANCE_ETHER: u64 = 10_000;

/// One recorded port call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentCall {
    ChainId,
    Accounts,
    Balance(Address),
    SetBalance(Address, U256),
    SetCode(Address),
    SetStorageAt(Address, Hash),
    Send(Transaction),
    Call(Address, Bytes),
    DumpState,
}

#[derive(Debug, Default)]
struct MemoryState {
    accounts: BTreeMap<Address, DumpAccount>,
    journal: Vec<EnvironmentCall>,
    results_by_data: HashMap<(Address, Vec<u8>), Bytes>,
    results_by_selector: HashMap<(Address, [u8; 4]), Bytes>,
    failures: HashMap<[u8; 4], String>,
    omitted: BTreeSet<Address>,
    block_number: u64,
    tx_count: u64,
}

impl MemoryState {
    fn account(&mut self, address: Address) -> &mut DumpAccount {
        self.accounts.entry(address).or_default()
    }

    fn balance(&self, address: &Address) -> U256 {
        self.accounts
            .get(address)
            .map(|account| account.balance)
            .unwrap_or_default()
    }

    fn check_failure(&self, data: &Bytes) -> Result<(), EnvironmentError> {
        let selector: Option<[u8; 4]> = data.0.get(..4).and_then(|s| s.try_into().ok());
        match selector.and_then(|s| self.failures.get(&s)) {
            Some(reason) => Err(EnvironmentError::Injected(reason.clone())),
            None => Ok(()),
        }
    }

    fn next_tx_hash(&mut self, tx: &Transaction) -> Hash {
        self.tx_count += 1;
        let mut hasher = Keccak256::new();
        hasher.update(self.tx_count.to_be_bytes());
        hasher.update(tx.from.as_bytes());
        hasher.update(tx.data.as_slice());
        Hash::new(hasher.finalize().into())
    }
}

/// In-process [`Environment`] for tests and dry runs.
#[derive(Debug)]
pub struct InMemoryEnvironment {
    chain_id: u64,
    dev_accounts: Vec<Address>,
    state: Mutex<MemoryState>,
}

impl Default for InMemoryEnvironment {
    fn default() -> Self {
        Self::new(31337)
    }
}

impl InMemoryEnvironment {
    /// Fresh environment with funded dev accounts.
    #[must_use]
    pub fn new(chain_id: u64) -> Self {
        let dev_accounts: Vec<Address> = DEV_ACCOUNTS
            .iter()
            .filter_map(|address| address.parse().ok())
            .collect();

        let mut state = MemoryState::default();
        for address in &dev_accounts {
            state.account(*address).balance = ether_to_wei(DEV_BALANCE_ETHER);
        }

        Self {
            chain_id,
            dev_accounts,
            state: Mutex::new(state),
        }
    }

    /// Programs the result of calls to `to` whose calldata equals `data`.
    pub fn respond_to_call(&self, to: Address, data: Bytes, result: Bytes) {
        self.state
            .lock()
            .results_by_data
            .insert((to, data.0), result);
    }

    /// Programs the result of any call to `to` with this selector.
    pub fn respond_to_selector(&self, to: Address, selector: [u8; 4], result: Bytes) {
        self.state
            .lock()
            .results_by_selector
            .insert((to, selector), result);
    }

    /// Makes every call or transaction with this selector fail.
    pub fn fail_on(&self, selector: [u8; 4], reason: impl Into<String>) {
        self.state.lock().failures.insert(selector, reason.into());
    }

    /// Leaves `address` out of every later state dump.
    pub fn omit_from_dump(&self, address: Address) {
        self.state.lock().omitted.insert(address);
    }

    /// Every call made so far, oldest first.
    #[must_use]
    pub fn journal(&self) -> Vec<EnvironmentCall> {
        self.state.lock().journal.clone()
    }

    /// Number of calls made so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state.lock().journal.len()
    }

    /// Transactions sent so far.
    #[must_use]
    pub fn transactions(&self) -> Vec<Transaction> {
        self.state
            .lock()
            .journal
            .iter()
            .filter_map(|call| match call {
                EnvironmentCall::Send(tx) => Some(tx.clone()),
                _ => None,
            })
            .collect()
    }

    /// Snapshot of one account.
    #[must_use]
    pub fn account(&self, address: Address) -> Option<DumpAccount> {
        self.state.lock().accounts.get(&address).cloned()
    }
}

#[async_trait]
impl Environment for InMemoryEnvironment {
    async fn chain_id(&self) -> Result<u64, EnvironmentError> {
        self.state.lock().journal.push(EnvironmentCall::ChainId);
        Ok(self.chain_id)
    }

    async fn accounts(&self) -> Result<Vec<Address>, EnvironmentError> {
        self.state.lock().journal.push(EnvironmentCall::Accounts);
        Ok(self.dev_accounts.clone())
    }

    async fn balance(&self, address: Address) -> Result<U256, EnvironmentError> {
        let mut state = self.state.lock();
        state.journal.push(EnvironmentCall::Balance(address));
        Ok(state.balance(&address))
    }

    async fn set_balance(&self, address: Address, balance: U256) -> Result<(), EnvironmentError> {
        let mut state = self.state.lock();
        state
            .journal
            .push(EnvironmentCall::SetBalance(address, balance));
        state.account(address).balance = balance;
        Ok(())
    }

    async fn set_code(&self, address: Address, code: Bytes) -> Result<(), EnvironmentError> {
        let mut state = self.state.lock();
        state.journal.push(EnvironmentCall::SetCode(address));
        state.account(address).code = code;
        Ok(())
    }

    async fn set_storage_at(
        &self,
        address: Address,
        slot: Hash,
        value: Hash,
    ) -> Result<(), EnvironmentError> {
        let mut state = self.state.lock();
        state
            .journal
            .push(EnvironmentCall::SetStorageAt(address, slot));
        let slot = U256::from_big_endian(slot.as_bytes());
        let value = U256::from_big_endian(value.as_bytes());
        let storage = &mut state.account(address).storage;
        if value.is_zero() {
            storage.remove(&slot);
        } else {
            storage.insert(slot, value);
        }
        Ok(())
    }

    async fn send(&self, tx: Transaction) -> Result<Receipt, EnvironmentError> {
        let mut state = self.state.lock();
        state.journal.push(EnvironmentCall::Send(tx.clone()));
        state.check_failure(&tx.data)?;

        let available = state.balance(&tx.from);
        if available < tx.value {
            return Err(EnvironmentError::InsufficientFunds {
                account: tx.from,
                needed: tx.value,
                available,
            });
        }

        let sender = state.account(tx.from);
        let nonce = sender.nonce;
        sender.nonce += 1;
        sender.balance = available - tx.value;

        let tx_hash = state.next_tx_hash(&tx);
        state.block_number += 1;

        let (target, contract_address) = match tx.to {
            Some(to) => (to, None),
            None => {
                let created = compute_contract_address(tx.from, nonce);
                let account = state.account(created);
                account.code = tx.data.clone();
                account.nonce = 1;
                (created, Some(created))
            }
        };
        let recipient = state.account(target);
        recipient.balance = recipient.balance.saturating_add(tx.value);

        Ok(Receipt {
            tx_hash,
            contract_address,
        })
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, EnvironmentError> {
        let mut state = self.state.lock();
        state.journal.push(EnvironmentCall::Call(to, data.clone()));
        state.check_failure(&data)?;

        if let Some(result) = state.results_by_data.get(&(to, data.0.clone())) {
            return Ok(result.clone());
        }
        let selector: Option<[u8; 4]> = data.0.get(..4).and_then(|s| s.try_into().ok());
        if let Some(result) = selector.and_then(|s| state.results_by_selector.get(&(to, s))) {
            return Ok(result.clone());
        }
        Ok(Bytes::from(vec![0u8; 32]))
    }

    async fn dump_state(&self) -> Result<String, EnvironmentError> {
        let mut state = self.state.lock();
        state.journal.push(EnvironmentCall::DumpState);
        let dump = StateDump {
            best_block_number: state.block_number,
            accounts: state
                .accounts
                .iter()
                .filter(|(address, _)| !state.omitted.contains(address))
                .map(|(address, account)| (*address, account.clone()))
                .collect(),
        };
        encode_dump(&dump).map_err(|e| EnvironmentError::InvalidResponse(e.to_string()))
    }
}
