//! # Relocation
//!
//! Moves each deployed contract's account from its ephemeral address to its
//! canonical one. The dump is consumed; nothing else reads it afterwards.

use std::collections::BTreeMap;

use shared_types::{Address, Contract, DeployedContract, GenesisAccount, Hash, U256};
use tracing::{debug, warn};

use super::dump::{DumpAccount, StateDump};
use super::errors::CaptureError;

/// Contract accounts keyed by canonical address, in address order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relocated {
    pub accounts: BTreeMap<Address, GenesisAccount>,
}

impl Relocated {
    /// Number of relocated accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// True when nothing was relocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

fn to_word(value: &U256) -> Hash {
    let mut buf = [0u8; 32];
    value.to_big_endian(&mut buf);
    Hash::new(buf)
}

fn to_genesis(account: DumpAccount) -> GenesisAccount {
    GenesisAccount {
        balance: account.balance,
        nonce: account.nonce,
        code: account.code,
        storage: account
            .storage
            .iter()
            .map(|(slot, value)| (to_word(slot), to_word(value)))
            .collect(),
    }
}

/// Relocates every contract in `contracts` out of `dump`.
///
/// `gas_revenue` is credited to the Locking account on top of its captured
/// balance. Fails with `IncompleteDeployment` unless every logical contract
/// ends up relocated.
pub fn relocate(
    mut dump: StateDump,
    contracts: &[DeployedContract],
    gas_revenue: U256,
) -> Result<Relocated, CaptureError> {
    let mut relocated = Relocated::default();

    for deployed in contracts {
        let Some(account) = dump.accounts.remove(&deployed.ephemeral) else {
            debug!(contract = %deployed.contract, ephemeral = %deployed.ephemeral, "no account in dump");
            continue;
        };

        let mut account = to_genesis(account);
        if deployed.contract == Contract::Locking && !gas_revenue.is_zero() {
            warn!(amount = %gas_revenue, "crediting gas revenue to Locking, regtest only");
            account.balance = account.balance.saturating_add(gas_revenue);
        }

        debug!(
            contract = %deployed.contract,
            from = %deployed.ephemeral,
            to = %deployed.canonical,
            "relocated"
        );
        relocated.accounts.insert(deployed.canonical, account);
    }

    if relocated.len() != Contract::COUNT {
        let missing = Contract::ALL
            .into_iter()
            .filter(|c| !relocated.accounts.contains_key(&c.canonical_address()))
            .collect();
        return Err(CaptureError::IncompleteDeployment {
            expected: Contract::COUNT,
            found: relocated.len(),
            missing,
        });
    }

    Ok(relocated)
}
