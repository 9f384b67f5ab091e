//! # Genesis Assembler
//!
//! Merges every allocation source into the template. Later sources
//! overwrite earlier ones on the same address:
//!
//! ```text
//! extra balances → relocated contracts → faucet
//! ```

use std::collections::BTreeSet;

use gf_02_parameters::ExtraBalance;
use gf_03_state_capture::Relocated;
use shared_types::{Address, Contract, GenesisAccount, U256};
use tracing::{debug, info, warn};

use super::document::GenesisDocument;
use super::errors::AssemblyError;
use crate::ports::clock::{Clock, SystemClock};

/// A development account funded at genesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Faucet {
    pub address: Address,
    /// Wei.
    pub amount: U256,
}

/// Everything an assembly consumes.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyInput<'a> {
    pub chain_id: u64,
    pub balances: &'a [ExtraBalance],
    pub relocated: &'a Relocated,
    pub faucet: Option<Faucet>,
}

pub struct GenesisAssembler<C: Clock = SystemClock> {
    template: GenesisDocument,
    clock: C,
}

impl GenesisAssembler<SystemClock> {
    /// Assembler stamping the current time.
    #[must_use]
    pub fn new(template: GenesisDocument) -> Self {
        Self::with_clock(template, SystemClock)
    }
}

impl<C: Clock> GenesisAssembler<C> {
    #[must_use]
    pub fn with_clock(template: GenesisDocument, clock: C) -> Self {
        Self { template, clock }
    }

    /// Builds the genesis document. The template is not modified.
    pub fn assemble(&self, input: AssemblyInput<'_>) -> Result<GenesisDocument, AssemblyError> {
        let mut genesis = self.template.clone();
        genesis.config.chain_id = input.chain_id;
        genesis.timestamp = format!("{:#x}", self.clock.unix_time());

        for balance in input.balances {
            genesis.alloc.insert(
                balance.address.to_alloc_key(),
                GenesisAccount::funded(balance.value, balance.nonce),
            );
        }

        for (address, account) in &input.relocated.accounts {
            debug!(%address, "adding relocated contract state");
            genesis
                .alloc
                .insert(address.to_alloc_key(), account.clone());
        }

        if let Some(faucet) = input.faucet {
            warn!(address = %faucet.address, amount = %faucet.amount, "adding faucet account");
            genesis.alloc.insert(
                faucet.address.to_alloc_key(),
                GenesisAccount::funded(faucet.amount, 0),
            );
        }

        for contract in Contract::ALL {
            let entry = genesis.account(&contract.canonical_address());
            if entry.map_or(true, |account| account.code.is_empty()) {
                return Err(AssemblyError::MissingContract(contract));
            }
        }

        let expected = self.expected_accounts(&input);
        if genesis.alloc.len() != expected {
            return Err(AssemblyError::AccountCountMismatch {
                expected,
                actual: genesis.alloc.len(),
            });
        }

        info!(
            chain_id = input.chain_id,
            accounts = genesis.alloc.len(),
            "genesis assembled"
        );
        Ok(genesis)
    }

    /// Template entries, one per contract, the faucet, and one per extra
    /// balance not already landing on one of those.
    fn expected_accounts(&self, input: &AssemblyInput<'_>) -> usize {
        let mut fixed: BTreeSet<String> = self.template.alloc.keys().cloned().collect();
        fixed.extend(Contract::ALL.iter().map(|c| c.canonical_address().to_alloc_key()));
        if let Some(faucet) = input.faucet {
            fixed.insert(faucet.address.to_alloc_key());
        }
        let extras = input
            .balances
            .iter()
            .filter(|b| !fixed.contains(&b.address.to_alloc_key()))
            .count();
        fixed.len() + extras
    }
}
