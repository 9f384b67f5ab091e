//! # Validated Parameters
//!
//! Byte-level form consumed by the orchestrator. Amounts are in wei, hashes
//! are in internal byte order, keys are already derived. Nothing past this
//! point parses hex.

use gf_01_address_derivation::{DerivedIdentity, Signature65};
use shared_types::{Address, Hash, U256};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedParams {
    /// Chain id the ownership proofs were checked against.
    pub chain_id: u64,
    pub goat_token: ValidatedToken,
    pub foundation_owner: Address,
    pub bridge: ValidatedBridge,
    pub checkpoint: Checkpoint,
    pub relayer: ValidatedRelayer,
    pub locking: ValidatedLocking,
    /// One entry per distinct validator owner.
    pub funding: Vec<FundingPlan>,
    pub balances: Vec<ExtraBalance>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedToken {
    pub owner: Address,
    pub transfers: Vec<(Address, U256)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBridge {
    pub owner: Address,
    pub prefix_magic: [u8; 4],
    pub deposit_tax_bp: u64,
    pub max_deposit_tax: U256,
    pub withdrawal_tax_bp: u64,
    pub max_withdrawal_tax: U256,
    pub min_deposit: U256,
    pub min_withdrawal: U256,
    pub confirmation_number: u64,
    pub deposits: Vec<SeedDeposit>,
}

/// A deposit replayed from the relayer executor with zero tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedDeposit {
    /// Internal byte order.
    pub txid: Hash,
    pub txout: u32,
    pub recipient: Address,
    /// Wei.
    pub amount: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub height: u64,
    /// Internal byte order.
    pub hash: Hash,
    pub network: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRelayer {
    pub owner: Address,
    pub voters: Vec<Voter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voter {
    pub address: Address,
    pub vote_key_hash: Hash,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLocking {
    pub owner: Address,
    pub tokens: Vec<LockingToken>,
    pub validators: Vec<ValidatedValidator>,
    pub allow_list: Vec<Address>,
    pub strict: bool,
    pub gas_revenue: U256,
    pub open_claim: bool,
    /// Creation threshold of the native token (wei).
    pub native_threshold: U256,
    /// Creation threshold of the reward token, when it carries one.
    pub reward_threshold: Option<U256>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockingToken {
    pub address: Address,
    pub weight: u64,
    pub limit: U256,
    pub threshold: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedValidator {
    pub owner: Address,
    pub identity: DerivedIdentity,
    pub signature: Signature65,
}

/// What a validator owner holds before Locking is initialized, and what it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundingPlan {
    pub owner: Address,
    /// Sum of seed deposits credited to the owner.
    pub staged: U256,
    /// Native threshold times the number of validators the owner registers.
    pub required: U256,
}

impl FundingPlan {
    /// Amount the orchestrator tops up in non-strict mode.
    #[must_use]
    pub fn shortfall(&self) -> U256 {
        self.required.saturating_sub(self.staged)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtraBalance {
    pub address: Address,
    pub value: U256,
    pub nonce: u64,
}
