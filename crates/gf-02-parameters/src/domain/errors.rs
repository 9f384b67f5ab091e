//! # Parameter Errors
//!
//! Every variant is a validation-class error: raised before any call to the
//! ephemeral environment.

use shared_types::{Address, U256};
use thiserror::Error;

/// Errors raised while loading or validating a parameter file.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParamError {
    // =========================================================================
    // LOADING
    // =========================================================================
    /// File could not be read or written
    #[error("Parameter file {path}: {reason}")]
    Io { path: String, reason: String },

    /// File does not match the parameter shape
    #[error("Invalid parameter file {path}: {reason}")]
    InvalidShape { path: String, reason: String },

    // =========================================================================
    // BRIDGE
    // =========================================================================
    /// Tax basis points above 10000
    #[error("Invalid {field}: {value} basis points (max 10000)")]
    InvalidTaxBasisPoints { field: &'static str, value: u64 },

    /// Deposit prefix magic does not decode to 4 bytes
    #[error("Deposit prefix magic must be 4 bytes, got {actual}")]
    InvalidPrefixLength { actual: usize },

    /// Deposit prefix magic is neither 4 ASCII characters nor base64
    #[error("Deposit prefix magic is not ASCII: {0:?}")]
    InvalidPrefixMagic(String),

    /// Confirmation number below 1
    #[error("Confirmation number must be at least 1")]
    InvalidConfirmationNumber,

    /// Deposit txid carries a 0x prefix
    #[error("Deposit #{index}: txid must not be 0x-prefixed: {txid}")]
    PrefixedTxid { index: usize, txid: String },

    /// Deposit txid is not 32 bytes of hex
    #[error("Deposit #{index}: invalid txid: {reason}")]
    InvalidTxid { index: usize, reason: String },

    // =========================================================================
    // BITCOIN CHECKPOINT
    // =========================================================================
    /// Checkpoint block hash is not 32 bytes of hex
    #[error("Invalid checkpoint hash: {0}")]
    InvalidCheckpointHash(String),

    /// Checkpoint network name is empty
    #[error("Checkpoint network must not be empty")]
    EmptyNetwork,

    // =========================================================================
    // TOKENS
    // =========================================================================
    /// Locking token registry is empty
    #[error("Locking token registry is empty")]
    EmptyTokenRegistry,

    /// Token registered twice
    #[error("Duplicate locking token {0}")]
    DuplicateToken(Address),

    /// Native token missing or registered with zero threshold
    #[error("Native token must be registered with a non-zero creation threshold")]
    MissingNativeThreshold,

    /// Threshold on a token other than native or the reward token
    #[error("Token {token} must not carry a creation threshold")]
    UnexpectedThreshold { token: Address },

    // =========================================================================
    // VALIDATORS & VOTERS
    // =========================================================================
    /// Key has wrong length or encoding
    #[error("{context}: malformed key: {reason}")]
    MalformedKey { context: String, reason: String },

    /// Ownership signature cannot be parsed or recovered
    #[error("{context}: malformed signature: {reason}")]
    MalformedSignature { context: String, reason: String },

    /// Declared address differs from the derived one
    #[error("{context}: address mismatch, declared {declared}, derived {derived}")]
    AddressMismatch {
        context: String,
        declared: Address,
        derived: Address,
    },

    /// Validator declared twice
    #[error("Duplicate validator {0}")]
    DuplicateValidator(Address),

    /// Voter declared twice
    #[error("Duplicate voter {0}")]
    DuplicateVoter(Address),

    /// Pre-derived vote key hash is not 32 bytes of hex
    #[error("Voter #{index}: invalid vote key hash: {reason}")]
    InvalidVoteKeyHash { index: usize, reason: String },

    // =========================================================================
    // BALANCES
    // =========================================================================
    /// Extra balance declared twice for one address
    #[error("Duplicate balance for {0}")]
    DuplicateBalance(Address),

    /// Strict mode: staged funding differs from the native threshold
    #[error("Strict funding mismatch for owner {owner}: required {required} wei, staged {staged} wei")]
    FundingMismatch {
        owner: Address,
        required: U256,
        staged: U256,
    },
}

impl ParamError {
    /// Wraps a derivation failure with the entry it came from.
    pub(crate) fn derivation(
        context: impl Into<String>,
        err: gf_01_address_derivation::DerivationError,
    ) -> Self {
        use gf_01_address_derivation::DerivationError;

        let context = context.into();
        match err {
            DerivationError::MalformedKey(reason) => ParamError::MalformedKey { context, reason },
            DerivationError::MalformedSignature(reason) => {
                ParamError::MalformedSignature { context, reason }
            }
            DerivationError::AddressMismatch { declared, derived } => ParamError::AddressMismatch {
                context,
                declared,
                derived,
            },
        }
    }
}
