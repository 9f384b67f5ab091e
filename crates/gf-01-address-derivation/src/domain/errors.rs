//! # Derivation Errors

use shared_types::Address;
use thiserror::Error;

/// Errors raised while deriving or verifying identities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DerivationError {
    /// Key has the wrong length, a bad prefix, or is not a curve point
    #[error("Malformed key: {0}")]
    MalformedKey(String),

    /// Signature is not 65 bytes, has a bad recovery id, or cannot be recovered
    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    /// Derived address disagrees with the declared one
    #[error("Address mismatch: declared {declared}, derived {derived}")]
    AddressMismatch { declared: Address, derived: Address },
}
