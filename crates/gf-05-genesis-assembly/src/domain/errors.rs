//! # Assembly Errors

use shared_types::Contract;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssemblyError {
    /// Template file unreadable or not a genesis document
    #[error("Invalid genesis template {path}: {reason}")]
    Template { path: String, reason: String },

    /// A genesis contract has no allocation entry
    #[error("Genesis allocation is missing {0}")]
    MissingContract(Contract),

    /// Allocation size differs from contracts plus declared extras
    #[error("Genesis allocation has {actual} accounts, expected {expected}")]
    AccountCountMismatch { expected: usize, actual: usize },

    /// Document could not be encoded
    #[error("Failed to encode genesis: {0}")]
    Encode(String),

    /// Output could not be written
    #[error("Failed to write genesis to {path}: {reason}")]
    Io { path: String, reason: String },
}
