//! # Error Types
//!
//! Parse errors raised when converting text into value objects.

use thiserror::Error;

/// Errors raised while parsing hex strings and quantities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Input is not valid hexadecimal.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Decoded byte length does not match the expected width.
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Quantity is negative, fractional or otherwise not a non-negative integer.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),
}
