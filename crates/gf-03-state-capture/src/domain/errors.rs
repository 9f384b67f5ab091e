//! # Capture Errors

use shared_types::Contract;
use thiserror::Error;

/// Errors raised while decoding a dump or relocating accounts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaptureError {
    /// Dump is not valid hex
    #[error("State dump is not valid hex: {0}")]
    InvalidHex(String),

    /// Dump bytes are not a gzip stream
    #[error("State dump decompression failed: {0}")]
    Decompress(String),

    /// Decompressed dump is not the expected JSON
    #[error("State dump is not valid JSON: {0}")]
    InvalidJson(String),

    /// Relocated account count differs from the contract count
    #[error("Incomplete deployment: expected {expected} contracts, relocated {found}, missing {missing:?}")]
    IncompleteDeployment {
        expected: usize,
        found: usize,
        missing: Vec<Contract>,
    },
}
