//! # Deployment Errors

use gf_03_state_capture::CaptureError;
use shared_types::{Address, Contract, Hash, U256};
use thiserror::Error;

/// ABI encoding and decoding failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AbiError {
    /// Artifact has no function with this name and arity
    #[error("Unknown function {contract}.{function} with {arity} arguments")]
    UnknownFunction {
        contract: String,
        function: String,
        arity: usize,
    },

    /// Argument does not fit the declared parameter type
    #[error("Argument #{index} of {function}: expected {expected}")]
    TypeMismatch {
        function: String,
        index: usize,
        expected: String,
    },

    /// ABI type this encoder does not handle
    #[error("Unsupported ABI type {0}")]
    UnsupportedType(String),

    /// Return data too short for the requested value
    #[error("Return data too short: {0} bytes")]
    ShortReturnData(usize),
}

/// Artifact loading failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArtifactError {
    /// No artifact file in either layout
    #[error("Artifact {name} not found under {root}")]
    NotFound { name: String, root: String },

    /// File unreadable
    #[error("Artifact {name}: {reason}")]
    Io { name: String, reason: String },

    /// File is not an artifact
    #[error("Artifact {name} is malformed: {reason}")]
    Malformed { name: String, reason: String },

    /// Artifact carries no creation code (interface or abstract contract)
    #[error("Artifact {0} has no creation bytecode")]
    MissingBytecode(String),
}

/// Failures of the ephemeral execution environment.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnvironmentError {
    /// Connection or HTTP failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Node answered with a JSON-RPC error
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Node answered with something unexpected
    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),

    /// Transaction mined with status 0
    #[error("Transaction {tx_hash} reverted")]
    Reverted { tx_hash: Hash },

    /// Receipt never appeared
    #[error("No receipt for transaction {0}")]
    MissingReceipt(Hash),

    /// Creation receipt without a contract address
    #[error("Deployment receipt {0} carries no contract address")]
    NoContractAddress(Hash),

    /// Sender cannot cover the transferred value
    #[error("Insufficient funds in {account}: needs {needed}, has {available}")]
    InsufficientFunds {
        account: Address,
        needed: U256,
        available: U256,
    },

    /// Failure injected by a test environment
    #[error("Injected failure: {0}")]
    Injected(String),
}

impl From<reqwest::Error> for EnvironmentError {
    fn from(err: reqwest::Error) -> Self {
        EnvironmentError::Transport(err.to_string())
    }
}

/// Errors raised by the deployment orchestrator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeploymentError {
    /// Environment call failed
    #[error("Environment: {0}")]
    Environment(#[from] EnvironmentError),

    /// Encoding failed
    #[error("ABI: {0}")]
    Abi(#[from] AbiError),

    /// Artifact could not be loaded
    #[error("Artifact: {0}")]
    Artifact(#[from] ArtifactError),

    /// Intermediate state dump could not be read
    #[error("State capture: {0}")]
    Capture(#[from] CaptureError),

    /// Deployed contract absent from the node's state
    #[error("{0} not found in environment state after deployment")]
    MissingAccount(Contract),

    /// Strict mode: owner's live balance below the native threshold
    #[error("Strict funding mismatch for owner {owner}: required {required} wei, available {available} wei")]
    FundingMismatch {
        owner: Address,
        required: U256,
        available: U256,
    },

    /// Owner holds fewer reward tokens than the reward threshold
    #[error("Owner {owner} holds {available} reward tokens, threshold is {required}")]
    InsufficientTokenBalance {
        owner: Address,
        required: U256,
        available: U256,
    },
}
