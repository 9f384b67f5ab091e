//! # Genesis Contract Deployment (GF-04)
//!
//! Deploys the genesis contract set onto an ephemeral execution
//! environment and initializes each contract from validated parameters.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): ABI encoding, artifacts, CREATE addresses
//! - **Ports Layer** (`ports/`): the [`Environment`] handle
//! - **Adapters Layer** (`adapters/`): [`AnvilEnvironment`] over JSON-RPC,
//!   [`InMemoryEnvironment`] for tests
//! - **Service** (`service.rs`): [`DeploymentOrchestrator`]
//!
//! ## Deployment Order
//!
//! | # | Contract | Initialization |
//! |---|----------|----------------|
//! | 1 | GoatToken | transfers, remainder to owner, mirrored to canonical |
//! | 2 | GoatDao | canonical token |
//! | 3 | GoatFoundation | owner |
//! | 4 | BitcoinCheckpoint | height, hash, network |
//! | 5 | WrappedBitcoin | none |
//! | 6 | Bridge | taxes, minimums, confirmations, prefix, seed deposits |
//! | 7 | Relayer | voters |
//! | 8 | Locking | tokens, validators, allow list, claim |
//! | 9 | LockingTokenFactory | none |

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use adapters::anvil::AnvilEnvironment;
pub use adapters::memory::{EnvironmentCall, InMemoryEnvironment};
pub use domain::abi::{selector, AbiValue};
pub use domain::artifact::{Artifact, ArtifactStore};
pub use domain::create::compute_contract_address;
pub use domain::entities::{DeploymentReport, Receipt, Transaction};
pub use domain::errors::{AbiError, ArtifactError, DeploymentError, EnvironmentError};
pub use ports::environment::Environment;
pub use service::DeploymentOrchestrator;
