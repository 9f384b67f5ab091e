//! # Shared Types Crate
//!
//! Value objects used by every stage of the genesis pipeline.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: addresses, hashes and quantities are parsed
//!   once, at the edge, into the types defined here.
//! - **Hex at the boundary**: every type serializes to the `0x`-prefixed hex
//!   form used by JSON-RPC nodes and genesis files.
//! - **Table-driven contracts**: the logical contract set and its canonical
//!   addresses live in [`contracts`]; adding a contract means adding a row.

pub mod alloc;
pub mod contracts;
pub mod entities;
pub mod errors;
pub mod fs;
pub mod units;

pub use alloc::GenesisAccount;
pub use contracts::{executors, Contract, DeployedContract};
pub use entities::*;
pub use errors::*;
pub use fs::write_atomic;
pub use units::*;
