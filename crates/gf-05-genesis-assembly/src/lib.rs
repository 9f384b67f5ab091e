//! # Genesis Assembly (GF-05)
//!
//! Turns relocated contract state, extra balances and an optional faucet
//! into the genesis document a node boots from.
//!
//! ## Determinism
//!
//! - `alloc` is a `BTreeMap` keyed by lowercase hex address, so accounts
//!   serialize in the same order on every run
//! - template keys keep their order (`serde_json` with `preserve_order`)
//! - the timestamp comes from a [`Clock`]; inject [`FixedClock`] to pin it
//!
//! ## Output
//!
//! [`write_genesis`] renders pretty JSON and renames it into place.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::file::{load_template, read_genesis, write_genesis};
pub use domain::assembler::{AssemblyInput, Faucet, GenesisAssembler};
pub use domain::document::{ChainConfig, GenesisDocument, DEFAULT_GAS_LIMIT};
pub use domain::errors::AssemblyError;
pub use ports::clock::{Clock, FixedClock, SystemClock};
