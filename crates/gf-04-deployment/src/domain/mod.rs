//! # Domain Layer
//!
//! ABI encoding, artifacts and transaction entities. No I/O apart from
//! reading artifact files.

pub mod abi;
pub mod artifact;
pub mod create;
pub mod entities;
pub mod errors;
