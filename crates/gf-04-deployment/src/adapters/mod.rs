//! # Adapters
//!
//! - [`anvil`]: JSON-RPC against an auto-impersonating dev node
//! - [`memory`]: deterministic in-process environment for tests

pub mod anvil;
pub mod memory;
