//! # State Capture & Relocation (GF-03)
//!
//! Decodes the ephemeral environment's state dump and moves every deployed
//! contract's account to its canonical address.
//!
//! ## Dump Encoding
//!
//! ```text
//! [0x] hex( gzip( JSON { best_block_number, accounts: { address: account } } ) )
//! ```
//!
//! ## Relocation
//!
//! Driven by the [`DeployedContract`](shared_types::DeployedContract) table:
//! each row copies one account from its ephemeral address to its canonical
//! one. Accounts not in the table are dropped. A complete run relocates
//! exactly [`Contract::COUNT`](shared_types::Contract::COUNT) accounts.

pub mod domain;

pub use domain::dump::{decode_dump, encode_dump, DumpAccount, StateDump};
pub use domain::errors::CaptureError;
pub use domain::relocation::{relocate, Relocated};
