//! # Address Derivation (GF-01)
//!
//! Turns raw secp256k1 public keys, BLS vote keys and ownership-proof
//! signatures into verified on-chain identities.
//!
//! ## Architecture
//!
//! Pure domain logic, no I/O:
//! - `domain/keys.rs`: key parsing, hash160, consensus/account addresses
//! - `domain/ownership.rs`: the validator ownership proof (message, sign, verify)
//! - `domain/entities.rs`: [`DerivedIdentity`], [`Signature65`]
//!
//! ## Address Forms
//!
//! | Address | Derivation |
//! |---------|------------|
//! | Consensus | `ripemd160(sha256(compressed key))` |
//! | Account | last 20 bytes of `keccak256(x ‖ y)` |
//! | Voter | `ripemd160(sha256(33-byte tx key))` |

pub mod domain;

pub use domain::entities::{DerivedIdentity, Signature65};
pub use domain::errors::DerivationError;
pub use domain::keys::{
    check_declared, derive_account_address, derive_consensus_address, derive_identity, hash160,
    keccak256, parse_public_key, parse_secret_key, sha256, vote_key_hash, voter_address,
    BLS_VOTE_KEY_LEN,
};
pub use domain::ownership::{ownership_message, sign_ownership, verify_ownership};
