//! # Key Parsing and Address Derivation
//!
//! ## Accepted public key encodings
//!
//! | Length | Form |
//! |--------|------|
//! | 33 | SEC1 compressed (`02`/`03` ‖ x) |
//! | 65 | SEC1 uncompressed (`04` ‖ x ‖ y) |
//! | 64 | uncompressed without the `04` prefix |
//!
//! Every encoding of the same point derives the same addresses.

use k256::ecdsa::{SigningKey, VerifyingKey};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use sha3::Keccak256;
use shared_types::{decode_hex, Address, Hash};

use super::entities::DerivedIdentity;
use super::errors::DerivationError;

/// Length of a compressed BLS12-381 G2 vote key.
pub const BLS_VOTE_KEY_LEN: usize = 96;

/// Length of a compressed secp256k1 transaction key.
const COMPRESSED_KEY_LEN: usize = 33;

// =============================================================================
// HASH FUNCTIONS
// =============================================================================

/// SHA-256.
#[must_use]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Keccak-256.
#[must_use]
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// SHA-256 followed by RIPEMD-160.
#[must_use]
pub fn hash160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(Sha256::digest(data)).into()
}

// =============================================================================
// KEY PARSING
// =============================================================================

/// Parses a secp256k1 public key from hex.
pub fn parse_public_key(value: &str) -> Result<VerifyingKey, DerivationError> {
    let bytes =
        decode_hex(value.trim()).map_err(|e| DerivationError::MalformedKey(e.to_string()))?;

    let sec1 = match bytes.len() {
        33 if matches!(bytes[0], 0x02 | 0x03) => bytes,
        65 if bytes[0] == 0x04 => bytes,
        len @ (33 | 65) => {
            return Err(DerivationError::MalformedKey(format!(
                "unsupported prefix 0x{:02x} for a {len}-byte key",
                bytes[0]
            )))
        }
        64 => {
            let mut prefixed = Vec::with_capacity(65);
            prefixed.push(0x04);
            prefixed.extend_from_slice(&bytes);
            prefixed
        }
        other => {
            return Err(DerivationError::MalformedKey(format!(
                "public key must be 33, 64 or 65 bytes, got {other}"
            )))
        }
    };

    VerifyingKey::from_sec1_bytes(&sec1)
        .map_err(|_| DerivationError::MalformedKey("not a secp256k1 point".into()))
}

/// Parses a 32-byte secp256k1 secret key from hex.
pub fn parse_secret_key(value: &str) -> Result<SigningKey, DerivationError> {
    let bytes =
        decode_hex(value.trim()).map_err(|e| DerivationError::MalformedKey(e.to_string()))?;
    if bytes.len() != 32 {
        return Err(DerivationError::MalformedKey(format!(
            "secret key must be 32 bytes, got {}",
            bytes.len()
        )));
    }
    SigningKey::from_slice(&bytes)
        .map_err(|_| DerivationError::MalformedKey("secret key out of range".into()))
}

// =============================================================================
// ADDRESS DERIVATION
// =============================================================================

/// Consensus address: hash160 of the compressed key.
#[must_use]
pub fn derive_consensus_address(key: &VerifyingKey) -> Address {
    let compressed = key.to_encoded_point(true);
    Address::new(hash160(compressed.as_bytes()))
}

/// Account address: last 20 bytes of keccak-256 over `x ‖ y`.
#[must_use]
pub fn derive_account_address(key: &VerifyingKey) -> Address {
    let uncompressed = key.to_encoded_point(false);
    let hash = keccak256(&uncompressed.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Address::new(address)
}

/// Computes every identity form of a public key.
#[must_use]
pub fn derive_identity(key: &VerifyingKey) -> DerivedIdentity {
    let compressed_point = key.to_encoded_point(true);
    let uncompressed_point = key.to_encoded_point(false);

    let mut compressed = [0u8; 33];
    compressed.copy_from_slice(compressed_point.as_bytes());

    let raw = &uncompressed_point.as_bytes()[1..];
    let mut x = [0u8; 32];
    let mut y = [0u8; 32];
    x.copy_from_slice(&raw[..32]);
    y.copy_from_slice(&raw[32..]);

    DerivedIdentity {
        consensus_address: Address::new(hash160(&compressed)),
        account_address: derive_account_address(key),
        compressed,
        halves: [x, y],
    }
}

/// Commitment to a BLS vote key: SHA-256 of its 96 bytes.
pub fn vote_key_hash(vote_key: &[u8]) -> Result<Hash, DerivationError> {
    if vote_key.len() != BLS_VOTE_KEY_LEN {
        return Err(DerivationError::MalformedKey(format!(
            "vote key must be {BLS_VOTE_KEY_LEN} bytes, got {}",
            vote_key.len()
        )));
    }
    Ok(Hash::new(sha256(vote_key)))
}

/// Voter address derived from a compressed transaction key.
pub fn voter_address(tx_key: &[u8]) -> Result<Address, DerivationError> {
    if tx_key.len() != COMPRESSED_KEY_LEN {
        return Err(DerivationError::MalformedKey(format!(
            "tx key must be {COMPRESSED_KEY_LEN} bytes, got {}",
            tx_key.len()
        )));
    }
    if tx_key[0] != 2 && tx_key[0] != 3 {
        return Err(DerivationError::MalformedKey(format!(
            "tx key must be compressed, prefix was {:#04x}",
            tx_key[0]
        )));
    }
    Ok(Address::new(hash160(tx_key)))
}

/// Fails with `AddressMismatch` when `declared != derived`.
pub fn check_declared(declared: &Address, derived: &Address) -> Result<(), DerivationError> {
    if declared != derived {
        return Err(DerivationError::AddressMismatch {
            declared: *declared,
            derived: *derived,
        });
    }
    Ok(())
}
