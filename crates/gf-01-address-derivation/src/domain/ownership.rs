//! # Validator Ownership Proof
//!
//! A validator proves that an owner account may register it by signing
//!
//! ```text
//! keccak256(uint256 chainId ‖ address validator ‖ address owner)
//! ```
//!
//! with its consensus key. The message is the packed-Solidity encoding, so
//! the Locking contract recomputes the same digest on `create`.

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use shared_types::{Address, Hash};

use super::entities::{DerivedIdentity, Signature65};
use super::errors::DerivationError;
use super::keys::{derive_consensus_address, keccak256};

/// Digest the validator signs to authorize `owner`.
#[must_use]
pub fn ownership_message(chain_id: u64, validator: &Address, owner: &Address) -> Hash {
    let mut packed = [0u8; 72];
    packed[24..32].copy_from_slice(&chain_id.to_be_bytes());
    packed[32..52].copy_from_slice(validator.as_bytes());
    packed[52..72].copy_from_slice(owner.as_bytes());
    Hash::new(keccak256(&packed))
}

/// Verifies an ownership proof against a derived identity.
///
/// The key recovered from the signature must hash to the identity's
/// consensus address.
pub fn verify_ownership(
    chain_id: u64,
    identity: &DerivedIdentity,
    owner: &Address,
    signature: &Signature65,
) -> Result<(), DerivationError> {
    let message = ownership_message(chain_id, &identity.consensus_address, owner);

    let sig = Signature::from_scalars(signature.r, signature.s)
        .map_err(|_| DerivationError::MalformedSignature("r or s out of range".into()))?;
    let recovery_id = RecoveryId::try_from(signature.recovery_bit())
        .map_err(|_| DerivationError::MalformedSignature(format!("recovery id {}", signature.v)))?;

    let recovered = VerifyingKey::recover_from_prehash(message.as_bytes(), &sig, recovery_id)
        .map_err(|_| DerivationError::MalformedSignature("public key recovery failed".into()))?;

    let recovered_address = derive_consensus_address(&recovered);
    if recovered_address != identity.consensus_address {
        return Err(DerivationError::AddressMismatch {
            declared: identity.consensus_address,
            derived: recovered_address,
        });
    }
    Ok(())
}

/// Signs an ownership proof with the validator's secret key.
///
/// Used for regtest parameter files that carry the validator secret
/// instead of an offline signature. Produces low-s with `v` in {27, 28}.
pub fn sign_ownership(
    chain_id: u64,
    key: &SigningKey,
    owner: &Address,
) -> Result<Signature65, DerivationError> {
    let validator = derive_consensus_address(key.verifying_key());
    let message = ownership_message(chain_id, &validator, owner);

    let (sig, recovery_id) = key
        .sign_prehash_recoverable(message.as_bytes())
        .map_err(|e| DerivationError::MalformedSignature(e.to_string()))?;

    // Normalize S to the lower half; flipping s flips the recovery parity.
    let (sig, recovery_id) = match sig.normalize_s() {
        Some(normalized) => (
            normalized,
            RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced()),
        ),
        None => (sig, recovery_id),
    };

    let bytes = sig.to_bytes();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&bytes[..32]);
    s.copy_from_slice(&bytes[32..]);

    Ok(Signature65 {
        r,
        s,
        v: recovery_id.to_byte() + 27,
    })
}
