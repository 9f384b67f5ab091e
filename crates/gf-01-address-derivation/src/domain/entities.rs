//! # Domain Entities

use std::fmt;

use shared_types::{decode_hex, Address};

use super::errors::DerivationError;

/// Identity computed from a validator's secp256k1 public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivedIdentity {
    /// hash160 of the compressed key
    pub consensus_address: Address,
    /// keccak-256 of the uncompressed key, last 20 bytes
    pub account_address: Address,
    /// SEC1 compressed encoding (33 bytes)
    pub compressed: [u8; 33],
    /// x and y coordinates of the uncompressed key
    pub halves: [[u8; 32]; 2],
}

impl DerivedIdentity {
    /// The 64-byte uncompressed key without the `04` prefix.
    #[must_use]
    pub fn uncompressed(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.halves[0]);
        out[32..].copy_from_slice(&self.halves[1]);
        out
    }
}

/// A 65-byte recoverable ECDSA signature laid out as `r ‖ s ‖ v`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature65 {
    /// R component (32 bytes)
    pub r: [u8; 32],
    /// S component (32 bytes)
    pub s: [u8; 32],
    /// Recovery ID (0, 1, 27, or 28)
    pub v: u8,
}

impl Signature65 {
    /// Parses a hex signature, with or without `0x`.
    pub fn parse(value: &str) -> Result<Self, DerivationError> {
        let bytes = decode_hex(value.trim())
            .map_err(|e| DerivationError::MalformedSignature(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Builds a signature from 65 raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DerivationError> {
        if bytes.len() != 65 {
            return Err(DerivationError::MalformedSignature(format!(
                "expected 65 bytes, got {}",
                bytes.len()
            )));
        }
        let v = bytes[64];
        if !matches!(v, 0 | 1 | 27 | 28) {
            return Err(DerivationError::MalformedSignature(format!(
                "invalid recovery id {v}"
            )));
        }
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);
        Ok(Self { r, s, v })
    }

    /// Recovery id normalized to 0 or 1.
    #[must_use]
    pub fn recovery_bit(&self) -> u8 {
        match self.v {
            27 | 28 => self.v - 27,
            other => other,
        }
    }

    /// `v` in the 27/28 form contracts expect.
    #[must_use]
    pub fn eth_v(&self) -> u8 {
        self.recovery_bit() + 27
    }

    /// Raw 65-byte form.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }
}

impl fmt::Debug for Signature65 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature65(0x{})", hex::encode(self.to_bytes()))
    }
}

impl fmt::Display for Signature65 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_signature_accepts_all_recovery_ids() {
        for v in [0u8, 1, 27, 28] {
            let mut raw = [0x11u8; 65];
            raw[64] = v;
            let sig = Signature65::parse(&hex::encode(raw)).unwrap();
            assert_eq!(sig.v, v);
            assert!(sig.recovery_bit() <= 1);
            assert!(sig.eth_v() == 27 || sig.eth_v() == 28);
        }
    }

    #[test]
    fn test_parse_signature_rejects_bad_v() {
        let mut raw = [0x11u8; 65];
        raw[64] = 2;
        assert!(matches!(
            Signature65::parse(&hex::encode(raw)),
            Err(DerivationError::MalformedSignature(_))
        ));
    }

    #[test]
    fn test_parse_signature_rejects_wrong_length() {
        let raw = [0x11u8; 64];
        assert!(matches!(
            Signature65::parse(&format!("0x{}", hex::encode(raw))),
            Err(DerivationError::MalformedSignature(_))
        ));
        assert!(matches!(
            Signature65::parse("0xzz"),
            Err(DerivationError::MalformedSignature(_))
        ));
    }
}
