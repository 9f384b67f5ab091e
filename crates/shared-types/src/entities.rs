//! # Core Value Objects
//!
//! Immutable primitives shared across the pipeline.
//!
//! ## Clusters
//!
//! - **Identity**: [`Address`]
//! - **Digests**: [`Hash`]
//! - **Payloads**: [`Bytes`]
//! - **Amounts**: [`Quantity`], re-exported [`U256`]

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::ParseError;
use crate::units::ETHER_IN_WEI;

// Re-export U256 from primitive-types for use across all crates
pub use primitive_types::U256;

// =============================================================================
// HEX HELPERS
// =============================================================================

/// Strips an optional `0x`/`0X` prefix.
#[must_use]
pub fn strip_0x(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

/// Decodes a hex string with an optional `0x` prefix.
pub fn decode_hex(value: &str) -> Result<Vec<u8>, ParseError> {
    hex::decode(strip_0x(value)).map_err(|e| ParseError::InvalidHex(format!("{value}: {e}")))
}

/// Decodes a hex string into a fixed-width array.
pub fn decode_fixed<const N: usize>(value: &str) -> Result<[u8; N], ParseError> {
    let bytes = decode_hex(value)?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| ParseError::InvalidLength {
        expected: N,
        actual: bytes.len(),
    })
}

/// Encodes bytes as `0x`-prefixed lowercase hex.
#[must_use]
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Renders a U256 as a minimal `0x`-prefixed hex quantity (`0x0` for zero).
#[must_use]
pub fn u256_to_hex(value: U256) -> String {
    format!("{value:#x}")
}

/// Parses a `0x` hex quantity or a decimal string into a U256.
pub fn parse_u256(value: &str) -> Result<U256, ParseError> {
    let trimmed = value.trim();
    if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
        let digits = strip_0x(trimmed);
        if digits.is_empty() {
            return Err(ParseError::InvalidQuantity(format!("{value}: no hex digits")));
        }
        return U256::from_str_radix(digits, 16)
            .map_err(|e| ParseError::InvalidQuantity(format!("{value}: {e}")));
    }
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidQuantity(value.to_string()));
    }
    U256::from_dec_str(trimmed).map_err(|e| ParseError::InvalidQuantity(format!("{value}: {e:?}")))
}

// =============================================================================
// ADDRESS (20 bytes)
// =============================================================================

/// A 20-byte account identifier.
///
/// Serialized as `0x`-prefixed lowercase hex; parsing is case-insensitive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address (0x0000...0000). Stands for the native token.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an address from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an address from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; 20]>::try_from(slice).ok().map(Self)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns true if this is the zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Lowercase hex without the `0x` prefix, the key form of a genesis `alloc`.
    #[must_use]
    pub fn to_alloc_key(&self) -> String {
        hex::encode(self.0)
    }

    /// Left-pads the address into a 32-byte ABI word.
    #[must_use]
    pub fn to_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(&self.0);
        word
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<20>(s.trim()).map(Self)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// =============================================================================
// HASH (32 bytes)
// =============================================================================

/// A 32-byte digest or word (block hash, txid, storage slot).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    /// The zero hash.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates a hash from a 32-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Byte-reversed copy.
    ///
    /// Bitcoin displays txids and block hashes little-endian; contracts
    /// consume them in internal (big-endian) byte order.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut bytes = self.0;
        bytes.reverse();
        Self(bytes)
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Hash {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<32>(s.trim()).map(Self)
    }
}

impl From<[u8; 32]> for Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// =============================================================================
// BYTES (variable length)
// =============================================================================

/// Variable-length byte vector for calldata, return data and code.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    /// Creates an empty Bytes.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns a reference to the underlying slice.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.len() <= 8 {
            write!(f, "0x{}", hex::encode(&self.0))
        } else {
            write!(f, "0x{}..({} bytes)", hex::encode(&self.0[..4]), self.0.len())
        }
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(vec: Vec<u8>) -> Self {
        Self(vec)
    }
}

impl From<&[u8]> for Bytes {
    fn from(slice: &[u8]) -> Self {
        Self(slice.to_vec())
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Bytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode_hex(&self.0))
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        decode_hex(&s).map(Self).map_err(de::Error::custom)
    }
}

// =============================================================================
// QUANTITY
// =============================================================================

/// A non-negative 256-bit amount read from a parameter file.
///
/// Accepted JSON forms:
/// - an unsigned integer number (`12000`)
/// - a decimal string (`"800000000000000000000"`)
/// - a hex string (`"0x2b5e3af16b1880000"`)
/// - a natural-unit string with an `ether` suffix (`"200000000ether"`,
///   `"0.5ether"`), scaled by 10^18
///
/// Negative or fractional values are rejected when the file is loaded.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Quantity(pub U256);

impl Quantity {
    /// Zero.
    pub const ZERO: Self = Self(U256::zero());

    /// Wraps a raw U256.
    #[must_use]
    pub const fn new(value: U256) -> Self {
        Self(value)
    }

    /// Returns the wrapped value.
    #[must_use]
    pub const fn value(&self) -> U256 {
        self.0
    }

    /// Returns true if zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Narrows to u64, failing if the value does not fit.
    pub fn to_u64(&self) -> Result<u64, ParseError> {
        if self.0 > U256::from(u64::MAX) {
            return Err(ParseError::InvalidQuantity(format!("{} exceeds u64", self.0)));
        }
        Ok(self.0.low_u64())
    }

    /// Parses a natural-unit amount such as `"1.5ether"` or `"1.5"`.
    pub fn parse_ether(value: &str) -> Result<Self, ParseError> {
        let amount = value.trim();
        let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(ParseError::InvalidQuantity(value.to_string()));
        }
        let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !digits_only(whole) || !digits_only(fraction) || fraction.len() > 18 {
            return Err(ParseError::InvalidQuantity(value.to_string()));
        }
        let whole = if whole.is_empty() {
            U256::zero()
        } else {
            U256::from_dec_str(whole)
                .map_err(|e| ParseError::InvalidQuantity(format!("{value}: {e:?}")))?
        };
        let fraction = if fraction.is_empty() {
            U256::zero()
        } else {
            let padded = format!("{fraction:0<18}");
            U256::from_dec_str(&padded)
                .map_err(|e| ParseError::InvalidQuantity(format!("{value}: {e:?}")))?
        };
        whole
            .checked_mul(ETHER_IN_WEI.into())
            .and_then(|w| w.checked_add(fraction))
            .map(Self)
            .ok_or_else(|| ParseError::InvalidQuantity(format!("{value}: overflow")))
    }
}

impl fmt::Debug for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quantity({})", self.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Quantity {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(amount) = trimmed.strip_suffix("ether") {
            return Self::parse_ether(amount);
        }
        if trimmed.starts_with('-') {
            return Err(ParseError::InvalidQuantity(format!("{s}: negative")));
        }
        parse_u256(trimmed).map(Self)
    }
}

impl From<u64> for Quantity {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<U256> for Quantity {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct QuantityVisitor;

        impl Visitor<'_> for QuantityVisitor {
            type Value = Quantity;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer, a decimal/hex string or an ether amount")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Quantity, E> {
                Ok(Quantity::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Quantity, E> {
                u64::try_from(v)
                    .map(Quantity::from)
                    .map_err(|_| E::custom(format!("negative quantity: {v}")))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Quantity, E> {
                Err(E::custom(format!(
                    "non-integer or oversized numeric quantity {v}; use a string"
                )))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Quantity, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(QuantityVisitor)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_roundtrip_is_case_insensitive() {
        let addr: Address = "0xBC10000000000000000000000000000000000003".parse().unwrap();
        assert_eq!(addr.to_string(), "0xbc10000000000000000000000000000000000003");
        assert_eq!(addr.to_alloc_key(), "bc10000000000000000000000000000000000003");
        let unprefixed: Address = "bc10000000000000000000000000000000000003".parse().unwrap();
        assert_eq!(addr, unprefixed);
    }

    #[test]
    fn test_address_rejects_wrong_length() {
        let err = "0x1234".parse::<Address>().unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidLength {
                expected: 20,
                actual: 2
            }
        );
    }

    #[test]
    fn test_hash_reversed() {
        let hash: Hash = "0x0000000000000000000152889d426c654c617e5dc40f0951aa8fcd9e2d68364b"
            .parse()
            .unwrap();
        let reversed = hash.reversed();
        assert_eq!(reversed.0[0], 0x4b);
        assert_eq!(reversed.0[31], 0x00);
        assert_eq!(reversed.reversed(), hash);
    }

    #[test]
    fn test_quantity_forms() {
        let q: Quantity = serde_json::from_str("12000").unwrap();
        assert_eq!(q.value(), U256::from(12000));

        let q: Quantity = serde_json::from_str("\"800000000000000000000\"").unwrap();
        assert_eq!(q.value(), U256::from_dec_str("800000000000000000000").unwrap());

        let q: Quantity = serde_json::from_str("\"0x10\"").unwrap();
        assert_eq!(q.value(), U256::from(16));

        let q: Quantity = serde_json::from_str("\"200000000ether\"").unwrap();
        assert_eq!(
            q.value(),
            U256::from(200_000_000u64) * U256::from(ETHER_IN_WEI)
        );

        let q: Quantity = serde_json::from_str("\"0.5ether\"").unwrap();
        assert_eq!(q.value(), U256::from(500_000_000_000_000_000u64));
    }

    #[test]
    fn test_quantity_rejects_negative_and_fractional() {
        assert!(serde_json::from_str::<Quantity>("-1").is_err());
        assert!(serde_json::from_str::<Quantity>("1.5").is_err());
        assert!(serde_json::from_str::<Quantity>("\"-1\"").is_err());
        assert!(serde_json::from_str::<Quantity>("\"1.5\"").is_err());
        assert!(serde_json::from_str::<Quantity>("\"0.1234567890123456789ether\"").is_err());
    }

    #[test]
    fn test_bare_hex_prefix_is_not_zero() {
        assert!(parse_u256("0x").is_err());
        assert!(parse_u256(" 0X ").is_err());
        assert!(serde_json::from_str::<Quantity>("\"0x\"").is_err());
        assert_eq!(parse_u256("0x0").unwrap(), U256::zero());
    }

    #[test]
    fn test_u256_to_hex() {
        assert_eq!(u256_to_hex(U256::zero()), "0x0");
        assert_eq!(u256_to_hex(U256::from(255)), "0xff");
    }

    #[test]
    fn test_bytes_serde() {
        let bytes = Bytes::from(vec![0xde, 0xad]);
        let json = serde_json::to_string(&bytes).unwrap();
        assert_eq!(json, "\"0xdead\"");
        let back: Bytes = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bytes);
    }

    proptest::proptest! {
        #[test]
        fn prop_quantity_decimal_matches_u64(v in proptest::prelude::any::<u64>()) {
            let q: Quantity = v.to_string().parse().unwrap();
            proptest::prop_assert_eq!(q.to_u64().unwrap(), v);
        }
    }
}
