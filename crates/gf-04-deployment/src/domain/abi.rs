//! # ABI Encoding
//!
//! Solidity head/tail encoding for the argument kinds the genesis contracts
//! take: static words (address, uint, bool, bytesN, fixed arrays) and
//! dynamic `bytes`/`string`.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use shared_types::{Address, U256};

use super::errors::AbiError;

/// A function or constructor parameter as declared in an artifact ABI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<AbiParam>,
}

impl AbiParam {
    /// Canonical type as used in signatures; tuples expand to `(a,b)`.
    #[must_use]
    pub fn canonical_type(&self) -> String {
        match self.kind.strip_prefix("tuple") {
            Some(suffix) => {
                let inner: Vec<String> =
                    self.components.iter().map(AbiParam::canonical_type).collect();
                format!("({}){suffix}", inner.join(","))
            }
            None => self.kind.clone(),
        }
    }
}

/// First four bytes of keccak-256 over a canonical signature.
#[must_use]
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// An argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    Address(Address),
    Uint(U256),
    Bool(bool),
    /// `bytes1`..`bytes32`, left-aligned.
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    String(String),
    /// `T[N]`.
    FixedArray(Vec<AbiValue>),
}

impl AbiValue {
    /// Shorthand for a `uint` from a u64.
    #[must_use]
    pub fn uint(value: u64) -> Self {
        AbiValue::Uint(U256::from(value))
    }

    /// Shorthand for `bytes32`.
    #[must_use]
    pub fn bytes32(value: [u8; 32]) -> Self {
        AbiValue::FixedBytes(value.to_vec())
    }

    /// True if this value can be passed as a parameter of type `ty`.
    #[must_use]
    pub fn fits(&self, ty: &str) -> bool {
        if let Some((element, len)) = split_fixed_array(ty) {
            return match self {
                AbiValue::FixedArray(items) => {
                    items.len() == len && items.iter().all(|item| item.fits(element))
                }
                _ => false,
            };
        }
        match self {
            AbiValue::Address(_) => ty == "address",
            AbiValue::Uint(value) => match ty.strip_prefix("uint") {
                Some("") => true,
                Some(bits) => bits.parse::<usize>().is_ok_and(|bits| value.bits() <= bits),
                None => false,
            },
            AbiValue::Bool(_) => ty == "bool",
            AbiValue::FixedBytes(bytes) => {
                ty.strip_prefix("bytes")
                    .and_then(|n| n.parse::<usize>().ok())
                    == Some(bytes.len())
                    && bytes.len() <= 32
            }
            AbiValue::Bytes(_) => ty == "bytes",
            AbiValue::String(_) => ty == "string",
            AbiValue::FixedArray(_) => false,
        }
    }

    fn is_dynamic(&self) -> bool {
        match self {
            AbiValue::Bytes(_) | AbiValue::String(_) => true,
            AbiValue::FixedArray(items) => items.iter().any(AbiValue::is_dynamic),
            _ => false,
        }
    }

    fn head_size(&self) -> usize {
        match self {
            _ if self.is_dynamic() => 32,
            AbiValue::FixedArray(items) => items.iter().map(AbiValue::head_size).sum(),
            _ => 32,
        }
    }

    fn encode_static(&self, out: &mut Vec<u8>) {
        match self {
            AbiValue::Address(address) => out.extend_from_slice(&address.to_word()),
            AbiValue::Uint(value) => out.extend_from_slice(&uint_word(*value)),
            AbiValue::Bool(flag) => out.extend_from_slice(&uint_word(U256::from(u8::from(*flag)))),
            AbiValue::FixedBytes(bytes) => {
                let mut word = [0u8; 32];
                word[..bytes.len()].copy_from_slice(bytes);
                out.extend_from_slice(&word);
            }
            AbiValue::FixedArray(items) => {
                for item in items {
                    item.encode_static(out);
                }
            }
            AbiValue::Bytes(_) | AbiValue::String(_) => {}
        }
    }

    fn encode_tail(&self) -> Vec<u8> {
        match self {
            AbiValue::Bytes(bytes) => encode_packed_dynamic(bytes),
            AbiValue::String(text) => encode_packed_dynamic(text.as_bytes()),
            AbiValue::FixedArray(items) => encode(items),
            _ => Vec::new(),
        }
    }
}

/// Splits `T[N]` into `(T, N)`.
fn split_fixed_array(ty: &str) -> Option<(&str, usize)> {
    let open = ty.rfind('[')?;
    let len = ty.strip_suffix(']')?.get(open + 1..)?.parse().ok()?;
    Some((&ty[..open], len))
}

fn uint_word(value: U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}

fn encode_packed_dynamic(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(32 + data.len().div_ceil(32) * 32);
    out.extend_from_slice(&uint_word(U256::from(data.len())));
    out.extend_from_slice(data);
    let padding = (32 - data.len() % 32) % 32;
    out.resize(out.len() + padding, 0);
    out
}

/// Encodes a sequence of arguments.
#[must_use]
pub fn encode(values: &[AbiValue]) -> Vec<u8> {
    let head_len: usize = values.iter().map(AbiValue::head_size).sum();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for value in values {
        if value.is_dynamic() {
            head.extend_from_slice(&uint_word(U256::from(head_len + tail.len())));
            tail.extend(value.encode_tail());
        } else {
            value.encode_static(&mut head);
        }
    }

    head.extend(tail);
    head
}

/// Checks `values` against `params` and encodes them.
pub fn encode_checked(
    function: &str,
    params: &[AbiParam],
    values: &[AbiValue],
) -> Result<Vec<u8>, AbiError> {
    for (index, (param, value)) in params.iter().zip(values).enumerate() {
        let expected = param.canonical_type();
        if !value.fits(&expected) {
            return Err(AbiError::TypeMismatch {
                function: function.to_string(),
                index,
                expected,
            });
        }
    }
    Ok(encode(values))
}

/// Reads the first return word as a `uint256`.
pub fn decode_uint(data: &[u8]) -> Result<U256, AbiError> {
    if data.len() < 32 {
        return Err(AbiError::ShortReturnData(data.len()));
    }
    Ok(U256::from_big_endian(&data[..32]))
}
