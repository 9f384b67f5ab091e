//! # Genesis Allocation Entry
//!
//! One account of a genesis `alloc` map. Balance and nonce are written as
//! `0x` hex quantities; code and storage are omitted when empty.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::{Bytes, Hash, U256};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAccount {
    #[serde(with = "hex_u256")]
    pub balance: U256,
    #[serde(with = "hex_u64", default)]
    pub nonce: u64,
    #[serde(default, skip_serializing_if = "Bytes::is_empty")]
    pub code: Bytes,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub storage: BTreeMap<Hash, Hash>,
}

impl GenesisAccount {
    /// A plain funded account.
    #[must_use]
    pub fn funded(balance: U256, nonce: u64) -> Self {
        Self {
            balance,
            nonce,
            ..Self::default()
        }
    }
}

/// `0x` hex on output; number, decimal or hex string on input.
pub mod hex_u64 {
    use serde::de::{self, Deserializer};
    use serde::{Deserialize, Serializer};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{value:#x}"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(n),
            Raw::Text(s) => {
                let value = crate::entities::parse_u256(&s).map_err(de::Error::custom)?;
                if value > crate::entities::U256::from(u64::MAX) {
                    return Err(de::Error::custom(format!("{s} exceeds u64")));
                }
                Ok(value.low_u64())
            }
        }
    }
}

/// `0x` hex on output; decimal or hex string on input.
pub mod hex_u256 {
    use serde::de::{self, Deserializer};
    use serde::{Deserialize, Serializer};

    use crate::entities::{parse_u256, u256_to_hex, U256};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&u256_to_hex(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_u256(&s).map_err(de::Error::custom)
    }
}
