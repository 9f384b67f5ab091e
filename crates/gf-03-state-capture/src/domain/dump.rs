//! # State Dump Codec
//!
//! The dev node's `anvil_dumpState` format: gzip-compressed JSON, hex
//! encoded. Only the fields relocation needs are modeled; the rest of the
//! node's snapshot (block env, transactions) is skipped on decode.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use shared_types::alloc::{hex_u256, hex_u64};
use shared_types::{strip_0x, Address, Bytes, U256};

use super::errors::CaptureError;

/// World state captured from the ephemeral environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDump {
    #[serde(alias = "bestBlockNumber", with = "hex_u64", default)]
    pub best_block_number: u64,
    #[serde(default)]
    pub accounts: BTreeMap<Address, DumpAccount>,
}

/// One account as the dev node reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpAccount {
    #[serde(with = "hex_u256")]
    pub balance: U256,
    #[serde(deserialize_with = "hex_u64::deserialize", default)]
    pub nonce: u64,
    #[serde(default)]
    pub code: Bytes,
    #[serde(with = "storage_words", default)]
    pub storage: BTreeMap<U256, U256>,
}

/// Storage slots and values: any-width hex in, 32-byte hex out.
mod storage_words {
    use std::collections::BTreeMap;

    use serde::de::{self, Deserializer};
    use serde::ser::{SerializeMap, Serializer};
    use serde::Deserialize;
    use shared_types::{parse_u256, U256};

    fn word(value: &U256) -> String {
        let mut buf = [0u8; 32];
        value.to_big_endian(&mut buf);
        format!("0x{}", hex::encode(buf))
    }

    pub fn serialize<S: Serializer>(
        storage: &BTreeMap<U256, U256>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(storage.len()))?;
        for (slot, value) in storage {
            map.serialize_entry(&word(slot), &word(value))?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<U256, U256>, D::Error> {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        raw.iter()
            .map(|(slot, value)| {
                Ok((
                    parse_u256(slot).map_err(de::Error::custom)?,
                    parse_u256(value).map_err(de::Error::custom)?,
                ))
            })
            .collect()
    }
}

/// Decodes a hex, gzip-compressed JSON state dump.
pub fn decode_dump(blob: &str) -> Result<StateDump, CaptureError> {
    let compressed =
        hex::decode(strip_0x(blob.trim())).map_err(|e| CaptureError::InvalidHex(e.to_string()))?;

    let mut json = Vec::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_end(&mut json)
        .map_err(|e| CaptureError::Decompress(e.to_string()))?;

    serde_json::from_slice(&json).map_err(|e| CaptureError::InvalidJson(e.to_string()))
}

/// Encodes a dump the way the dev node does.
pub fn encode_dump(dump: &StateDump) -> Result<String, CaptureError> {
    let json = serde_json::to_vec(dump).map_err(|e| CaptureError::InvalidJson(e.to_string()))?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&json)
        .and_then(|()| encoder.finish())
        .map(|compressed| format!("0x{}", hex::encode(compressed)))
        .map_err(|e| CaptureError::Decompress(e.to_string()))
}
