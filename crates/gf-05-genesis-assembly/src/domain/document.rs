//! # Genesis Document
//!
//! The file a node loads to start the chain. Fields a template carries that
//! are not modeled here are kept verbatim in `extra`.
//!
//! ## Built-in Template
//!
//! | Field | Value |
//! |-------|-------|
//! | `config` | every EVM fork active from block/time 0, chain id placeholder |
//! | `gasLimit` | `0x1c9c380` (30M) |
//! | `difficulty` | `0x0` |
//! | `extraData` | `0x` |
//! | `coinbase`, `mixHash`, `parentHash` | zero |
//! | `timestamp` | `0x0` until assembly |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared_types::{Address, Bytes, GenesisAccount, Hash};

/// Fork activation keys set to zero in the built-in chain config.
const FORK_BLOCKS: [&str; 11] = [
    "homesteadBlock",
    "eip150Block",
    "eip155Block",
    "eip158Block",
    "byzantiumBlock",
    "constantinopleBlock",
    "petersburgBlock",
    "istanbulBlock",
    "berlinBlock",
    "londonBlock",
    "mergeNetsplitBlock",
];

const FORK_TIMES: [&str; 2] = ["shanghaiTime", "cancunTime"];

/// Default block gas limit.
pub const DEFAULT_GAS_LIMIT: u64 = 30_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    #[serde(default)]
    pub chain_id: u64,
    /// Fork schedule and any other config keys, in template order.
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        let mut rest = Map::new();
        for key in FORK_BLOCKS.iter().chain(FORK_TIMES.iter()) {
            rest.insert((*key).to_string(), Value::from(0u64));
        }
        rest.insert("terminalTotalDifficulty".into(), Value::from(0u64));
        rest.insert("terminalTotalDifficultyPassed".into(), Value::Bool(true));
        Self { chain_id: 0, rest }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenesisDocument {
    pub config: ChainConfig,
    pub nonce: String,
    /// Unix seconds as `0x` hex.
    pub timestamp: String,
    pub extra_data: Bytes,
    pub gas_limit: String,
    pub difficulty: String,
    pub mix_hash: Hash,
    pub coinbase: Address,
    /// Keyed by lowercase hex address without `0x`; ordered for stable output.
    pub alloc: BTreeMap<String, GenesisAccount>,
    pub number: String,
    pub gas_used: String,
    pub parent_hash: Hash,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for GenesisDocument {
    fn default() -> Self {
        Self {
            config: ChainConfig::default(),
            nonce: "0x0".into(),
            timestamp: "0x0".into(),
            extra_data: Bytes::new(),
            gas_limit: format!("{DEFAULT_GAS_LIMIT:#x}"),
            difficulty: "0x0".into(),
            mix_hash: Hash::ZERO,
            coinbase: Address::ZERO,
            alloc: BTreeMap::new(),
            number: "0x0".into(),
            gas_used: "0x0".into(),
            parent_hash: Hash::ZERO,
            extra: Map::new(),
        }
    }
}

impl GenesisDocument {
    /// Allocation entry for `address`.
    #[must_use]
    pub fn account(&self, address: &Address) -> Option<&GenesisAccount> {
        self.alloc.get(&address.to_alloc_key())
    }
}
