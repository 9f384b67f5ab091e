//! # Parameter File Shape
//!
//! Section keys are PascalCase, inner keys camelCase, matching the files the
//! companion param scripts generate. Anything that is not well-typed fails
//! at load: addresses must be 20-byte hex, amounts non-negative integers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared_types::{Address, Quantity};

/// The full declarative input of a genesis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GenesisParam {
    pub goat_token: GoatTokenParam,
    #[serde(rename = "GoatDAO", default)]
    pub goat_dao: EmptyParam,
    pub goat_foundation: OwnerParam,
    pub bridge: BridgeParam,
    pub bitcoin: BitcoinParam,
    #[serde(default)]
    pub wrapped_bitcoin: EmptyParam,
    pub relayer: RelayerParam,
    pub locking: LockingParam,
    #[serde(default)]
    pub locking_token_factory: EmptyParam,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub balances: Vec<BalanceParam>,
    /// Consensus-layer parameters, carried through untouched.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub consensus: Map<String, Value>,
}

/// A section with no parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyParam {}

/// A section that only names an owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerParam {
    pub owner: Address,
}

// =============================================================================
// TOKEN
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoatTokenParam {
    /// Receives whatever the deployer holds after the transfers.
    pub owner: Address,
    #[serde(default)]
    pub transfers: Vec<TransferParam>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferParam {
    pub to: Address,
    pub value: Quantity,
}

// =============================================================================
// BRIDGE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeParam {
    pub owner: Address,
    #[serde(rename = "depositPrefixMagic")]
    pub deposit_prefix_magic: String,
    #[serde(rename = "depositTaxBP")]
    pub deposit_tax_bp: u64,
    #[serde(rename = "maxDepositTaxInSat")]
    pub max_deposit_tax_in_sat: u64,
    #[serde(rename = "withdrawalTaxBP")]
    pub withdrawal_tax_bp: u64,
    #[serde(rename = "maxWithdrawalTaxInSat")]
    pub max_withdrawal_tax_in_sat: u64,
    #[serde(rename = "minDepositInSat")]
    pub min_deposit_in_sat: u64,
    #[serde(rename = "minWithdrawalInSat")]
    pub min_withdrawal_in_sat: u64,
    #[serde(rename = "confirmationNumber")]
    pub confirmation_number: u64,
    #[serde(default)]
    pub deposits: Vec<DepositParam>,
}

/// A Bitcoin deposit replayed into the bridge at genesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositParam {
    /// Display-order txid, no `0x`.
    pub txid: String,
    pub txout: u32,
    pub address: Address,
    pub satoshi: u64,
}

// =============================================================================
// BITCOIN CHECKPOINT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitcoinParam {
    pub height: u64,
    /// Display-order block hash.
    pub hash: String,
    pub network: String,
}

// =============================================================================
// RELAYER
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayerParam {
    pub owner: Address,
    #[serde(default)]
    pub voters: Vec<VoterParam>,
}

/// A relayer voter, either as raw keys or pre-derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VoterParam {
    Keys {
        #[serde(rename = "txKey")]
        tx_key: String,
        #[serde(rename = "voteKey")]
        vote_key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        address: Option<Address>,
    },
    Derived {
        address: Address,
        #[serde(rename = "voteKeyHash")]
        vote_key_hash: String,
    },
}

// =============================================================================
// LOCKING
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockingParam {
    pub owner: Address,
    pub tokens: Vec<TokenParam>,
    #[serde(default)]
    pub validators: Vec<ValidatorParam>,
    #[serde(rename = "allowList", default)]
    pub allow_list: Vec<Address>,
    #[serde(default)]
    pub strict: bool,
    /// Gas revenue credited to the Locking account (regtest only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<Quantity>,
    /// Open reward claiming at genesis.
    #[serde(default)]
    pub claim: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenParam {
    /// Zero address stands for the native token.
    pub address: Address,
    pub weight: u64,
    pub limit: Quantity,
    pub threshold: Quantity,
}

/// A genesis validator, signed offline or with its secret inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValidatorParam {
    Signed {
        owner: Address,
        pubkey: String,
        signature: String,
        validator: Address,
    },
    Secret {
        owner: Address,
        prvkey: String,
    },
}

impl ValidatorParam {
    /// The owner account registering the validator.
    #[must_use]
    pub fn owner(&self) -> Address {
        match self {
            ValidatorParam::Signed { owner, .. } | ValidatorParam::Secret { owner, .. } => *owner,
        }
    }
}

// =============================================================================
// EXTRA BALANCES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceParam {
    pub address: Address,
    pub value: Quantity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
}
