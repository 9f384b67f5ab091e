//! Testing Utilities
//!
//! Minimal artifacts for every genesis contract (the entry points the
//! orchestrator calls, with placeholder creation code) and a regtest
//! parameter set. Pair them with
//! [`InMemoryEnvironment`](crate::adapters::memory::InMemoryEnvironment).
//!
//! Available with the `test-utils` feature flag.

use gf_02_parameters::{
    BitcoinParam, BridgeParam, DepositParam, EmptyParam, GenesisParam, GoatTokenParam,
    LockingParam, OwnerParam, RelayerParam, TokenParam, ValidatorParam, VoterParam,
};
use shared_types::{Address, Bytes, Contract, Quantity};

use crate::domain::abi::AbiParam;
use crate::domain::artifact::{AbiItem, Artifact, ArtifactStore};

fn param(name: &str, kind: &str) -> AbiParam {
    AbiParam {
        name: name.to_string(),
        kind: kind.to_string(),
        components: Vec::new(),
    }
}

fn item(kind: &str, name: &str, inputs: &[(&str, &str)]) -> AbiItem {
    AbiItem {
        kind: kind.to_string(),
        name: name.to_string(),
        inputs: inputs.iter().map(|(n, k)| param(n, k)).collect(),
    }
}

fn constructor(inputs: &[(&str, &str)]) -> AbiItem {
    item("constructor", "", inputs)
}

fn function(name: &str, inputs: &[(&str, &str)]) -> AbiItem {
    item("function", name, inputs)
}

fn ownable() -> AbiItem {
    function("transferOwnership", &[("newOwner", "address")])
}

/// ABI of one genesis contract.
#[must_use]
pub fn fixture_abi(contract: Contract) -> Vec<AbiItem> {
    match contract {
        Contract::GoatToken => vec![
            constructor(&[("owner", "address")]),
            function("transfer", &[("to", "address"), ("value", "uint256")]),
            function("balanceOf", &[("account", "address")]),
            function("approve", &[("spender", "address"), ("value", "uint256")]),
        ],
        Contract::GoatDao => vec![constructor(&[("token", "address")])],
        Contract::GoatFoundation => vec![constructor(&[("owner", "address")])],
        Contract::BitcoinCheckpoint => vec![constructor(&[
            ("height", "uint256"),
            ("hash", "bytes32"),
            ("network", "string"),
        ])],
        Contract::WrappedBitcoin | Contract::LockingTokenFactory => vec![constructor(&[])],
        Contract::Bridge => vec![
            constructor(&[("owner", "address")]),
            function("setDepositTax", &[("rate", "uint16"), ("max", "uint256")]),
            function("setWithdrawalTax", &[("rate", "uint16"), ("max", "uint256")]),
            function("setMinDeposit", &[("amount", "uint256")]),
            function("setMinWithdrawal", &[("amount", "uint256")]),
            function("setConfirmationNumber", &[("number", "uint16")]),
            function("setDepositPrefixMagic", &[("magic", "bytes4")]),
            function(
                "deposit",
                &[
                    ("txid", "bytes32"),
                    ("txout", "uint32"),
                    ("target", "address"),
                    ("amount", "uint256"),
                    ("tax", "uint256"),
                ],
            ),
            ownable(),
        ],
        Contract::Relayer => vec![
            constructor(&[("owner", "address")]),
            function("addVoter", &[("voter", "address"), ("vhash", "bytes32")]),
            ownable(),
        ],
        Contract::Locking => vec![
            constructor(&[
                ("owner", "address"),
                ("token", "address"),
                ("totalReward", "uint256"),
            ]),
            function(
                "addToken",
                &[
                    ("token", "address"),
                    ("weight", "uint64"),
                    ("limit", "uint256"),
                    ("threshold", "uint256"),
                ],
            ),
            function("approve", &[("validator", "address")]),
            function(
                "create",
                &[
                    ("pubkey", "bytes32[2]"),
                    ("sigR", "bytes32"),
                    ("sigS", "bytes32"),
                    ("sigV", "uint8"),
                ],
            ),
            function("openClaim", &[]),
            ownable(),
        ],
    }
}

/// Artifact of one genesis contract; creation code is unique per contract.
#[must_use]
pub fn fixture_artifact(contract: Contract) -> Artifact {
    let index = Contract::ALL
        .iter()
        .position(|c| *c == contract)
        .unwrap_or_default() as u8;
    Artifact {
        name: contract.artifact_name().to_string(),
        abi: fixture_abi(contract),
        bytecode: Bytes::from(vec![0x60, 0x80, 0x60, 0x40, 0x52, index]),
    }
}

/// Store holding all genesis contract artifacts.
#[must_use]
pub fn fixture_artifacts() -> ArtifactStore {
    ArtifactStore::from_artifacts(Contract::ALL.into_iter().map(fixture_artifact))
}

/// Store missing one contract's artifact.
#[must_use]
pub fn fixture_artifacts_without(missing: Contract) -> ArtifactStore {
    ArtifactStore::from_artifacts(
        Contract::ALL
            .into_iter()
            .filter(|c| *c != missing)
            .map(fixture_artifact),
    )
}

/// Chain id of the in-memory environment.
pub const FIXTURE_CHAIN_ID: u64 = 31337;

/// Secret key of the fixture validator.
pub const FIXTURE_SECRET: &str =
    "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

/// Native creation threshold of the fixture, in satoshi.
pub const FIXTURE_THRESHOLD_SAT: u64 = 1000;

/// Owner of every fixture contract.
pub const FIXTURE_OWNER: Address = Address::new([0x0a; 20]);

/// Owner of the fixture validator.
pub const FIXTURE_VALIDATOR_OWNER: Address = Address::new([0x0b; 20]);

/// Strict regtest parameters: one secret-form validator whose owner is
/// pre-funded by a single seed deposit of `deposit_sat`.
#[must_use]
pub fn fixture_param(deposit_sat: u64) -> GenesisParam {
    GenesisParam {
        goat_token: GoatTokenParam {
            owner: FIXTURE_OWNER,
            transfers: Vec::new(),
        },
        goat_dao: EmptyParam::default(),
        goat_foundation: OwnerParam {
            owner: FIXTURE_OWNER,
        },
        bridge: BridgeParam {
            owner: FIXTURE_OWNER,
            deposit_prefix_magic: "GTT0".into(),
            deposit_tax_bp: 2,
            max_deposit_tax_in_sat: 1_000_000,
            withdrawal_tax_bp: 20,
            max_withdrawal_tax_in_sat: 2_000_000,
            min_deposit_in_sat: 100_000,
            min_withdrawal_in_sat: 100_000,
            confirmation_number: 6,
            deposits: vec![DepositParam {
                txid: "e3d8ffcc9e8e0a6e3a9d1b9c3d4f1a2b3c4d5e6f708192a3b4c5d6e7f8091a2b".into(),
                txout: 0,
                address: FIXTURE_VALIDATOR_OWNER,
                satoshi: deposit_sat,
            }],
        },
        bitcoin: BitcoinParam {
            height: 0,
            hash: "0f9188f13cb7b2c71f2a335e3a4fc328bf5beb436012afca590b1a11466e2206".into(),
            network: "regtest".into(),
        },
        wrapped_bitcoin: EmptyParam::default(),
        relayer: RelayerParam {
            owner: FIXTURE_OWNER,
            voters: vec![VoterParam::Derived {
                address: Address::new([0x0c; 20]),
                vote_key_hash: "11".repeat(32),
            }],
        },
        locking: LockingParam {
            owner: FIXTURE_OWNER,
            tokens: vec![
                TokenParam {
                    address: Address::ZERO,
                    weight: 12000,
                    limit: Quantity::ZERO,
                    threshold: Quantity::new(shared_types::sat_to_wei(FIXTURE_THRESHOLD_SAT)),
                },
                TokenParam {
                    address: Contract::GoatToken.canonical_address(),
                    weight: 1,
                    limit: Quantity::ZERO,
                    threshold: Quantity::ZERO,
                },
            ],
            validators: vec![ValidatorParam::Secret {
                owner: FIXTURE_VALIDATOR_OWNER,
                prvkey: FIXTURE_SECRET.into(),
            }],
            allow_list: Vec::new(),
            strict: true,
            gas: None,
            claim: false,
        },
        locking_token_factory: EmptyParam::default(),
        balances: Vec::new(),
        consensus: Default::default(),
    }
}
