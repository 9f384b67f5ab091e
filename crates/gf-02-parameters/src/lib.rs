//! # Genesis Parameters (GF-02)
//!
//! The declarative input of the pipeline and the validator that turns it
//! into a byte-level, fully checked form before any deployment call.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): parameter shape, validated shape, checks
//! - **Adapters** (`adapters/`): JSON file load/save and the in-place
//!   consensus header rewrite
//!
//! ## Checks
//!
//! | Area | Rule |
//! |------|------|
//! | Bridge | tax basis points in [0, 10000], prefix magic 4 bytes, confirmations ≥ 1 |
//! | Deposits | txid unprefixed 32-byte hex, byte-reversed for use |
//! | Checkpoint | 32-byte hash, byte-reversed, named network |
//! | Tokens | native threshold non-zero, only the reward token may add one |
//! | Validators | declared address = derived, ownership proof verifies |
//! | Strict mode | seed deposits to each owner = native threshold exactly |
//! | Voters | compressed tx key, 96-byte vote key |

pub mod adapters;
pub mod domain;

pub use adapters::json_file::{store_consensus_header, CONSENSUS_HEADER_FIELD};
pub use domain::errors::ParamError;
pub use domain::param::{
    BalanceParam, BitcoinParam, BridgeParam, DepositParam, EmptyParam, GenesisParam,
    GoatTokenParam, LockingParam, OwnerParam, RelayerParam, TokenParam, TransferParam,
    ValidatorParam, VoterParam,
};
pub use domain::validated::{
    Checkpoint, ExtraBalance, FundingPlan, LockingToken, SeedDeposit, ValidatedBridge,
    ValidatedLocking, ValidatedParams, ValidatedRelayer, ValidatedToken, ValidatedValidator,
    Voter,
};
pub use domain::validator::{decode_prefix_magic, validate, ValidationContext, MAX_BASIS_POINTS};
