//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;
use shared_types::Address;

/// Build the genesis allocation of a new chain.
#[derive(Parser, Debug, Clone)]
#[command(name = "genesis-forge")]
#[command(about = "Deploy the system contracts on a dev node and write the genesis file")]
#[command(version)]
pub struct Cli {
    /// JSON-RPC URL of the ephemeral dev node
    #[arg(long, env = "GENESIS_RPC", default_value = "http://127.0.0.1:8545")]
    pub rpc: String,

    /// Network name; selects the default parameter and output files
    #[arg(long, env = "GENESIS_NAME", default_value = "regtest")]
    pub name: String,

    /// Parameter file [default: <output-dir>/<name>-config.json]
    #[arg(long, env = "GENESIS_PARAM")]
    pub param: Option<PathBuf>,

    /// Directory receiving <name>.json
    #[arg(long, env = "GENESIS_OUTPUT_DIR", default_value = "./genesis")]
    pub output_dir: PathBuf,

    /// Directory holding compiled contract artifacts
    #[arg(long, env = "GENESIS_ARTIFACTS", default_value = "./artifacts/contracts")]
    pub artifacts: PathBuf,

    /// Chain id written to the genesis file [default: the node's]
    #[arg(long, env = "GENESIS_CHAIN_ID")]
    pub chain_id: Option<u64>,

    /// Overwrite an existing genesis file
    #[arg(long, env = "GENESIS_FORCE")]
    pub force: bool,

    /// Development account funded at genesis (requires --amount)
    #[arg(long, env = "GENESIS_FAUCET")]
    pub faucet: Option<Address>,

    /// Faucet balance in ether, e.g. "1000" or "0.5"
    #[arg(long, env = "GENESIS_AMOUNT")]
    pub amount: Option<String>,

    /// External genesis service that returns the consensus header
    #[arg(long, env = "GENESIS_SERVICE")]
    pub genesis_service: Option<String>,

    /// Genesis template replacing the built-in one
    #[arg(long, env = "GENESIS_TEMPLATE")]
    pub template: Option<PathBuf>,

    /// Verbose logging
    #[arg(long, env = "GENESIS_DEBUG")]
    pub debug: bool,
}
