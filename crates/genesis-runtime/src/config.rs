//! # Pipeline Configuration
//!
//! The typed form of one invocation. Built from [`Cli`] so every flag
//! combination is checked before anything touches the network or disk.

use std::path::{Path, PathBuf};

use gf_05_genesis_assembly::Faucet;
use shared_types::Quantity;

use crate::cli::Cli;
use crate::errors::PipelineError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Dev node JSON-RPC URL.
    pub rpc_url: String,
    /// Network name.
    pub name: String,
    pub param_path: PathBuf,
    pub output_dir: PathBuf,
    pub artifacts_dir: PathBuf,
    /// Overrides the node's chain id.
    pub chain_id: Option<u64>,
    pub force: bool,
    pub faucet: Option<Faucet>,
    pub service_url: Option<String>,
    pub template: Option<PathBuf>,
    pub debug: bool,
}

impl PipelineConfig {
    /// Configuration for `name` with every other setting at its default.
    #[must_use]
    pub fn new(name: impl Into<String>, output_dir: impl Into<PathBuf>) -> Self {
        let name = name.into();
        let output_dir = output_dir.into();
        Self {
            rpc_url: "http://127.0.0.1:8545".into(),
            param_path: default_param_path(&output_dir, &name),
            name,
            output_dir,
            artifacts_dir: PathBuf::from("./artifacts/contracts"),
            chain_id: None,
            force: false,
            faucet: None,
            service_url: None,
            template: None,
            debug: false,
        }
    }

    /// `<output-dir>/<name>.json`.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.json", self.name))
    }
}

fn default_param_path(output_dir: &Path, name: &str) -> PathBuf {
    output_dir.join(format!("{name}-config.json"))
}

impl TryFrom<Cli> for PipelineConfig {
    type Error = PipelineError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        if cli.name.trim().is_empty() {
            return Err(PipelineError::Config("network name is empty".into()));
        }

        let faucet = match (cli.faucet, cli.amount.as_deref()) {
            (None, None) => None,
            (Some(address), Some(amount)) => {
                let amount = Quantity::parse_ether(amount)
                    .map_err(|e| PipelineError::Config(format!("--amount: {e}")))?;
                Some(Faucet {
                    address,
                    amount: amount.value(),
                })
            }
            (Some(_), None) => {
                return Err(PipelineError::Config("--faucet requires --amount".into()))
            }
            (None, Some(_)) => {
                return Err(PipelineError::Config("--amount requires --faucet".into()))
            }
        };

        let param_path = cli
            .param
            .unwrap_or_else(|| default_param_path(&cli.output_dir, &cli.name));

        Ok(Self {
            rpc_url: cli.rpc,
            name: cli.name,
            param_path,
            output_dir: cli.output_dir,
            artifacts_dir: cli.artifacts,
            chain_id: cli.chain_id,
            force: cli.force,
            faucet,
            service_url: cli.genesis_service,
            template: cli.template,
            debug: cli.debug,
        })
    }
}
