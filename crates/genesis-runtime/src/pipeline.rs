//! # Genesis Pipeline
//!
//! Drives one run from parameter file to genesis file. Each step is awaited
//! to completion before the next one starts and recorded in a [`StepLog`].
//!
//! ```text
//! check-output → load-params → resolve-chain → validate → probe-service
//!   → deploy → capture-state → relocate → assemble → submit-service → write
//! ```
//!
//! Nothing is written until every earlier step has succeeded, so a failed
//! run leaves the output directory as it found it.

use std::path::{Path, PathBuf};

use gf_02_parameters::{
    store_consensus_header, validate, GenesisParam, ValidatedParams, ValidationContext,
};
use gf_03_state_capture::{decode_dump, relocate, Relocated, StateDump};
use gf_04_deployment::{ArtifactStore, DeploymentOrchestrator, DeploymentReport, Environment};
use gf_05_genesis_assembly::{
    load_template, write_genesis, AssemblyError, AssemblyInput, Clock, GenesisAssembler,
    GenesisDocument, SystemClock,
};
use gf_06_genesis_service::GenesisServiceClient;
use serde_json::Value;
use shared_types::DeployedContract;
use tracing::{debug, info, instrument};

use crate::config::PipelineConfig;
use crate::errors::PipelineError;
use crate::steps::{Step, StepLog};

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// Output already present and `force` not set.
    Skipped { path: PathBuf },
    Written {
        path: PathBuf,
        chain_id: u64,
        /// Deployment table, ephemeral to canonical.
        contracts: Vec<DeployedContract>,
        /// Number of allocation entries.
        accounts: usize,
        /// Consensus header returned by the genesis service.
        header: Option<Value>,
    },
}

pub struct Pipeline<'a, E: Environment + ?Sized, C: Clock = SystemClock> {
    config: &'a PipelineConfig,
    env: &'a E,
    artifacts: &'a ArtifactStore,
    service: Option<&'a GenesisServiceClient>,
    clock: C,
}

impl<'a, E: Environment + ?Sized> Pipeline<'a, E, SystemClock> {
    pub fn new(config: &'a PipelineConfig, env: &'a E, artifacts: &'a ArtifactStore) -> Self {
        Self {
            config,
            env,
            artifacts,
            service: None,
            clock: SystemClock,
        }
    }
}

impl<'a, E: Environment + ?Sized, C: Clock + Clone> Pipeline<'a, E, C> {
    /// Adds the external genesis service round trip.
    #[must_use]
    pub fn with_service(mut self, service: &'a GenesisServiceClient) -> Self {
        self.service = Some(service);
        self
    }

    /// Replaces the clock stamping the genesis timestamp.
    #[must_use]
    pub fn with_clock<D: Clock + Clone>(self, clock: D) -> Pipeline<'a, E, D> {
        Pipeline {
            config: self.config,
            env: self.env,
            artifacts: self.artifacts,
            service: self.service,
            clock,
        }
    }

    /// Runs every step, recording each one in `log`.
    #[instrument(skip_all, fields(name = %self.config.name))]
    pub async fn run(&self, log: &mut StepLog) -> Result<PipelineOutcome, PipelineError> {
        let output = self.config.output_path();
        let exists = log
            .run(Step::CheckOutput, async {
                Ok::<_, PipelineError>(output.exists())
            })
            .await?;
        if exists && !self.config.force {
            info!(path = %output.display(), "genesis already created, use --force to rebuild");
            return Ok(PipelineOutcome::Skipped { path: output });
        }

        let param = log
            .run(Step::LoadParams, async {
                GenesisParam::load(&self.config.param_path)
            })
            .await?;

        let chain_id = log.run(Step::ResolveChain, self.resolve_chain()).await?;

        let validated = log
            .run(Step::Validate, async {
                validate(&param, &ValidationContext { chain_id })
            })
            .await?;

        match self.service {
            Some(service) => log.run(Step::ProbeService, service.ping()).await?,
            None => log.skip(Step::ProbeService, "no genesis service configured"),
        }

        let report = log.run(Step::Deploy, self.deploy(&validated)).await?;

        let dump = log.run(Step::CaptureState, self.capture()).await?;

        let relocated = log
            .run(Step::Relocate, async {
                relocate(dump, &report.contracts, validated.locking.gas_revenue)
            })
            .await?;

        let genesis = log
            .run(Step::Assemble, async {
                self.assemble(chain_id, &validated, &relocated)
            })
            .await?;

        let header = match self.service {
            Some(service) => Some(log.run(Step::SubmitService, service.submit(&genesis)).await?),
            None => {
                log.skip(Step::SubmitService, "no genesis service configured");
                None
            }
        };

        log.run(Step::Write, async {
            self.write(&output, &genesis, header.as_ref())
        })
        .await?;

        Ok(PipelineOutcome::Written {
            path: output,
            chain_id,
            contracts: report.contracts,
            accounts: genesis.alloc.len(),
            header,
        })
    }

    async fn resolve_chain(&self) -> Result<u64, PipelineError> {
        match self.config.chain_id {
            Some(chain_id) => {
                debug!(chain_id, "using configured chain id");
                Ok(chain_id)
            }
            None => {
                let chain_id = self.env.chain_id().await?;
                debug!(chain_id, "using environment chain id");
                Ok(chain_id)
            }
        }
    }

    async fn deploy(&self, validated: &ValidatedParams) -> Result<DeploymentReport, PipelineError> {
        let signer = self
            .env
            .accounts()
            .await?
            .first()
            .copied()
            .ok_or(PipelineError::NoSigner)?;
        info!(%signer, "deploying genesis contracts");
        let orchestrator = DeploymentOrchestrator::new(self.env, self.artifacts);
        Ok(orchestrator.run(validated, signer).await?)
    }

    async fn capture(&self) -> Result<StateDump, PipelineError> {
        let blob = self.env.dump_state().await?;
        let dump = decode_dump(&blob)?;
        debug!(accounts = dump.accounts.len(), block = dump.best_block_number, "state captured");
        Ok(dump)
    }

    fn assemble(
        &self,
        chain_id: u64,
        validated: &ValidatedParams,
        relocated: &Relocated,
    ) -> Result<GenesisDocument, AssemblyError> {
        let template = match &self.config.template {
            Some(path) => load_template(path)?,
            None => GenesisDocument::default(),
        };
        GenesisAssembler::with_clock(template, self.clock.clone()).assemble(AssemblyInput {
            chain_id,
            balances: &validated.balances,
            relocated,
            faucet: self.config.faucet,
        })
    }

    /// The genesis file goes last: its presence marks a finished run.
    fn write(
        &self,
        output: &Path,
        genesis: &GenesisDocument,
        header: Option<&Value>,
    ) -> Result<(), PipelineError> {
        if let Some(header) = header {
            store_consensus_header(&self.config.param_path, header)?;
        }
        write_genesis(output, genesis)?;
        Ok(())
    }
}
