//! # Genesis Forge
//!
//! Builds `<output-dir>/<name>.json` from a parameter file by deploying the
//! system contracts on an anvil dev node.
//!
//! ```text
//! anvil &
//! genesis-forge --name regtest --genesis-service http://127.0.0.1:8080
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use genesis_runtime::{Cli, Pipeline, PipelineConfig, PipelineOutcome, StepLog, StepOutcome};
use gf_04_deployment::{AnvilEnvironment, ArtifactStore};
use gf_06_genesis_service::GenesisServiceClient;

fn init_tracing(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn log_summary(log: &StepLog) {
    for record in log.records() {
        let elapsed_ms = record.duration.as_millis() as u64;
        match &record.outcome {
            StepOutcome::Completed => info!(step = %record.step, elapsed_ms, "ok"),
            StepOutcome::Skipped(reason) => info!(step = %record.step, %reason, "skipped"),
            StepOutcome::Failed(reason) => error!(step = %record.step, elapsed_ms, %reason, "failed"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let config = PipelineConfig::try_from(cli)?;
    let env = AnvilEnvironment::new(config.rpc_url.as_str())
        .with_context(|| format!("connecting to {}", config.rpc_url))?;
    let artifacts = ArtifactStore::new(&config.artifacts_dir);
    let service = config
        .service_url
        .as_deref()
        .map(GenesisServiceClient::new)
        .transpose()?;

    let mut pipeline = Pipeline::new(&config, &env, &artifacts);
    if let Some(service) = &service {
        pipeline = pipeline.with_service(service);
    }

    let mut log = StepLog::new();
    let result = pipeline.run(&mut log).await;
    log_summary(&log);

    match result {
        Ok(PipelineOutcome::Skipped { path }) => {
            info!(path = %path.display(), "genesis has been created already");
            Ok(())
        }
        Ok(PipelineOutcome::Written {
            path,
            chain_id,
            accounts,
            ..
        }) => {
            info!(
                path = %path.display(),
                chain_id,
                accounts,
                elapsed_ms = log.total().as_millis() as u64,
                "genesis created"
            );
            Ok(())
        }
        Err(err) => {
            error!(category = ?err.category(), "{err}");
            Err(err.into())
        }
    }
}
