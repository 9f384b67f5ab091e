//! Cross-crate scenarios.
//!
//! Every scenario writes its parameter file into a temporary directory and
//! runs the real [`Pipeline`] against an [`InMemoryEnvironment`], so the
//! environment journal and the step log can be asserted on afterwards.

use genesis_runtime::{Pipeline, PipelineConfig, PipelineError, PipelineOutcome, StepLog};
use gf_02_parameters::GenesisParam;
use gf_04_deployment::testing::fixture_artifacts;
use gf_04_deployment::InMemoryEnvironment;
use gf_05_genesis_assembly::FixedClock;
use tempfile::TempDir;

pub mod determinism;
pub mod identity;
pub mod pipeline_flow;

/// Genesis timestamp used by every scenario.
pub const SCENARIO_TIME: u64 = 1_700_000_000;

/// A scratch output directory holding `param` as the default parameter file.
pub fn workspace(param: &GenesisParam) -> (TempDir, PipelineConfig) {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = PipelineConfig::new("regtest", dir.path());
    param.save(&config.param_path).expect("save params");
    (dir, config)
}

/// Runs the pipeline once with the fixture artifacts and a fixed clock.
pub async fn run_pipeline(
    config: &PipelineConfig,
    env: &InMemoryEnvironment,
) -> (Result<PipelineOutcome, PipelineError>, StepLog) {
    let artifacts = fixture_artifacts();
    let mut log = StepLog::new();
    let result = Pipeline::new(config, env, &artifacts)
        .with_clock(FixedClock(SCENARIO_TIME))
        .run(&mut log)
        .await;
    (result, log)
}
