//! # Step Log
//!
//! Structured progress of one pipeline run: which step ran, how long it
//! took, and how it ended. Recorded independently of the tracing output so
//! callers and tests can inspect a run after the fact.

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{info, warn};

/// Pipeline steps in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    CheckOutput,
    LoadParams,
    ResolveChain,
    Validate,
    ProbeService,
    Deploy,
    CaptureState,
    Relocate,
    Assemble,
    SubmitService,
    Write,
}

impl Step {
    pub const ALL: [Step; 11] = [
        Step::CheckOutput,
        Step::LoadParams,
        Step::ResolveChain,
        Step::Validate,
        Step::ProbeService,
        Step::Deploy,
        Step::CaptureState,
        Step::Relocate,
        Step::Assemble,
        Step::SubmitService,
        Step::Write,
    ];

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Step::CheckOutput => "check-output",
            Step::LoadParams => "load-params",
            Step::ResolveChain => "resolve-chain",
            Step::Validate => "validate",
            Step::ProbeService => "probe-service",
            Step::Deploy => "deploy",
            Step::CaptureState => "capture-state",
            Step::Relocate => "relocate",
            Step::Assemble => "assemble",
            Step::SubmitService => "submit-service",
            Step::Write => "write",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Completed,
    /// Not needed for this run; carries the reason.
    Skipped(String),
    /// Carries the error message.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub step: Step,
    pub duration: Duration,
    pub outcome: StepOutcome,
}

#[derive(Debug, Default, Clone)]
pub struct StepLog {
    records: Vec<StepRecord>,
}

impl StepLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `work` as `step`, timing it and recording how it ended.
    pub async fn run<T, E, F>(&mut self, step: Step, work: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let started = Instant::now();
        let result = work.await;
        let duration = started.elapsed();

        let outcome = match &result {
            Ok(_) => {
                info!(step = %step, elapsed_ms = duration.as_millis() as u64, "step completed");
                StepOutcome::Completed
            }
            Err(err) => {
                warn!(step = %step, elapsed_ms = duration.as_millis() as u64, error = %err, "step failed");
                StepOutcome::Failed(err.to_string())
            }
        };
        self.records.push(StepRecord {
            step,
            duration,
            outcome,
        });
        result
    }

    /// Records `step` as skipped.
    pub fn skip(&mut self, step: Step, reason: impl Into<String>) {
        let reason = reason.into();
        info!(step = %step, reason = %reason, "step skipped");
        self.records.push(StepRecord {
            step,
            duration: Duration::ZERO,
            outcome: StepOutcome::Skipped(reason),
        });
    }

    #[must_use]
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Steps in the order they were recorded.
    #[must_use]
    pub fn steps(&self) -> Vec<Step> {
        self.records.iter().map(|r| r.step).collect()
    }

    #[must_use]
    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.records
            .iter()
            .find(|r| r.step == step)
            .map(|r| &r.outcome)
    }

    /// Wall time of all recorded steps.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.records.iter().map(|r| r.duration).sum()
    }
}
