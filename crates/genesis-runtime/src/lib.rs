//! # Genesis Runtime
//!
//! Wires the pipeline stages into one run and exposes it to the
//! `genesis-forge` binary.
//!
//! ## Modules
//!
//! | Module | Role |
//! |--------|------|
//! | [`cli`] | Flags, each with a `GENESIS_*` environment fallback |
//! | [`config`] | Typed, checked form of one invocation |
//! | [`pipeline`] | Step-by-step driver |
//! | [`steps`] | Structured log of step name, duration and outcome |
//! | [`errors`] | Top-level error and its failure class |
//!
//! ## Idempotency
//!
//! An existing `<output-dir>/<name>.json` ends the run successfully before
//! any environment call, unless `--force` is set.

pub mod cli;
pub mod config;
pub mod errors;
pub mod pipeline;
pub mod steps;

pub use cli::Cli;
pub use config::PipelineConfig;
pub use errors::{ErrorCategory, PipelineError};
pub use pipeline::{Pipeline, PipelineOutcome};
pub use steps::{Step, StepLog, StepOutcome, StepRecord};
