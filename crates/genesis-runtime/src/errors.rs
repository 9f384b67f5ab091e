//! # Pipeline Errors
//!
//! One variant per stage, each wrapping that stage's own error unchanged.
//! [`PipelineError::category`] sorts a failure into the class an operator
//! acts on.

use gf_02_parameters::ParamError;
use gf_03_state_capture::CaptureError;
use gf_04_deployment::{DeploymentError, EnvironmentError};
use gf_05_genesis_assembly::AssemblyError;
use gf_06_genesis_service::ServiceError;
use thiserror::Error;

/// Failure class of a pipeline error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Parameter file rejected before any network call
    Validation,
    /// Declared and observed values disagree
    Consistency,
    /// Dev node call failed
    Remote,
    /// External genesis service failed
    ExternalService,
    /// Invocation, artifacts or local files unusable
    Configuration,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    // =========================================================================
    // INVOCATION
    // =========================================================================
    /// Invalid flag combination or value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Dev node reported no unlocked accounts
    #[error("Environment has no unlocked account to sign deployments")]
    NoSigner,

    // =========================================================================
    // STAGES
    // =========================================================================
    #[error("Parameters: {0}")]
    Param(#[from] ParamError),

    #[error("Environment: {0}")]
    Environment(#[from] EnvironmentError),

    #[error("Deployment: {0}")]
    Deployment(#[from] DeploymentError),

    #[error("State capture: {0}")]
    Capture(#[from] CaptureError),

    #[error("Assembly: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("Genesis service: {0}")]
    Service(#[from] ServiceError),
}

impl PipelineError {
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) => ErrorCategory::Configuration,
            Self::NoSigner | Self::Environment(_) => ErrorCategory::Remote,
            Self::Param(err) => match err {
                ParamError::AddressMismatch { .. } | ParamError::FundingMismatch { .. } => {
                    ErrorCategory::Consistency
                }
                ParamError::Io { .. } => ErrorCategory::Configuration,
                _ => ErrorCategory::Validation,
            },
            Self::Deployment(err) => match err {
                DeploymentError::Environment(_) => ErrorCategory::Remote,
                DeploymentError::Abi(_) | DeploymentError::Artifact(_) => {
                    ErrorCategory::Configuration
                }
                DeploymentError::Capture(_)
                | DeploymentError::MissingAccount(_)
                | DeploymentError::FundingMismatch { .. }
                | DeploymentError::InsufficientTokenBalance { .. } => ErrorCategory::Consistency,
            },
            Self::Capture(_) => ErrorCategory::Consistency,
            Self::Assembly(err) => match err {
                AssemblyError::MissingContract(_) | AssemblyError::AccountCountMismatch { .. } => {
                    ErrorCategory::Consistency
                }
                _ => ErrorCategory::Configuration,
            },
            Self::Service(_) => ErrorCategory::ExternalService,
        }
    }
}
