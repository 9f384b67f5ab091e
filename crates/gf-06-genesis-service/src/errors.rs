//! Service client errors.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Service not reachable or unhealthy
    #[error("Genesis service at {url} unavailable: {reason}")]
    Unavailable { url: String, reason: String },

    /// Service refused the genesis document
    #[error("Genesis service rejected the document ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// Request failed after the service was reached
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Response body is not the expected JSON
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::Http(err.to_string())
    }
}
