//! Genesis service client.
//!
//! The service commits a genesis document and answers with the resulting
//! block header, which the consensus layer stores as its genesis header.

use std::time::Duration;

use gf_05_genesis_assembly::GenesisDocument;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::ServiceError;

pub struct GenesisServiceClient {
    client: Client,
    base_url: String,
}

impl GenesisServiceClient {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Checks the service answers before any deployment work starts.
    pub async fn ping(&self) -> Result<(), ServiceError> {
        let unavailable = |reason: String| ServiceError::Unavailable {
            url: self.base_url.clone(),
            reason,
        };

        let response = self
            .client
            .get(self.endpoint("/"))
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!("status {status}")));
        }
        debug!(url = %self.base_url, "genesis service reachable");
        Ok(())
    }

    /// Submits the genesis document and returns the consensus genesis header.
    pub async fn submit(&self, genesis: &GenesisDocument) -> Result<Value, ServiceError> {
        let response = self
            .client
            .post(self.endpoint("/genesis"))
            .json(genesis)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::OK {
            return Err(ServiceError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let header: Value =
            serde_json::from_str(&body).map_err(|e| ServiceError::Parse(e.to_string()))?;
        info!(hash = ?header.get("hash"), "genesis header received");
        Ok(header)
    }
}
