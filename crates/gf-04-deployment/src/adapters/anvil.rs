//! # Anvil Environment
//!
//! JSON-RPC client for an anvil-style dev node. Transactions are sent with
//! `eth_sendTransaction` from unlocked or auto-impersonated accounts, so
//! the node must run with `--auto-impersonate`.
//!
//! | Port method | RPC |
//! |-------------|-----|
//! | `chain_id` | `eth_chainId` |
//! | `accounts` | `eth_accounts` |
//! | `balance` | `eth_getBalance` |
//! | `set_balance` | `anvil_setBalance` |
//! | `set_code` | `anvil_setCode` |
//! | `set_storage_at` | `anvil_setStorageAt` |
//! | `send` | `eth_sendTransaction` + `eth_getTransactionReceipt` |
//! | `call` | `eth_call` |
//! | `dump_state` | `anvil_dumpState` |

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared_types::{decode_hex, encode_hex, parse_u256, u256_to_hex, Address, Bytes, Hash, U256};
use tracing::debug;

use crate::domain::entities::{Receipt, Transaction};
use crate::domain::errors::EnvironmentError;
use crate::ports::environment::Environment;

/// JSON-RPC request structure.
#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

/// JSON-RPC response structure.
#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    status: Option<String>,
    contract_address: Option<Address>,
}

/// Dev node reached over HTTP.
pub struct AnvilEnvironment {
    http_client: reqwest::Client,
    rpc_url: String,
    request_id: AtomicU64,
    poll_interval: Duration,
    receipt_attempts: u32,
}

impl AnvilEnvironment {
    /// Creates a client for the node at `rpc_url`.
    pub fn new(rpc_url: impl Into<String>) -> Result<Self, EnvironmentError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            http_client,
            rpc_url: rpc_url.into(),
            request_id: AtomicU64::new(1),
            poll_interval: Duration::from_millis(200),
            receipt_attempts: 50,
        })
    }

    /// Overrides how receipts are polled for nodes without automine.
    #[must_use]
    pub fn with_receipt_polling(mut self, interval: Duration, attempts: u32) -> Self {
        self.poll_interval = interval;
        self.receipt_attempts = attempts.max(1);
        self
    }

    /// Endpoint this client talks to.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.rpc_url
    }

    /// Make a JSON-RPC call.
    async fn call_rpc<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<R, EnvironmentError> {
        let id = self.request_id.fetch_add(1, Ordering::Relaxed);
        debug!(method, id, "rpc request");

        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };

        let response: JsonRpcResponse = self
            .http_client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(EnvironmentError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        let result = response.result.unwrap_or(Value::Null);
        serde_json::from_value(result)
            .map_err(|e| EnvironmentError::InvalidResponse(format!("{method}: {e}")))
    }

    async fn wait_for_receipt(&self, tx_hash: Hash) -> Result<Receipt, EnvironmentError> {
        for attempt in 0..self.receipt_attempts {
            let receipt: Option<RpcReceipt> = self
                .call_rpc("eth_getTransactionReceipt", json!([tx_hash]))
                .await?;

            if let Some(receipt) = receipt {
                let status = receipt.status.as_deref().map(parse_u256).transpose();
                let status =
                    status.map_err(|e| EnvironmentError::InvalidResponse(e.to_string()))?;
                if status != Some(U256::one()) {
                    return Err(EnvironmentError::Reverted { tx_hash });
                }
                return Ok(Receipt {
                    tx_hash,
                    contract_address: receipt.contract_address,
                });
            }

            if attempt + 1 < self.receipt_attempts {
                tokio::time::sleep(self.poll_interval).await;
            }
        }
        Err(EnvironmentError::MissingReceipt(tx_hash))
    }
}

fn parse_quantity(method: &str, value: &str) -> Result<U256, EnvironmentError> {
    parse_u256(value).map_err(|e| EnvironmentError::InvalidResponse(format!("{method}: {e}")))
}

#[async_trait]
impl Environment for AnvilEnvironment {
    async fn chain_id(&self) -> Result<u64, EnvironmentError> {
        let result: String = self.call_rpc("eth_chainId", json!([])).await?;
        let chain_id = parse_quantity("eth_chainId", &result)?;
        if chain_id > U256::from(u64::MAX) {
            return Err(EnvironmentError::InvalidResponse(format!(
                "eth_chainId: {result} exceeds u64"
            )));
        }
        Ok(chain_id.low_u64())
    }

    async fn accounts(&self) -> Result<Vec<Address>, EnvironmentError> {
        self.call_rpc("eth_accounts", json!([])).await
    }

    async fn balance(&self, address: Address) -> Result<U256, EnvironmentError> {
        let result: String = self
            .call_rpc("eth_getBalance", json!([address, "latest"]))
            .await?;
        parse_quantity("eth_getBalance", &result)
    }

    async fn set_balance(&self, address: Address, balance: U256) -> Result<(), EnvironmentError> {
        let _: Value = self
            .call_rpc("anvil_setBalance", json!([address, u256_to_hex(balance)]))
            .await?;
        Ok(())
    }

    async fn set_code(&self, address: Address, code: Bytes) -> Result<(), EnvironmentError> {
        let _: Value = self
            .call_rpc("anvil_setCode", json!([address, code]))
            .await?;
        Ok(())
    }

    async fn set_storage_at(
        &self,
        address: Address,
        slot: Hash,
        value: Hash,
    ) -> Result<(), EnvironmentError> {
        let _: Value = self
            .call_rpc("anvil_setStorageAt", json!([address, slot, value]))
            .await?;
        Ok(())
    }

    async fn send(&self, tx: Transaction) -> Result<Receipt, EnvironmentError> {
        let mut request = json!({
            "from": tx.from,
            "data": encode_hex(tx.data.as_slice()),
            "value": u256_to_hex(tx.value),
        });
        if let Some(to) = tx.to {
            request["to"] = json!(to);
        }

        let tx_hash: Hash = self
            .call_rpc("eth_sendTransaction", json!([request]))
            .await?;
        debug!(%tx_hash, from = %tx.from, "transaction sent");
        self.wait_for_receipt(tx_hash).await
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, EnvironmentError> {
        let result: String = self
            .call_rpc("eth_call", json!([{ "to": to, "data": data }, "latest"]))
            .await?;
        decode_hex(&result)
            .map(Bytes::from)
            .map_err(|e| EnvironmentError::InvalidResponse(format!("eth_call: {e}")))
    }

    async fn dump_state(&self) -> Result<String, EnvironmentError> {
        self.call_rpc("anvil_dumpState", json!([])).await
    }
}
