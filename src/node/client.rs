//! JSON-RPC node client over HTTP: `BcosRpc`.
//!
//! One method per node RPC. Read calls retry with [`RetryPolicy::Idempotent`];
//! transaction submission never retries.

use async_trait::async_trait;
use primitive_types::U256;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::retry::{RetryConfig, RetryPolicy};
use super::{NodeApi, TransactionReceipt};
use crate::error::NodeError;
use crate::shared::{parse_hex_u64, to_hex_prefixed, TxHash};

/// Low-level JSON-RPC client for a FISCO-BCOS 2.x node.
#[derive(Clone)]
pub struct BcosRpc {
    url: String,
    client: Client,
    next_id: Arc<AtomicU64>,
}

impl BcosRpc {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, NodeError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()?;
        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            client,
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    // ── Internal JSON-RPC methods ────────────────────────────────────────

    async fn call(
        &self,
        method: &str,
        params: Value,
        retry: RetryPolicy,
    ) -> Result<Value, NodeError> {
        let config = match &retry {
            RetryPolicy::None => {
                return self.do_call(method, &params).await;
            }
            RetryPolicy::Idempotent => RetryConfig::idempotent(),
            RetryPolicy::Custom(c) => c.clone(),
        };

        let mut last_error = None;

        for attempt in 0..=config.max_retries {
            match self.do_call(method, &params).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if config.is_retryable(&e) && attempt < config.max_retries {
                        let delay = config.delay_for_attempt(attempt);
                        tracing::debug!(
                            attempt = attempt + 1,
                            max = config.max_retries,
                            delay_ms = delay.as_millis() as u64,
                            "Retrying {} against {}",
                            method,
                            self.url
                        );
                        futures_timer::Delay::new(delay).await;
                        last_error = Some(e);
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(NodeError::MaxRetriesExceeded {
            attempts: config.max_retries + 1,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        })
    }

    async fn do_call(&self, method: &str, params: &Value) -> Result<Value, NodeError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": self.next_id.fetch_add(1, Ordering::Relaxed),
            "method": method,
            "params": params,
        });

        let resp = self.client.post(&self.url).json(&payload).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NodeError::ServerError {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = resp.json().await?;
        rpc_result(value)
    }
}

#[async_trait]
impl NodeApi for BcosRpc {
    async fn chain_id(&self) -> Result<U256, NodeError> {
        let value = self
            .call("getClientVersion", json!([]), RetryPolicy::Idempotent)
            .await?;
        parse_chain_id(&value)
    }

    async fn block_number(&self, group_id: u64) -> Result<u64, NodeError> {
        let value = self
            .call("getBlockNumber", json!([group_id]), RetryPolicy::Idempotent)
            .await?;
        parse_block_number(&value)
    }

    async fn send_raw_transaction(
        &self,
        group_id: u64,
        raw_tx: &[u8],
    ) -> Result<TxHash, NodeError> {
        let value = self
            .call(
                "sendRawTransaction",
                json!([group_id, to_hex_prefixed(raw_tx)]),
                RetryPolicy::None,
            )
            .await?;
        parse_tx_hash(&value)
    }

    async fn transaction_receipt(
        &self,
        group_id: u64,
        tx_hash: &TxHash,
    ) -> Result<Option<TransactionReceipt>, NodeError> {
        let value = self
            .call(
                "getTransactionReceipt",
                json!([group_id, tx_hash.as_str()]),
                RetryPolicy::Idempotent,
            )
            .await?;
        parse_receipt(value)
    }
}

// ─── Response parsing ────────────────────────────────────────────────────────

/// Unwrap a JSON-RPC response body into its `result`.
fn rpc_result(mut body: Value) -> Result<Value, NodeError> {
    if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or(-32_000);
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        return Err(NodeError::Rpc { code, message });
    }

    body.get_mut("result")
        .map(Value::take)
        .ok_or(NodeError::UnexpectedResult { expected: "result" })
}

/// `getClientVersion` reports the chain id as a decimal string.
fn parse_chain_id(version: &Value) -> Result<U256, NodeError> {
    let raw = version
        .get("Chain Id")
        .and_then(Value::as_str)
        .ok_or(NodeError::UnexpectedResult {
            expected: "Chain Id",
        })?;
    U256::from_dec_str(raw.trim()).map_err(|_| NodeError::UnexpectedResult {
        expected: "decimal Chain Id",
    })
}

fn parse_block_number(value: &Value) -> Result<u64, NodeError> {
    value
        .as_str()
        .and_then(|hex| parse_hex_u64(hex).ok())
        .ok_or(NodeError::UnexpectedResult {
            expected: "hex block number",
        })
}

fn parse_tx_hash(value: &Value) -> Result<TxHash, NodeError> {
    value
        .as_str()
        .map(TxHash::from)
        .ok_or(NodeError::UnexpectedResult {
            expected: "transaction hash",
        })
}

/// A `null` result means the transaction has not been mined yet.
fn parse_receipt(value: Value) -> Result<Option<TransactionReceipt>, NodeError> {
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|_| NodeError::UnexpectedResult {
            expected: "transaction receipt",
        })
}
