//! Wire types for gateway requests and responses.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::TransactionArg;
use crate::error::GatewayError;
use crate::shared::serde_util::{base64_bytes, dec_u256};
use crate::shared::{ReturnCode, TxHash};

// ─── Request ─────────────────────────────────────────────────────────────────

/// A raw inbound request before the function name is resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct InputArg {
    pub function_name: String,
    /// Operation-specific argument; `Null` when the request carried none.
    pub function_arg: Value,
    pub transaction_arg: TransactionArg,
    /// Protocol version.
    pub v: String,
}

impl InputArg {
    /// Parse a request body.
    ///
    /// `functionArg` and `transactionArg` may each be an object or a
    /// JSON-encoded string. An empty body is [`GatewayError::InputNull`];
    /// anything undecodable or missing `functionName` is
    /// [`GatewayError::Input`].
    pub fn parse(raw: &str) -> Result<Self, GatewayError> {
        if raw.trim().is_empty() {
            return Err(GatewayError::InputNull);
        }
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| GatewayError::Input(format!("request is not valid JSON: {}", e)))?;
        let Value::Object(mut fields) = value else {
            return Err(GatewayError::Input("request must be a JSON object".into()));
        };

        let function_name = match fields.remove("functionName") {
            Some(Value::String(name)) if !name.trim().is_empty() => name,
            _ => return Err(GatewayError::Input("functionName is required".into())),
        };
        let function_arg = match fields.remove("functionArg") {
            None | Some(Value::Null) => Value::Null,
            Some(Value::String(s)) if s.trim().is_empty() => Value::Null,
            Some(Value::String(s)) => serde_json::from_str(&s)
                .map_err(|e| GatewayError::Input(format!("functionArg: {}", e)))?,
            Some(other) => other,
        };
        let transaction_arg = match fields.remove("transactionArg") {
            None | Some(Value::Null) => TransactionArg::default(),
            Some(Value::String(s)) if s.trim().is_empty() => TransactionArg::default(),
            Some(Value::String(s)) => serde_json::from_str(&s)
                .map_err(|e| GatewayError::Input(format!("transactionArg: {}", e)))?,
            Some(other) => serde_json::from_value(other)
                .map_err(|e| GatewayError::Input(format!("transactionArg: {}", e)))?,
        };
        let v = match fields.remove("v") {
            Some(Value::String(v)) => v,
            _ => String::new(),
        };

        Ok(Self {
            function_name,
            function_arg,
            transaction_arg,
            v,
        })
    }
}

// ─── Response ────────────────────────────────────────────────────────────────

/// The uniform response envelope returned by every entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponseData<T> {
    pub resp_body: Option<T>,
    pub error_code: i32,
    pub error_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loopback: Option<Value>,
}

impl<T> HttpResponseData<T> {
    pub fn success(body: T) -> Self {
        Self {
            resp_body: Some(body),
            error_code: ReturnCode::SUCCESS.code,
            error_message: ReturnCode::SUCCESS.message.into_owned(),
            loopback: None,
        }
    }

    pub fn failure(code: ReturnCode) -> Self {
        Self {
            resp_body: None,
            error_code: code.code,
            error_message: code.message.into_owned(),
            loopback: None,
        }
    }

    pub fn with_loopback(mut self, loopback: Option<Value>) -> Self {
        self.loopback = loopback;
        self
    }

    pub fn is_success(&self) -> bool {
        self.error_code == ReturnCode::SUCCESS.code
    }
}

// ─── Phase outputs ───────────────────────────────────────────────────────────

/// What the encode phase hands back for offline signing.
///
/// The client signs `encodedTransaction` (Keccak-256 of it under ECDSA) and
/// echoes `nonce`, `data`, `blockLimit` and `chainId` into the send phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodeOutput {
    #[serde(with = "base64_bytes")]
    pub encoded_transaction: Vec<u8>,
    /// `0x`-prefixed hex call payload.
    pub data: String,
    #[serde(with = "dec_u256")]
    pub nonce: U256,
    #[serde(with = "dec_u256")]
    pub block_limit: U256,
    #[serde(with = "dec_u256")]
    pub chain_id: U256,
}

/// Result of the send phase.
///
/// `Pending` is a normal outcome: the transaction was accepted but no
/// receipt appeared within the poll budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TransactionOutcome {
    Settled {
        #[serde(rename = "transactionHash")]
        transaction_hash: TxHash,
        result: Value,
    },
    Pending {
        #[serde(rename = "transactionHash")]
        transaction_hash: TxHash,
    },
}

impl TransactionOutcome {
    pub fn transaction_hash(&self) -> &TxHash {
        match self {
            TransactionOutcome::Settled {
                transaction_hash, ..
            }
            | TransactionOutcome::Pending { transaction_hash } => transaction_hash,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, TransactionOutcome::Pending { .. })
    }
}
