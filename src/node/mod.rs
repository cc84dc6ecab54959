//! Node layer: the ledger collaborator interface and its JSON-RPC client.
//!
//! [`NodeApi`] is the only shared resource in the gateway. Implementations must
//! be safe for concurrent use by many in-flight requests; hold one behind an
//! `Arc<dyn NodeApi>` created at startup.

#[cfg(feature = "http")]
pub mod client;
pub mod retry;

#[cfg(feature = "http")]
pub use client::BcosRpc;
pub use retry::{RetryConfig, RetryPolicy};

use async_trait::async_trait;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::error::NodeError;
use crate::shared::TxHash;

/// Remote calls the gateway makes against a ledger node.
#[async_trait]
pub trait NodeApi: Send + Sync {
    /// Chain identifier reported in the node version info.
    async fn chain_id(&self) -> Result<U256, NodeError>;

    /// Current block height of `group_id`.
    async fn block_number(&self, group_id: u64) -> Result<u64, NodeError>;

    /// Submit a fully signed transaction; returns the node's transaction hash.
    async fn send_raw_transaction(
        &self,
        group_id: u64,
        raw_tx: &[u8],
    ) -> Result<TxHash, NodeError>;

    /// Fetch a receipt. `Ok(None)` means the transaction has not settled yet.
    async fn transaction_receipt(
        &self,
        group_id: u64,
        tx_hash: &TxHash,
    ) -> Result<Option<TransactionReceipt>, NodeError>;
}

/// Settlement record for a submitted transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: TxHash,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub block_hash: Option<String>,
    /// Hex status; `"0x0"` is success.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub gas_used: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub logs: Vec<ReceiptLog>,
}

impl TransactionReceipt {
    pub fn is_status_ok(&self) -> bool {
        matches!(self.status.as_str(), "0x0" | "0x" | "0" | "")
    }
}

/// An event emitted while executing a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLog {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub data: String,
}
