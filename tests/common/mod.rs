//! In-memory node and asset service used by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use primitive_types::U256;
use serde_json::{json, Value};

use bcos_gateway::chain::{ChainMetadata, PollConfig, ReceiptPoller};
use bcos_gateway::dispatch::Router;
use bcos_gateway::domain::asset::{
    AssetAddressList, AssetService, Bac005BatchInfo, Bac005Info, BaseAsset, BaseQuery, PageQuery,
};
use bcos_gateway::domain::ReqInput;
use bcos_gateway::error::{NodeError, ServiceError};
use bcos_gateway::node::{NodeApi, TransactionReceipt};
use bcos_gateway::shared::TxHash;
use bcos_gateway::tx::{keccak256, CryptoMode, EnvelopeBuilder};

pub const ASSET_ADDRESS: &str = "0x5a0b54d5dc17e0aadc383d2db43b0a0d3e029c4c";
pub const CREATED_ASSET: &str = "0x00000000000000000000000000000000000000c1";

// ─── Node ────────────────────────────────────────────────────────────────────

/// A ledger node held entirely in memory.
pub struct MockNode {
    /// `None` makes `chain_id` fail.
    pub chain_id: Option<U256>,
    /// Number of upcoming `chain_id` calls that fail before it recovers.
    pub chain_id_outage: AtomicU32,
    /// `None` makes `block_number` fail.
    pub height: Mutex<Option<u64>>,
    /// Receipt becomes visible on this lookup (1-based); `None` means never.
    pub receipt_on_lookup: Option<u32>,
    /// Every receipt lookup fails with a transport error.
    pub receipt_lookup_fails: bool,
    /// How long each receipt lookup takes.
    pub receipt_delay: Duration,
    pub receipt_status: String,
    pub submissions: Mutex<Vec<Vec<u8>>>,
    pub receipt_lookups: AtomicU32,
    pub chain_id_calls: AtomicU32,
    pub height_calls: AtomicU32,
}

impl Default for MockNode {
    fn default() -> Self {
        Self {
            chain_id: Some(U256::from(1u64)),
            chain_id_outage: AtomicU32::new(0),
            height: Mutex::new(Some(1000)),
            receipt_on_lookup: Some(1),
            receipt_lookup_fails: false,
            receipt_delay: Duration::ZERO,
            receipt_status: "0x0".into(),
            submissions: Mutex::new(Vec::new()),
            receipt_lookups: AtomicU32::new(0),
            chain_id_calls: AtomicU32::new(0),
            height_calls: AtomicU32::new(0),
        }
    }
}

impl MockNode {
    pub fn submissions(&self) -> Vec<Vec<u8>> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn lookups(&self) -> u32 {
        self.receipt_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NodeApi for MockNode {
    async fn chain_id(&self) -> Result<U256, NodeError> {
        self.chain_id_calls.fetch_add(1, Ordering::SeqCst);
        let in_outage = self
            .chain_id_outage
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        let chain_id = if in_outage { None } else { self.chain_id };
        chain_id.ok_or(NodeError::Rpc {
            code: -32000,
            message: "version unavailable".into(),
        })
    }

    async fn block_number(&self, _group_id: u64) -> Result<u64, NodeError> {
        self.height_calls.fetch_add(1, Ordering::SeqCst);
        self.height.lock().unwrap().ok_or(NodeError::Timeout)
    }

    async fn send_raw_transaction(
        &self,
        _group_id: u64,
        raw_tx: &[u8],
    ) -> Result<TxHash, NodeError> {
        self.submissions.lock().unwrap().push(raw_tx.to_vec());
        Ok(TxHash::from_bytes(&keccak256(raw_tx)))
    }

    async fn transaction_receipt(
        &self,
        _group_id: u64,
        tx_hash: &TxHash,
    ) -> Result<Option<TransactionReceipt>, NodeError> {
        let lookup = self.receipt_lookups.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.receipt_delay.is_zero() {
            tokio::time::sleep(self.receipt_delay).await;
        }
        if self.receipt_lookup_fails {
            return Err(NodeError::ServerError {
                status: 503,
                body: "busy".into(),
            });
        }
        match self.receipt_on_lookup {
            Some(n) if lookup >= n => Ok(Some(TransactionReceipt {
                transaction_hash: tx_hash.clone(),
                status: self.receipt_status.clone(),
                contract_address: Some(CREATED_ASSET.into()),
                block_number: Some("0x3e9".into()),
                ..Default::default()
            })),
            _ => Ok(None),
        }
    }
}

// ─── Asset service ───────────────────────────────────────────────────────────

/// Records which operations ran and answers with canned values.
#[derive(Default)]
pub struct MockAssetService {
    pub calls: Mutex<Vec<&'static str>>,
    /// When set, every operation fails with this error.
    pub failure: Option<ServiceError>,
}

impl MockAssetService {
    pub fn failing(code: i32, message: &str) -> Self {
        Self {
            failure: Some(ServiceError::new(code, message)),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, op: &'static str) -> Result<(), ServiceError> {
        self.calls.lock().unwrap().push(op);
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    /// Payload stand-in: the operation name prefixed with a marker byte.
    fn payload(&self, op: &'static str) -> Result<Vec<u8>, ServiceError> {
        self.record(op)?;
        let mut data = vec![0xab];
        data.extend_from_slice(op.as_bytes());
        Ok(data)
    }

    fn answer(&self, op: &'static str, arg: Value) -> Result<Value, ServiceError> {
        self.record(op)?;
        Ok(json!({ "function": op, "arg": arg }))
    }
}

#[async_trait]
impl AssetService for MockAssetService {
    fn construct_encoder(&self, _req: &ReqInput<Bac005Info>) -> Result<Vec<u8>, ServiceError> {
        self.payload("constructEncoder")
    }

    fn issue_encoder(&self, _req: &ReqInput<Bac005Info>) -> Result<Vec<u8>, ServiceError> {
        self.payload("issueEncoder")
    }

    fn batch_issue_encoder(
        &self,
        _req: &ReqInput<Bac005BatchInfo>,
    ) -> Result<Vec<u8>, ServiceError> {
        self.payload("batchIssueEncoder")
    }

    fn send_encoder(&self, _req: &ReqInput<Bac005Info>) -> Result<Vec<u8>, ServiceError> {
        self.payload("sendEncoder")
    }

    fn batch_send_encoder(
        &self,
        _req: &ReqInput<Bac005BatchInfo>,
    ) -> Result<Vec<u8>, ServiceError> {
        self.payload("batchSendEncoder")
    }

    fn construct_decoder(&self, receipt: &TransactionReceipt) -> Result<Value, ServiceError> {
        self.record("constructDecoder")?;
        Ok(json!({ "assetAddress": receipt.contract_address }))
    }

    fn issue_decoder(&self, receipt: &TransactionReceipt) -> Result<Value, ServiceError> {
        self.record("issueDecoder")?;
        Ok(json!(receipt.is_status_ok()))
    }

    fn batch_issue_decoder(&self, receipt: &TransactionReceipt) -> Result<Value, ServiceError> {
        self.record("batchIssueDecoder")?;
        Ok(json!(receipt.is_status_ok()))
    }

    fn send_decoder(&self, receipt: &TransactionReceipt) -> Result<Value, ServiceError> {
        self.record("sendDecoder")?;
        Ok(json!(receipt.is_status_ok()))
    }

    fn batch_send_decoder(&self, receipt: &TransactionReceipt) -> Result<Value, ServiceError> {
        self.record("batchSendDecoder")?;
        Ok(json!(receipt.is_status_ok()))
    }

    async fn construct(&self, req: ReqInput<Bac005Info>) -> Result<Value, ServiceError> {
        self.answer("construct", json!(req.function_arg))
    }

    async fn issue(&self, req: ReqInput<Bac005Info>) -> Result<Value, ServiceError> {
        self.answer("issue", json!(req.function_arg))
    }

    async fn construct_and_issue(&self, req: ReqInput<Bac005Info>) -> Result<Value, ServiceError> {
        self.answer("constructAndIssue", json!(req.function_arg))
    }

    async fn batch_issue(&self, req: ReqInput<Bac005BatchInfo>) -> Result<Value, ServiceError> {
        self.answer("batchIssue", json!(req.function_arg))
    }

    async fn construct_and_batch_issue(
        &self,
        req: ReqInput<Bac005BatchInfo>,
    ) -> Result<Value, ServiceError> {
        self.answer("constructAndBatchIssue", json!(req.function_arg))
    }

    async fn query_asset_owner(&self, req: ReqInput<Bac005Info>) -> Result<Value, ServiceError> {
        self.answer("queryAssetOwner", json!(req.function_arg))
    }

    async fn query_asset_num(&self, req: ReqInput<BaseAsset>) -> Result<Value, ServiceError> {
        self.answer("queryAssetNum", json!(req.function_arg))
    }

    async fn query_asset_list(&self, req: ReqInput<PageQuery>) -> Result<Value, ServiceError> {
        self.answer("queryAssetList", json!(req.function_arg))
    }

    async fn query_owned_asset_num(&self, req: ReqInput<BaseQuery>) -> Result<Value, ServiceError> {
        self.answer("queryOwnedAssetNum", json!(req.function_arg))
    }

    async fn query_owned_asset_list(
        &self,
        req: ReqInput<PageQuery>,
    ) -> Result<Value, ServiceError> {
        self.answer("queryOwnedAssetList", json!(req.function_arg))
    }

    async fn send(&self, req: ReqInput<Bac005Info>) -> Result<Value, ServiceError> {
        self.answer("send", json!(req.function_arg))
    }

    async fn batch_send(&self, req: ReqInput<Bac005BatchInfo>) -> Result<Value, ServiceError> {
        self.answer("batchSend", json!(req.function_arg))
    }

    async fn query_base_info(
        &self,
        req: ReqInput<AssetAddressList>,
    ) -> Result<Value, ServiceError> {
        self.answer("getBaseInfo", json!(req.function_arg))
    }

    async fn query_base_info_by_we_id(
        &self,
        req: ReqInput<PageQuery>,
    ) -> Result<Value, ServiceError> {
        self.answer("getBaseInfoByWeId", json!(req.function_arg))
    }
}

// ─── Wiring ──────────────────────────────────────────────────────────────────

/// Polling fast enough for tests.
pub fn fast_poll() -> PollConfig {
    PollConfig {
        attempts: 5,
        interval: Duration::from_millis(10),
    }
}

pub fn router(node: Arc<MockNode>, service: Arc<MockAssetService>, mode: CryptoMode) -> Router {
    let metadata = ChainMetadata::new(node.clone(), 1);
    let poller = ReceiptPoller::new(node, 1, fast_poll());
    Router::new(service, EnvelopeBuilder::new(metadata), poller, mode)
}
