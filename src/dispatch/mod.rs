//! Dispatch router: resolves a request's function name and drives the
//! encode, send and direct-invoke phases.
//!
//! Every entry point returns an [`HttpResponseData`]; errors are converted at
//! this boundary and never propagate to the caller.

pub mod wire;

pub use wire::{EncodeOutput, HttpResponseData, InputArg, TransactionOutcome};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;

use crate::chain::ReceiptPoller;
use crate::domain::asset::{AssetService, BaseAsset};
use crate::domain::{weid, FunctionName, ReqInput, TransactionArg};
use crate::error::{CodecError, ConfigError, GatewayError};
use crate::node::TransactionReceipt;
use crate::shared::{parse_hex_bytes, to_hex_prefixed, Address, TxHash};
use crate::tx::{keccak256, random_token, CryptoMode, EnvelopeBuilder, SignatureData};

/// Routes requests to envelope construction, submission and the domain
/// service.
///
/// Holds no per-request state; one instance serves concurrent requests.
#[derive(Clone)]
pub struct Router {
    service: Arc<dyn AssetService>,
    builder: EnvelopeBuilder,
    poller: ReceiptPoller,
    crypto_mode: CryptoMode,
    weid_contract: Option<Address>,
}

impl Router {
    pub fn new(
        service: Arc<dyn AssetService>,
        builder: EnvelopeBuilder,
        poller: ReceiptPoller,
        crypto_mode: CryptoMode,
    ) -> Self {
        Self {
            service,
            builder,
            poller,
            crypto_mode,
            weid_contract: None,
        }
    }

    /// Identity registry that `createWeId` transactions are addressed to.
    pub fn with_weid_contract(mut self, address: Address) -> Self {
        self.weid_contract = Some(address);
        self
    }

    pub fn crypto_mode(&self) -> CryptoMode {
        self.crypto_mode
    }

    // ── Entry points ─────────────────────────────────────────────────────

    /// Encode phase: build the unsigned envelope for offline signing.
    pub async fn encode_transaction(&self, raw: &str) -> HttpResponseData<Value> {
        let input = match InputArg::parse(raw) {
            Ok(input) => input,
            Err(e) => return respond("encodeTransaction", "", raw, Err(e)),
        };
        let result = self
            .encode(&input)
            .await
            .and_then(|out| Ok(serde_json::to_value(out)?));
        respond("encodeTransaction", &input.function_name, raw, result)
            .with_loopback(input.transaction_arg.loopback)
    }

    /// Send phase: attach the client's signature, submit, and wait briefly
    /// for the receipt.
    pub async fn send_transaction(&self, raw: &str) -> HttpResponseData<Value> {
        self.send_transaction_until(raw, None).await
    }

    /// Like [`send_transaction`](Self::send_transaction), but stops polling
    /// at `deadline`. A missed deadline yields a pending outcome.
    pub async fn send_transaction_until(
        &self,
        raw: &str,
        deadline: Option<Instant>,
    ) -> HttpResponseData<Value> {
        let input = match InputArg::parse(raw) {
            Ok(input) => input,
            Err(e) => return respond("sendTransaction", "", raw, Err(e)),
        };
        let result = self
            .send(&input, deadline)
            .await
            .and_then(|outcome| Ok(serde_json::to_value(outcome)?));
        respond("sendTransaction", &input.function_name, raw, result)
            .with_loopback(input.transaction_arg.loopback)
    }

    /// Direct-invoke phase: call the domain service and return its answer.
    pub async fn invoke_function(&self, raw: &str) -> HttpResponseData<Value> {
        tracing::info!(input = raw, "Invoke function");
        let input = match InputArg::parse(raw) {
            Ok(input) => input,
            Err(e) => return respond("invokeFunction", "", raw, Err(e)),
        };
        let loopback = input.transaction_arg.loopback.clone();
        let function_name = input.function_name.clone();
        let result = self.invoke(input).await;
        respond("invokeFunction", &function_name, raw, result).with_loopback(loopback)
    }

    // ── Phases ───────────────────────────────────────────────────────────

    async fn encode(&self, input: &InputArg) -> Result<EncodeOutput, GatewayError> {
        let name = resolve(&input.function_name, |c| c.encode)?;
        let to = self.destination(name, &input.function_arg, &input.transaction_arg)?;
        let payload = self.encode_payload(name, request(input, name))?;
        let nonce = input.transaction_arg.nonce.unwrap_or_else(random_token);

        let metadata = self.builder.metadata();
        let tx = self
            .builder
            .build(nonce, metadata.group_id(), payload, to)
            .await?;

        tracing::debug!(function = %name, block_limit = %tx.block_limit, "Envelope encoded");

        Ok(EncodeOutput {
            encoded_transaction: tx.encode(),
            data: to_hex_prefixed(&tx.data),
            nonce: tx.nonce,
            block_limit: tx.block_limit,
            chain_id: tx.chain_id,
        })
    }

    async fn send(
        &self,
        input: &InputArg,
        deadline: Option<Instant>,
    ) -> Result<TransactionOutcome, GatewayError> {
        let name = resolve(&input.function_name, |c| c.decode)?;
        let txn = &input.transaction_arg;

        let nonce = txn
            .nonce
            .ok_or_else(|| GatewayError::Input("transactionArg.nonce is required".into()))?;
        let data = txn
            .data
            .as_deref()
            .ok_or_else(|| GatewayError::Input("transactionArg.data is required".into()))?;
        let payload =
            parse_hex_bytes(data).map_err(|e| GatewayError::Input(format!("data: {}", e)))?;
        let signature = self.signature(txn)?;
        let to = self.destination(name, &input.function_arg, txn)?;

        let metadata = self.builder.metadata();
        let group_id = metadata.group_id();
        let signed = self
            .builder
            .build_echoed(
                nonce,
                group_id,
                payload,
                to,
                txn.block_limit,
                txn.chain_id,
            )
            .await?
            .attach_signature(signature);
        let raw_tx = signed.encode(self.crypto_mode)?;

        let tx_hash = metadata
            .node()
            .send_raw_transaction(group_id, &raw_tx)
            .await?;
        tracing::info!(
            function = %name,
            tx_hash = %tx_hash,
            local_hash = %TxHash::from_bytes(&keccak256(&raw_tx)),
            "Transaction submitted"
        );

        match self.poller.await_receipt(&tx_hash, deadline).await {
            Some(receipt) => {
                let result = self.decode_receipt(name, &receipt)?;
                Ok(TransactionOutcome::Settled {
                    transaction_hash: tx_hash,
                    result,
                })
            }
            None => Ok(TransactionOutcome::Pending {
                transaction_hash: tx_hash,
            }),
        }
    }

    async fn invoke(&self, input: InputArg) -> Result<Value, GatewayError> {
        use FunctionName::*;

        let name = resolve(&input.function_name, |c| c.invoke)?;
        let req = request(&input, name);
        let service = &self.service;

        let result = match name {
            Construct => service.construct(typed(req)?).await,
            Issue => service.issue(typed(req)?).await,
            ConstructAndIssue => service.construct_and_issue(typed(req)?).await,
            BatchIssue => service.batch_issue(typed(req)?).await,
            ConstructAndBatchIssue => service.construct_and_batch_issue(typed(req)?).await,
            QueryAssetOwner => service.query_asset_owner(typed(req)?).await,
            QueryAssetNum => service.query_asset_num(typed(req)?).await,
            QueryAssetList => service.query_asset_list(typed(req)?).await,
            QueryOwnedAssetNum => service.query_owned_asset_num(typed(req)?).await,
            QueryOwnedAssetList => service.query_owned_asset_list(typed(req)?).await,
            Send => service.send(typed(req)?).await,
            BatchSend => service.batch_send(typed(req)?).await,
            GetBaseInfo => service.query_base_info(typed(req)?).await,
            GetBaseInfoByWeId => service.query_base_info_by_we_id(typed(req)?).await,
            CreateWeId => return Err(GatewayError::FunctionUndefined(name.to_string())),
        };
        Ok(result?)
    }

    // ── Per-operation handlers ───────────────────────────────────────────

    fn encode_payload(
        &self,
        name: FunctionName,
        req: ReqInput<Value>,
    ) -> Result<Vec<u8>, GatewayError> {
        use FunctionName::*;

        let service = &self.service;
        let payload = match name {
            Construct => service.construct_encoder(&typed(req)?)?,
            Issue => service.issue_encoder(&typed(req)?)?,
            BatchIssue => service.batch_issue_encoder(&typed(req)?)?,
            Send => service.send_encoder(&typed(req)?)?,
            BatchSend => service.batch_send_encoder(&typed(req)?)?,
            CreateWeId => weid::create_weid_payload(&req.function_arg, Utc::now())?,
            _ => return Err(GatewayError::FunctionUndefined(name.to_string())),
        };
        Ok(payload)
    }

    fn decode_receipt(
        &self,
        name: FunctionName,
        receipt: &TransactionReceipt,
    ) -> Result<Value, GatewayError> {
        use FunctionName::*;

        let service = &self.service;
        let result = match name {
            Construct => service.construct_decoder(receipt)?,
            Issue => service.issue_decoder(receipt)?,
            BatchIssue => service.batch_issue_decoder(receipt)?,
            Send => service.send_decoder(receipt)?,
            BatchSend => service.batch_send_decoder(receipt)?,
            CreateWeId => json!(receipt.is_status_ok()),
            _ => return Err(GatewayError::FunctionUndefined(name.to_string())),
        };
        Ok(result)
    }

    /// Destination of the envelope. An explicit `transactionArg.to` wins;
    /// otherwise existing-asset operations use `functionArg.assetAddress`,
    /// `createWeId` uses the identity registry and `construct` has none.
    fn destination(
        &self,
        name: FunctionName,
        function_arg: &Value,
        txn: &TransactionArg,
    ) -> Result<Option<Address>, GatewayError> {
        if let Some(to) = txn.to {
            return Ok(Some(to));
        }
        if name == FunctionName::CreateWeId {
            return self.weid_contract.map(Some).ok_or_else(|| {
                ConfigError::Invalid("identity registry address is not configured".into()).into()
            });
        }
        if name.targets_existing_asset() {
            return asset_address(function_arg).map(Some);
        }
        Ok(None)
    }

    /// Decode the client's signature. Runs before any node call so a bad
    /// signature never leads to a submission.
    fn signature(&self, txn: &TransactionArg) -> Result<SignatureData, GatewayError> {
        let encoded = txn.signed_message.as_deref().ok_or_else(|| {
            GatewayError::Input("transactionArg.signedMessage is required".into())
        })?;
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| GatewayError::Input(format!("signedMessage: {}", e)))?;
        let signature = SignatureData::from_compact(&bytes)?;

        match (self.crypto_mode, txn.public_key.as_deref()) {
            (CryptoMode::Sm2, Some(key)) => {
                let key = parse_hex_bytes(key)
                    .map_err(|e| GatewayError::Input(format!("publicKey: {}", e)))?;
                Ok(signature.with_public_key(key))
            }
            (CryptoMode::Sm2, None) => Err(CodecError::MissingPublicKey.into()),
            (CryptoMode::Ecdsa, _) => Ok(signature),
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Resolve a function name and check it supports the current phase.
fn resolve(
    function_name: &str,
    supports: impl Fn(crate::domain::Capabilities) -> bool,
) -> Result<FunctionName, GatewayError> {
    let name: FunctionName = function_name.parse()?;
    if !supports(name.capabilities()) {
        return Err(GatewayError::FunctionUndefined(function_name.to_string()));
    }
    Ok(name)
}

fn request(input: &InputArg, name: FunctionName) -> ReqInput<Value> {
    ReqInput {
        function_arg: input.function_arg.clone(),
        transaction_arg: input.transaction_arg.clone(),
        function_name: name,
        v: input.v.clone(),
    }
}

/// Deserialize the function argument into the operation's expected shape.
fn typed<T: DeserializeOwned>(req: ReqInput<Value>) -> Result<ReqInput<T>, GatewayError> {
    let ReqInput {
        function_arg,
        transaction_arg,
        function_name,
        v,
    } = req;
    let function_arg = serde_json::from_value(function_arg)
        .map_err(|e| GatewayError::Input(format!("functionArg: {}", e)))?;
    Ok(ReqInput {
        function_arg,
        transaction_arg,
        function_name,
        v,
    })
}

fn asset_address(function_arg: &Value) -> Result<Address, GatewayError> {
    let asset: BaseAsset = serde_json::from_value(function_arg.clone())
        .map_err(|e| GatewayError::Input(format!("functionArg: {}", e)))?;
    asset
        .asset_address
        .ok_or_else(|| GatewayError::Input("functionArg.assetAddress is required".into()))
}

/// Convert a phase result into the response envelope, logging failures.
fn respond(
    phase: &'static str,
    function: &str,
    raw: &str,
    result: Result<Value, GatewayError>,
) -> HttpResponseData<Value> {
    let err = match result {
        Ok(body) => return HttpResponseData::success(body),
        Err(e) => e,
    };

    match &err {
        GatewayError::FunctionUndefined(name) => {
            tracing::error!(phase, function = %name, "Function name undefined");
        }
        GatewayError::Service(e) => {
            tracing::error!(
                phase,
                function,
                input = raw,
                code = e.code,
                error = %e.message,
                "Domain service call failed"
            );
        }
        GatewayError::InputNull | GatewayError::Input(_) | GatewayError::Serde(_) => {
            tracing::error!(phase, function, input = raw, error = %err, "Illegal input");
        }
        _ => {
            tracing::error!(phase, function, input = raw, error = ?err, "Unknown error");
        }
    }

    HttpResponseData::failure(err.return_code())
}
