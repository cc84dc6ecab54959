//! High-level client: `GatewayClient` wiring node, chain metadata and a
//! domain service into one router.
//!
//! The node handle is created once at startup and shared by every request.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use crate::chain::{ChainMetadata, PollConfig, ReceiptPoller};
use crate::config::GatewayConfig;
use crate::dispatch::{HttpResponseData, Router};
use crate::domain::asset::AssetService;
use crate::error::{ConfigError, GatewayError};
use crate::node::NodeApi;
use crate::tx::{CryptoMode, EnvelopeBuilder};

/// The primary entry point of the gateway.
///
/// Cloning is cheap; clones share the node handle, caches and service.
#[derive(Clone)]
pub struct GatewayClient {
    router: Router,
    metadata: ChainMetadata,
    config: GatewayConfig,
}

impl GatewayClient {
    pub fn builder() -> GatewayClientBuilder {
        GatewayClientBuilder::default()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn metadata(&self) -> &ChainMetadata {
        &self.metadata
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Build the unsigned envelope for an operation. See [`Router::encode_transaction`].
    pub async fn encode_transaction(&self, raw: &str) -> HttpResponseData<Value> {
        self.router.encode_transaction(raw).await
    }

    /// Submit a client-signed envelope. See [`Router::send_transaction`].
    pub async fn send_transaction(&self, raw: &str) -> HttpResponseData<Value> {
        self.router.send_transaction(raw).await
    }

    pub async fn send_transaction_until(
        &self,
        raw: &str,
        deadline: Instant,
    ) -> HttpResponseData<Value> {
        self.router.send_transaction_until(raw, Some(deadline)).await
    }

    /// Answer an operation synchronously. See [`Router::invoke_function`].
    pub async fn invoke_function(&self, raw: &str) -> HttpResponseData<Value> {
        self.router.invoke_function(raw).await
    }

    /// Drop cached chain id and block height.
    pub async fn clear_all_caches(&self) {
        self.metadata.clear_cache().await;
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct GatewayClientBuilder {
    config: GatewayConfig,
    node: Option<Arc<dyn NodeApi>>,
    service: Option<Arc<dyn AssetService>>,
}

impl GatewayClientBuilder {
    /// Replace the whole configuration.
    pub fn config(mut self, config: GatewayConfig) -> Self {
        self.config = config;
        self
    }

    pub fn node_url(mut self, url: &str) -> Self {
        self.config.node_url = url.to_string();
        self
    }

    pub fn group_id(mut self, group_id: u64) -> Self {
        self.config.group_id = group_id;
        self
    }

    pub fn crypto_mode(mut self, mode: CryptoMode) -> Self {
        self.config.crypto_mode = mode;
        self
    }

    pub fn poll_config(mut self, poll: PollConfig) -> Self {
        self.config.poll_attempts = poll.attempts;
        self.config.poll_interval_ms = poll.interval.as_millis() as u64;
        self
    }

    /// Use an existing node handle instead of connecting to `node_url`.
    pub fn node(mut self, node: Arc<dyn NodeApi>) -> Self {
        self.node = Some(node);
        self
    }

    /// The domain service that owns asset business logic. Required.
    pub fn service(mut self, service: Arc<dyn AssetService>) -> Self {
        self.service = Some(service);
        self
    }

    pub fn build(self) -> Result<GatewayClient, GatewayError> {
        let config = self.config;
        config.validate()?;

        let service = self
            .service
            .ok_or_else(|| ConfigError::Invalid("an asset service is required".into()))?;
        let node = match self.node {
            Some(node) => node,
            None => connect(&config)?,
        };

        let metadata = ChainMetadata::new(node.clone(), config.group_id)
            .with_fallback_chain_id(config.fallback_chain_id)
            .with_block_limit_margin(config.block_limit_margin)
            .with_block_number_ttl(config.block_number_ttl());
        let poller = ReceiptPoller::new(node, config.group_id, config.poll_config());

        let mut router = Router::new(
            service,
            EnvelopeBuilder::new(metadata.clone()),
            poller,
            config.crypto_mode,
        );
        if let Some(address) = config.weid_contract {
            router = router.with_weid_contract(address);
        }

        tracing::info!(
            node_url = %config.node_url,
            group_id = config.group_id,
            crypto_mode = ?config.crypto_mode,
            "Gateway client ready"
        );

        Ok(GatewayClient {
            router,
            metadata,
            config,
        })
    }
}

#[cfg(feature = "http")]
fn connect(config: &GatewayConfig) -> Result<Arc<dyn NodeApi>, GatewayError> {
    let rpc = crate::node::BcosRpc::new(&config.node_url, config.request_timeout())?;
    Ok(Arc::new(rpc))
}

#[cfg(not(feature = "http"))]
fn connect(_config: &GatewayConfig) -> Result<Arc<dyn NodeApi>, GatewayError> {
    Err(ConfigError::Invalid("no node handle given and the `http` feature is disabled".into()).into())
}
