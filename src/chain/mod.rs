//! Chain metadata and receipt polling.
//!
//! Both are best-effort views of node state: metadata degrades to safe
//! defaults when the node is unreachable, and polling reports "not yet
//! settled" instead of failing.

pub mod poller;

pub use poller::{PollConfig, ReceiptPoller};

use async_lock::RwLock;
use primitive_types::U256;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::node::NodeApi;

/// Chain id used when the node cannot report one.
pub const FALLBACK_CHAIN_ID: u64 = 1;

/// Blocks added to the current height to form the block limit.
pub const DEFAULT_BLOCK_LIMIT_MARGIN: u64 = 600;

/// Fetches chain id and block limit, with caching and fallbacks.
///
/// Cloning is cheap; clones share the node handle and caches.
#[derive(Clone)]
pub struct ChainMetadata {
    node: Arc<dyn NodeApi>,
    group_id: u64,
    fallback_chain_id: U256,
    block_limit_margin: u64,
    block_number_ttl: Duration,
    /// Chain id never changes for a deployment; cached after the first success.
    chain_id_cache: Arc<RwLock<Option<U256>>>,
    /// Last observed height and when it was fetched.
    block_number_cache: Arc<RwLock<Option<(u64, Instant)>>>,
}

impl ChainMetadata {
    pub fn new(node: Arc<dyn NodeApi>, group_id: u64) -> Self {
        Self {
            node,
            group_id,
            fallback_chain_id: U256::from(FALLBACK_CHAIN_ID),
            block_limit_margin: DEFAULT_BLOCK_LIMIT_MARGIN,
            block_number_ttl: Duration::from_secs(1),
            chain_id_cache: Arc::new(RwLock::new(None)),
            block_number_cache: Arc::new(RwLock::new(None)),
        }
    }

    pub fn with_fallback_chain_id(mut self, chain_id: u64) -> Self {
        self.fallback_chain_id = U256::from(chain_id);
        self
    }

    pub fn with_block_limit_margin(mut self, margin: u64) -> Self {
        self.block_limit_margin = margin;
        self
    }

    /// A zero TTL disables block-number caching.
    pub fn with_block_number_ttl(mut self, ttl: Duration) -> Self {
        self.block_number_ttl = ttl;
        self
    }

    pub fn group_id(&self) -> u64 {
        self.group_id
    }

    pub fn node(&self) -> &Arc<dyn NodeApi> {
        &self.node
    }

    /// Current chain id. Never fails: node errors yield the fallback value,
    /// which is not cached so a later call can still learn the real id.
    pub async fn chain_id(&self) -> U256 {
        if let Some(id) = *self.chain_id_cache.read().await {
            return id;
        }

        match self.node.chain_id().await {
            Ok(id) => {
                *self.chain_id_cache.write().await = Some(id);
                id
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    fallback = %self.fallback_chain_id,
                    "Failed to fetch chain id, using fallback"
                );
                self.fallback_chain_id
            }
        }
    }

    /// Current height plus the safety margin, or `None` if the node is
    /// unreachable. Callers must abort envelope construction on `None`.
    pub async fn block_limit(&self) -> Option<U256> {
        let height = self.block_number().await?;
        Some(U256::from(height) + U256::from(self.block_limit_margin))
    }

    async fn block_number(&self) -> Option<u64> {
        {
            let cache = self.block_number_cache.read().await;
            if let Some((height, fetched_at)) = *cache {
                if fetched_at.elapsed() < self.block_number_ttl {
                    return Some(height);
                }
            }
        }

        match self.node.block_number(self.group_id).await {
            Ok(height) => {
                *self.block_number_cache.write().await = Some((height, Instant::now()));
                Some(height)
            }
            Err(e) => {
                tracing::warn!(error = %e, group_id = self.group_id, "Failed to fetch block number");
                None
            }
        }
    }

    /// Drop cached values.
    pub async fn clear_cache(&self) {
        *self.chain_id_cache.write().await = None;
        *self.block_number_cache.write().await = None;
    }
}
