//! Bounded, deadline-aware receipt polling.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::{select, Either};

use crate::node::{NodeApi, TransactionReceipt};
use crate::shared::TxHash;

/// How often and how long to poll for a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Total number of receipt lookups.
    pub attempts: u32,
    /// Pause between lookups.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            attempts: 5,
            interval: Duration::from_secs(1),
        }
    }
}

/// Polls the node until a receipt appears or the budget runs out.
#[derive(Clone)]
pub struct ReceiptPoller {
    node: Arc<dyn NodeApi>,
    group_id: u64,
    config: PollConfig,
}

impl ReceiptPoller {
    pub fn new(node: Arc<dyn NodeApi>, group_id: u64, config: PollConfig) -> Self {
        Self {
            node,
            group_id,
            config,
        }
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Wait for the receipt of `tx_hash`.
    ///
    /// Returns `None` once all attempts are spent or `deadline` passes, even
    /// in the middle of a lookup. `None` means "not yet settled", not
    /// failure. Transport errors during a lookup count as an attempt without
    /// a receipt.
    pub async fn await_receipt(
        &self,
        tx_hash: &TxHash,
        deadline: Option<Instant>,
    ) -> Option<TransactionReceipt> {
        for attempt in 0..self.config.attempts {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                tracing::debug!(tx_hash = %tx_hash, attempt, "Receipt poll deadline reached");
                return None;
            }

            let lookup = self.node.transaction_receipt(self.group_id, tx_hash);
            let result = match deadline {
                // The lookup itself is bounded by the deadline.
                Some(d) => {
                    let timer = futures_timer::Delay::new(d.saturating_duration_since(Instant::now()));
                    match select(lookup, timer).await {
                        Either::Left((result, _)) => result,
                        Either::Right(_) => {
                            tracing::debug!(tx_hash = %tx_hash, attempt, "Receipt poll deadline reached mid-lookup");
                            return None;
                        }
                    }
                }
                None => lookup.await,
            };

            match result {
                Ok(Some(receipt)) => return Some(receipt),
                Ok(None) => {
                    tracing::debug!(tx_hash = %tx_hash, attempt = attempt + 1, "Receipt not yet available");
                }
                Err(e) => {
                    tracing::warn!(tx_hash = %tx_hash, attempt = attempt + 1, error = %e, "Receipt lookup failed");
                }
            }

            if attempt + 1 < self.config.attempts {
                let pause = match deadline {
                    Some(d) => self
                        .config
                        .interval
                        .min(d.saturating_duration_since(Instant::now())),
                    None => self.config.interval,
                };
                futures_timer::Delay::new(pause).await;
            }
        }

        tracing::info!(
            tx_hash = %tx_hash,
            attempts = self.config.attempts,
            "Receipt still pending after polling"
        );
        None
    }
}
