//! Backoff policies for node JSON-RPC calls.

use std::time::Duration;

use crate::error::NodeError;

/// JSON-RPC "internal error"; nodes report it while syncing or overloaded.
pub const RPC_INTERNAL_ERROR: i64 = -32603;

/// How a single node call reacts to transient failures.
#[derive(Debug, Clone, Default)]
pub enum RetryPolicy {
    /// Single attempt. Used for `sendRawTransaction`: a resend after a lost
    /// response could be rejected as a duplicate or double-apply.
    #[default]
    None,
    /// Read calls: back off on transport failures, gateway statuses and
    /// node-side internal errors.
    Idempotent,
    Custom(RetryConfig),
}

/// Backoff schedule and the failures it applies to.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: f64,
    /// Spread each delay by up to ±25%.
    pub jitter: bool,
    /// HTTP statuses from a proxy in front of the node that warrant a retry.
    pub retryable_statuses: Vec<u16>,
    /// JSON-RPC error codes that warrant a retry.
    pub retryable_rpc_codes: Vec<i64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
            backoff_factor: 2.0,
            jitter: true,
            retryable_statuses: vec![502, 503, 504],
            retryable_rpc_codes: Vec::new(),
        }
    }
}

impl RetryConfig {
    /// Schedule for read calls (`getBlockNumber`, receipts, client version).
    pub fn idempotent() -> Self {
        Self {
            retryable_statuses: vec![429, 502, 503, 504],
            retryable_rpc_codes: vec![RPC_INTERNAL_ERROR],
            ..Self::default()
        }
    }

    /// Whether `err` is worth another attempt under this schedule.
    pub fn is_retryable(&self, err: &NodeError) -> bool {
        match err {
            NodeError::Timeout => true,
            NodeError::ServerError { status, .. } => self.retryable_statuses.contains(status),
            NodeError::Rpc { code, .. } => self.retryable_rpc_codes.contains(code),
            #[cfg(feature = "http")]
            NodeError::Reqwest(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            NodeError::UnexpectedResult { .. } | NodeError::MaxRetriesExceeded { .. } => false,
        }
    }

    /// Pause before retry number `attempt` (0-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponential =
            self.initial_delay.as_millis() as f64 * self.backoff_factor.powi(attempt as i32);
        let mut ms = exponential.min(self.max_delay.as_millis() as f64);

        if self.jitter {
            let spread = ms * 0.25;
            ms = (ms + (rand::random::<f64>() * 2.0 - 1.0) * spread).max(0.0);
        }

        Duration::from_millis(ms as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(initial_ms: u64, max_ms: u64) -> RetryConfig {
        RetryConfig {
            initial_delay: Duration::from_millis(initial_ms),
            max_delay: Duration::from_millis(max_ms),
            jitter: false,
            ..RetryConfig::default()
        }
    }

    #[test]
    fn test_submission_policy_never_retries() {
        assert!(matches!(RetryPolicy::default(), RetryPolicy::None));
    }

    #[test]
    fn test_read_schedule_covers_node_internal_errors() {
        let busy = NodeError::Rpc {
            code: RPC_INTERNAL_ERROR,
            message: "node is syncing".into(),
        };
        assert!(RetryConfig::idempotent().is_retryable(&busy));
        assert!(!RetryConfig::default().is_retryable(&busy));

        let bad_params = NodeError::Rpc {
            code: -32602,
            message: "invalid params".into(),
        };
        assert!(!RetryConfig::idempotent().is_retryable(&bad_params));
    }

    #[test]
    fn test_status_and_timeout_classification() {
        let config = RetryConfig::idempotent();
        let limited = NodeError::ServerError {
            status: 429,
            body: String::new(),
        };
        assert!(config.is_retryable(&limited));
        assert!(!RetryConfig::default().is_retryable(&limited));
        assert!(config.is_retryable(&NodeError::Timeout));
        assert!(!config.is_retryable(&NodeError::UnexpectedResult { expected: "result" }));
    }

    #[test]
    fn test_backoff_doubles_until_capped() {
        let config = fixed(50, 150);
        let delays: Vec<u128> = (0..4)
            .map(|n| config.delay_for_attempt(n).as_millis())
            .collect();
        assert_eq!(delays, vec![50, 100, 150, 150]);
    }

    #[test]
    fn test_jitter_bounds() {
        let config = RetryConfig {
            jitter: true,
            backoff_factor: 1.0,
            ..fixed(800, 800)
        };
        for _ in 0..32 {
            let ms = config.delay_for_attempt(3).as_millis();
            assert!((600..=1000).contains(&ms), "delay {} outside ±25%", ms);
        }
    }
}
