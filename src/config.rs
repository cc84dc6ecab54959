//! Gateway configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::chain::{PollConfig, DEFAULT_BLOCK_LIMIT_MARGIN, FALLBACK_CHAIN_ID};
use crate::error::ConfigError;
use crate::logging::LogFormat;
use crate::network::{DEFAULT_GROUP_ID, DEFAULT_NODE_URL};
use crate::shared::Address;
use crate::tx::CryptoMode;

/// Configuration for a gateway deployment.
///
/// Every field has a default, so an empty TOML document is valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// JSON-RPC endpoint of the ledger node.
    #[serde(default = "default_node_url")]
    pub node_url: String,

    #[serde(default = "default_group_id")]
    pub group_id: u64,

    /// Signature wire-encoding; fixed for the lifetime of a deployment.
    #[serde(default)]
    pub crypto_mode: CryptoMode,

    /// Chain id used when the node cannot report one.
    #[serde(default = "default_fallback_chain_id")]
    pub fallback_chain_id: u64,

    /// Blocks added to the current height to form the block limit.
    #[serde(default = "default_block_limit_margin")]
    pub block_limit_margin: u64,

    /// How long a fetched block height is reused, in milliseconds.
    #[serde(default = "default_block_number_ttl_ms")]
    pub block_number_ttl_ms: u64,

    /// Receipt lookups per submitted transaction.
    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,

    /// Pause between receipt lookups, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Per-request timeout against the node, in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Identity registry contract targeted by `createWeId`.
    #[serde(default)]
    pub weid_contract: Option<Address>,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter, e.g. "info" or "debug,bcos_gateway=trace".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_node_url() -> String {
    DEFAULT_NODE_URL.to_string()
}

fn default_group_id() -> u64 {
    DEFAULT_GROUP_ID
}

fn default_fallback_chain_id() -> u64 {
    FALLBACK_CHAIN_ID
}

fn default_block_limit_margin() -> u64 {
    DEFAULT_BLOCK_LIMIT_MARGIN
}

fn default_block_number_ttl_ms() -> u64 {
    1_000
}

fn default_poll_attempts() -> u32 {
    5
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl GatewayConfig {
    /// Load and validate configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.node_url.trim().is_empty() {
            return Err(ConfigError::Invalid("node_url must not be empty".into()));
        }
        if self.poll_attempts == 0 {
            return Err(ConfigError::Invalid(
                "poll_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            attempts: self.poll_attempts,
            interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    pub fn block_number_ttl(&self) -> Duration {
        Duration::from_millis(self.block_number_ttl_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            node_url: default_node_url(),
            group_id: default_group_id(),
            crypto_mode: CryptoMode::default(),
            fallback_chain_id: default_fallback_chain_id(),
            block_limit_margin: default_block_limit_margin(),
            block_number_ttl_ms: default_block_number_ttl_ms(),
            poll_attempts: default_poll_attempts(),
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            weid_contract: None,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = GatewayConfig::from_toml_str("").unwrap();
        assert_eq!(config, GatewayConfig::default());
        assert_eq!(config.poll_config(), PollConfig::default());
        assert_eq!(config.fallback_chain_id, 1);
        assert_eq!(config.block_limit_margin, 600);
        assert_eq!(config.crypto_mode, CryptoMode::Ecdsa);
    }

    #[test]
    fn test_full_document() {
        let toml = r#"
            node_url = "http://10.0.0.5:8545"
            group_id = 2
            crypto_mode = "sm2"
            fallback_chain_id = 10
            block_limit_margin = 500
            poll_attempts = 3
            poll_interval_ms = 250
            weid_contract = "0x5a0b54d5dc17e0aadc383d2db43b0a0d3e029c4c"
            log_format = "json"
            log_level = "debug"
        "#;
        let config = GatewayConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.group_id, 2);
        assert_eq!(config.crypto_mode, CryptoMode::Sm2);
        assert_eq!(config.poll_config().attempts, 3);
        assert_eq!(config.poll_config().interval, Duration::from_millis(250));
        assert!(config.weid_contract.is_some());
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            GatewayConfig::from_toml_str("poll_attempts = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GatewayConfig::from_toml_str(r#"node_url = " ""#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            GatewayConfig::from_toml_str(r#"crypto_mode = "rsa""#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            GatewayConfig::from_toml_file("/nonexistent/gateway.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
