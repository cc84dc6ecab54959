//! # bcos-gateway
//!
//! Server side of a split-signing transaction protocol for FISCO-BCOS style
//! ledgers: the gateway builds the canonical unsigned transaction, the client
//! signs it offline, and the gateway attaches the signature, submits, and
//! polls for the receipt.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core**: Newtypes, return codes, envelope encoding, config (no I/O)
//! 2. **Node**: `NodeApi` plus a JSON-RPC client with per-call retry policies
//! 3. **Chain**: Chain id / block limit provider and the receipt poller
//! 4. **Domain**: Operation catalogue, asset service contract, identity calls
//! 5. **Dispatch**: `Router` driving the encode, send and invoke phases
//! 6. **High-Level Client**: `GatewayClient` wiring everything together
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bcos_gateway::prelude::*;
//!
//! let client = GatewayClient::builder()
//!     .config(GatewayConfig::from_toml_file("gateway.toml")?)
//!     .service(Arc::new(MyAssetService::new()))
//!     .build()?;
//!
//! let encoded = client.encode_transaction(request_json).await;
//! // ... client signs `encodedTransaction` offline ...
//! let settled = client.send_transaction(signed_request_json).await;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes, return codes and serde helpers.
pub mod shared;

/// Transaction envelopes, signatures and canonical encoding.
pub mod tx;

/// Unified gateway error types.
pub mod error;

/// Node endpoint and chain defaults.
pub mod network;

/// TOML-backed gateway configuration.
pub mod config;

/// Structured logging setup.
pub mod logging;

// ── Layer 2: Node ────────────────────────────────────────────────────────────

/// Ledger node interface and JSON-RPC client.
pub mod node;

// ── Layer 3: Chain ───────────────────────────────────────────────────────────

/// Chain metadata provider and receipt poller.
pub mod chain;

// ── Layer 4: Domain ──────────────────────────────────────────────────────────

/// Operation catalogue, asset service contract, identity call encoding.
pub mod domain;

// ── Layer 5: Dispatch ────────────────────────────────────────────────────────

/// Request routing across the encode, send and invoke phases.
pub mod dispatch;

// ── Layer 6: High-Level Client ───────────────────────────────────────────────

/// `GatewayClient`, the primary entry point.
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{Address, ReturnCode, TxHash};

    // Envelopes
    pub use crate::tx::{
        CryptoMode, EnvelopeBuilder, RawTransaction, SignatureData, SignedTransaction,
    };

    // Node + chain
    pub use crate::chain::{ChainMetadata, PollConfig, ReceiptPoller};
    pub use crate::node::{NodeApi, ReceiptLog, RetryConfig, RetryPolicy, TransactionReceipt};
    #[cfg(feature = "http")]
    pub use crate::node::BcosRpc;

    // Domain
    pub use crate::domain::asset::{
        AssetAddressList, AssetService, Bac005BatchInfo, Bac005Info, Bac005Item, BaseAsset,
        BaseQuery, PageQuery,
    };
    pub use crate::domain::{FunctionName, ReqInput, TransactionArg};

    // Dispatch
    pub use crate::dispatch::{EncodeOutput, HttpResponseData, Router, TransactionOutcome};

    // Client, config, errors
    pub use crate::client::{GatewayClient, GatewayClientBuilder};
    pub use crate::config::GatewayConfig;
    pub use crate::error::{CodecError, ConfigError, GatewayError, NodeError, ServiceError};
    pub use crate::logging::{init_logging, LogFormat};
}
