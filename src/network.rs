//! Node endpoint and chain defaults.

/// Default JSON-RPC endpoint of a local node.
pub const DEFAULT_NODE_URL: &str = "http://127.0.0.1:8545";

/// Default ledger group.
pub const DEFAULT_GROUP_ID: u64 = 1;
