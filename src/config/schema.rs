//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.
//! The signing key is deliberately absent: it only ever comes from the
//! environment (see [`crate::blockchain::wallet::PRIVATE_KEY_ENV_VAR`]).

use serde::{Deserialize, Serialize};

/// Root configuration for the client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Ledger endpoint and confirmation settings.
    pub network: NetworkConfig,

    /// Target contract.
    pub contract: ContractConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Network profile for the JSON-RPC relay.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Chain ID (296 for Hedera testnet).
    pub chain_id: u64,

    /// Per-request RPC timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Number of blocks (including the inclusion block) before a
    /// transaction counts as final.
    pub confirmation_blocks: u32,

    /// Upper bound on the confirmation wait in seconds. 0 waits forever.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Explorer URL prefix; the transaction hash is appended.
    pub explorer_tx_url: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://testnet.hashio.io/api".to_string(),
            chain_id: 296,
            rpc_timeout_secs: 30,
            confirmation_blocks: 1,
            confirmation_timeout_secs: 120,
            poll_interval_ms: 1000,
            explorer_tx_url: "https://hashscan.io/testnet/transaction/".to_string(),
        }
    }
}

/// Contract location and interface.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Deployed contract address (0x-prefixed hex).
    pub address: String,

    /// Optional path to a JSON ABI or compiled artifact. The built-in
    /// interface is used when unset.
    pub abi_path: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
