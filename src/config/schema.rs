//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from a TOML file; every
//! field has a default so an empty file (or no file) is a valid config.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP listener and routing settings.
    pub server: ServerConfig,

    /// Chain endpoint and contract settings.
    pub blockchain: BlockchainConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,

    /// Path prefix all contract endpoints are nested under.
    pub api_prefix: String,

    /// Optional timeout in seconds for the read endpoints.
    ///
    /// Writes are never cut short here; `blockchain.receipt_timeout_secs`
    /// bounds how long they wait for inclusion.
    pub read_timeout_secs: Option<u64>,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
            api_prefix: "/ethereum".to_string(),
            read_timeout_secs: None,
            max_body_size: 100 * 1024,
        }
    }
}

/// Chain endpoint and contract configuration.
///
/// The signing key is deliberately absent: it is read from the environment
/// only (see `blockchain::wallet`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Deployed contract address. Required at startup.
    pub contract_address: Option<String>,

    /// Confirmations to wait for before a write is reported.
    pub confirmation_blocks: u64,

    /// Optional limit on waiting for a receipt, in seconds.
    pub receipt_timeout_secs: Option<u64>,

    /// Event subscription polling interval in milliseconds.
    pub event_poll_interval_ms: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            contract_address: None,
            confirmation_blocks: 1,
            receipt_timeout_secs: None,
            event_poll_interval_ms: 4000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,

    /// Log every Deposit, Withdrawal and ValueSet event.
    pub log_contract_events: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
            log_contract_events: false,
        }
    }
}
