//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env file (dotenvy, loaded by main)
//! optional config file (TOML)
//!     → loader.rs (parse, apply environment overrides)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the process never reloads it
//! - All fields have defaults to allow minimal configs
//! - Secrets (the signing key) come from the environment only

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{BlockchainConfig, GatewayConfig, LogFormat, ObservabilityConfig, ServerConfig};
