//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Presence of the contract address and signing key is checked when the
//!   gateway is built, not here

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

/// Check semantic constraints serde cannot express.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a socket address", config.server.bind_address),
        ));
    }

    let prefix = &config.server.api_prefix;
    if !prefix.starts_with('/') {
        errors.push(ValidationError::new("server.api_prefix", "must start with '/'"));
    } else if prefix.len() > 1 && prefix.ends_with('/') {
        errors.push(ValidationError::new("server.api_prefix", "must not end with '/'"));
    }

    if config.server.max_body_size == 0 {
        errors.push(ValidationError::new("server.max_body_size", "must be greater than 0"));
    }

    if config.server.read_timeout_secs == Some(0) {
        errors.push(ValidationError::new("server.read_timeout_secs", "must be greater than 0"));
    }

    if config.blockchain.confirmation_blocks == 0 {
        errors.push(ValidationError::new("blockchain.confirmation_blocks", "must be at least 1"));
    }

    if config.blockchain.event_poll_interval_ms == 0 {
        errors.push(ValidationError::new("blockchain.event_poll_interval_ms", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
