//! Gateway error definitions and transaction outcome.

use alloy::providers::PendingTransactionError;
use alloy::transports::TransportError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

// Re-export BlockchainConfig from config module to avoid duplication
pub use crate::config::schema::BlockchainConfig;

/// Errors that can occur during gateway operations.
///
/// Display output carries the underlying message unchanged; the HTTP layer
/// prefixes it with the failed operation.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed outside a contract call.
    #[error("{0}")]
    Rpc(String),

    /// Low-level transport failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Contract call or transaction submission failed (includes reverts).
    #[error(transparent)]
    Contract(#[from] alloy::contract::Error),

    /// Waiting for the transaction receipt failed.
    #[error(transparent)]
    Confirmation(#[from] PendingTransactionError),

    /// Transaction was included but reverted on-chain.
    #[error("transaction {0} reverted")]
    Reverted(String),

    /// Address string is not a valid 20-byte hex address.
    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    /// Amount string is not a non-negative decimal with at most 18 fractional digits.
    #[error("invalid amount '{0}': {1}")]
    InvalidAmount(String, String),

    /// Contract value is not a non-negative integer.
    #[error("invalid value '{0}': expected a non-negative integer")]
    InvalidValue(String),

    /// Event name outside the contract's event set.
    #[error("unknown event '{0}'")]
    UnknownEvent(String),

    /// Required configuration value is absent.
    #[error("{0} is not defined in the config")]
    MissingConfig(&'static str),

    /// Invalid private key format.
    #[error("Wallet error: {0}")]
    Wallet(String),
}

/// Result type for gateway operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Outcome of a confirmed write transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionOutcome {
    #[schema(example = true)]
    pub success: bool,
    /// 0x-prefixed transaction hash.
    #[schema(example = "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060")]
    pub transaction_hash: String,
    /// Block the transaction was included in.
    #[schema(example = 1234567)]
    pub block_number: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BlockchainError::MissingConfig("PRIVATE_KEY");
        assert_eq!(err.to_string(), "PRIVATE_KEY is not defined in the config");

        let err = BlockchainError::InvalidAddress("0x12".into());
        assert_eq!(err.to_string(), "invalid address '0x12'");

        let err = BlockchainError::Rpc("connection refused".into());
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn test_outcome_serializes_camel_case() {
        let outcome = TransactionOutcome {
            success: true,
            transaction_hash: "0xabc".into(),
            block_number: 7,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": true, "transactionHash": "0xabc", "blockNumber": 7})
        );
    }
}
