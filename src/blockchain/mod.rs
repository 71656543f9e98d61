//! Contract gateway subsystem.
//!
//! # Data Flow
//! ```text
//! Environment (PRIVATE_KEY, CONTRACT_ADDRESS, ETHEREUM_RPC_URL)
//!     → wallet.rs (key loading)
//!     → gateway.rs (provider + contract handle, one call per operation)
//!     → units.rs (ether strings ⇄ wei)
//!     → events.rs (background log polling for subscriptions)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data

pub mod contract;
pub mod events;
pub mod gateway;
pub mod types;
pub mod units;
pub mod wallet;

pub use events::{ContractEvent, EventKind, Subscription};
pub use gateway::ContractGateway;
pub use types::{BlockchainConfig, BlockchainError, BlockchainResult, TransactionOutcome};
pub use wallet::Wallet;
