//! REST gateway for a single Ethereum vault contract.

pub mod blockchain;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use blockchain::ContractGateway;
pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
