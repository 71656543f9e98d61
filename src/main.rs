//! Contract gateway service.
//!
//! # Architecture Overview
//!
//! ```text
//!   HTTP client
//!       │  GET /ethereum/value, POST /ethereum/deposit, ...
//!       ▼
//!   ┌──────────────┐     ┌──────────────────┐     ┌──────────────┐
//!   │ HTTP facade  │────▶│ Contract gateway │────▶│ JSON-RPC node│
//!   │ (axum)       │◀────│ (alloy)          │◀────│              │
//!   └──────────────┘     └──────────────────┘     └──────────────┘
//!                              │ event polling
//!                              ▼
//!                        subscriptions (optional log sink)
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use contract_gateway::blockchain::{ContractGateway, EventKind, Subscription, Wallet};
use contract_gateway::config::load_config;
use contract_gateway::http::HttpServer;
use contract_gateway::lifecycle::{signals, Shutdown};
use contract_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "contract-gateway")]
#[command(about = "REST API for a deployed vault contract", long_about = None)]
struct Args {
    /// Optional TOML config file; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    let config = load_config(args.config.as_deref())?;
    logging::init(&config.observability)?;

    tracing::info!("contract-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        api_prefix = %config.server.api_prefix,
        rpc_url = %config.blockchain.rpc_url,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Address already checked by validation.
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let wallet = Wallet::from_env()?;
    let gateway = Arc::new(ContractGateway::new(&config.blockchain, wallet)?);

    let subscriptions: Vec<Subscription> = if config.observability.log_contract_events {
        EventKind::ALL
            .into_iter()
            .map(|kind| {
                gateway.subscribe(kind, |event| tracing::info!(event = ?event, "Contract event"))
            })
            .collect()
    } else {
        Vec::new()
    };

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config.server.clone(), gateway);
    server.run(listener, shutdown.subscribe()).await?;

    for subscription in &subscriptions {
        subscription.cancel();
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
