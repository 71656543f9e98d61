//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers under the API prefix
//! - Wire up middleware (request ID, tracing, body limit, metrics)
//! - Serve the OpenAPI document next to `/health`
//! - Bind server to listener and serve until shutdown

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    middleware,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::blockchain::ContractGateway;
use crate::config::ServerConfig;
use crate::http::handlers;
use crate::http::openapi::{self, OPENAPI_PATH};
use crate::http::request::{request_id, RequestIdGenerator};
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<ContractGateway>,
    /// Bound on read endpoints; writes are never cut short.
    pub read_timeout: Option<Duration>,
}

/// HTTP facade over the contract gateway.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server sharing one gateway across all requests.
    pub fn new(config: ServerConfig, gateway: Arc<ContractGateway>) -> Self {
        let state = AppState {
            gateway,
            read_timeout: config.read_timeout_secs.map(Duration::from_secs),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let api = Router::new()
            .route("/balance/{address}", get(handlers::get_balance))
            .route("/contract-balance", get(handlers::get_contract_balance))
            .route("/value", get(handlers::get_value))
            .route("/paused", get(handlers::is_paused))
            .route("/deposit", post(handlers::deposit))
            .route("/withdraw", post(handlers::withdraw))
            .route("/set-value", post(handlers::set_value))
            .route("/set-paused", post(handlers::set_paused));

        let router = if config.api_prefix == "/" {
            Router::new().merge(api)
        } else {
            Router::new().nest(&config.api_prefix, api)
        };

        let doc = openapi::document(&config.api_prefix);
        let router = router
            .route("/health", get(handlers::health))
            .route(OPENAPI_PATH, get(move || std::future::ready(Json(doc.clone()))))
            .route_layer(middleware::from_fn(metrics::track_requests))
            .layer(DefaultBodyLimit::max(config.max_body_size))
            .with_state(state);

        router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(RequestIdGenerator))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id(request),
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
    }

    /// Get a clone of the router, e.g. to drive it in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            api_prefix = %self.config.api_prefix,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
