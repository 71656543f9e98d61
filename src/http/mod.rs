//! HTTP facade subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, body shapes)
//!     → handlers.rs (one gateway call per endpoint)
//!     → response.rs (JSON bodies, failure → 500)
//!     → Send to client
//! ```
//!
//! `openapi.rs` describes the endpoints; the document is served at
//! `/api/openapi.json`.

pub mod handlers;
pub mod openapi;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdGenerator, X_REQUEST_ID};
pub use response::{ApiError, Operation};
pub use server::{AppState, HttpServer};
