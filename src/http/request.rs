//! Request bodies and request identification.
//!
//! # Design Decisions
//! - Request ID (UUID v4) is assigned before tracing so every span carries it
//! - Bodies are checked for shape only; semantic checks happen in the gateway

use axum::http::{HeaderValue, Request};
use serde::{Deserialize, Serialize};
use tower_http::request_id::{MakeRequestId, RequestId};
use utoipa::ToSchema;
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates a fresh UUID v4 request ID for requests that lack one.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdGenerator;

impl MakeRequestId for RequestIdGenerator {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Read the request ID assigned to a request, if any.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Body of `POST /deposit` and `POST /withdraw`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AmountRequest {
    /// Ether amount as a decimal string, e.g. "0.00000001".
    #[schema(example = "0.00000001")]
    pub amount: String,
}

/// Body of `POST /set-value`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetValueRequest {
    /// Any JSON number; the gateway rejects non-integers.
    #[schema(value_type = u64, example = 42)]
    pub value: serde_json::Number,
}

/// Body of `POST /set-paused`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetPausedRequest {
    #[schema(example = true)]
    pub paused: bool,
}
