//! OpenAPI description of the contract endpoints.
//!
//! Paths are relative to the API prefix, which is published as the document's
//! server URL so the document follows `server.api_prefix`.

use utoipa::openapi::{OpenApi as OpenApiDocument, Server};
use utoipa::OpenApi;

use crate::blockchain::types::TransactionOutcome;
use crate::http::handlers;
use crate::http::request::{AmountRequest, SetPausedRequest, SetValueRequest};
use crate::http::response::{
    BalanceResponse, ContractBalanceResponse, ErrorResponse, PausedResponse, ValueResponse,
};

/// Where the document is served, outside the API prefix.
pub const OPENAPI_PATH: &str = "/api/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ethereum Contract API",
        description = "REST API for interacting with a deployed vault contract"
    ),
    paths(
        handlers::get_balance,
        handlers::get_contract_balance,
        handlers::get_value,
        handlers::is_paused,
        handlers::deposit,
        handlers::withdraw,
        handlers::set_value,
        handlers::set_paused,
    ),
    components(schemas(
        AmountRequest,
        SetValueRequest,
        SetPausedRequest,
        BalanceResponse,
        ContractBalanceResponse,
        ValueResponse,
        PausedResponse,
        TransactionOutcome,
        ErrorResponse,
    )),
    tags((name = "ethereum", description = "Contract reads and writes"))
)]
struct ApiDoc;

/// Build the document for endpoints mounted under `api_prefix`.
pub fn document(api_prefix: &str) -> OpenApiDocument {
    let mut doc = ApiDoc::openapi();
    doc.info.version = env!("CARGO_PKG_VERSION").to_string();
    doc.servers = Some(vec![Server::new(api_prefix)]);
    doc
}
