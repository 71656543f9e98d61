//! Endpoint handlers.
//!
//! Each handler extracts its input, calls exactly one gateway operation and
//! maps the result. Reads answer 200, writes answer 201 once the transaction
//! is included, and every failure answers 500.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use std::future::Future;

use crate::blockchain::types::{BlockchainResult, TransactionOutcome};
use crate::blockchain::units;
use crate::http::request::{AmountRequest, SetPausedRequest, SetValueRequest};
use crate::http::response::{
    ApiError, ApiResult, BalanceResponse, ContractBalanceResponse, ErrorResponse, HealthResponse,
    Operation, PausedResponse, ValueResponse,
};
use crate::http::server::AppState;

type Created<T> = (StatusCode, Json<T>);

/// Unwrap an extractor result, reporting shape errors as operation failures.
fn extract<T, R: std::fmt::Display>(operation: Operation, payload: Result<T, R>) -> ApiResult<T> {
    payload.map_err(|rejection| ApiError::new(operation, rejection))
}

/// Run a read against the gateway, bounded by the configured read timeout.
async fn read<T, F>(state: &AppState, operation: Operation, call: F) -> ApiResult<T>
where
    F: Future<Output = BlockchainResult<T>>,
{
    let result = match state.read_timeout {
        Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
            ApiError::new(operation, format!("request timed out after {}s", limit.as_secs()))
        })?,
        None => call.await,
    };
    result.map_err(|e| ApiError::new(operation, e))
}

/// Run a write. Writes are not cut short once submitted.
async fn write<F>(operation: Operation, call: F) -> ApiResult<Created<TransactionOutcome>>
where
    F: Future<Output = BlockchainResult<TransactionOutcome>>,
{
    let outcome = call.await.map_err(|e| ApiError::new(operation, e))?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[utoipa::path(
    get,
    path = "/balance/{address}",
    tag = "ethereum",
    params(("address" = String, Path, description = "Account address", example = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")),
    responses(
        (status = 200, description = "Deposited balance of the account", body = BalanceResponse),
        (status = 500, description = "Get balance failed", body = ErrorResponse)
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    address: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<BalanceResponse>> {
    let Path(address) = extract(Operation::GetBalance, address)?;
    let balance = read(&state, Operation::GetBalance, state.gateway.get_balance(&address)).await?;
    Ok(Json(BalanceResponse { address, balance }))
}

#[utoipa::path(
    get,
    path = "/contract-balance",
    tag = "ethereum",
    responses(
        (status = 200, description = "Ether held by the contract", body = ContractBalanceResponse),
        (status = 500, description = "Get contract balance failed", body = ErrorResponse)
    )
)]
pub async fn get_contract_balance(
    State(state): State<AppState>,
) -> ApiResult<Json<ContractBalanceResponse>> {
    let balance = read(
        &state,
        Operation::GetContractBalance,
        state.gateway.get_contract_balance(),
    )
    .await?;
    Ok(Json(ContractBalanceResponse { balance }))
}

#[utoipa::path(
    get,
    path = "/value",
    tag = "ethereum",
    responses(
        (status = 200, description = "Stored contract value", body = ValueResponse),
        (status = 500, description = "Get value failed", body = ErrorResponse)
    )
)]
pub async fn get_value(State(state): State<AppState>) -> ApiResult<Json<ValueResponse>> {
    let value = read(&state, Operation::GetValue, state.gateway.get_value()).await?;
    Ok(Json(ValueResponse { value }))
}

#[utoipa::path(
    get,
    path = "/paused",
    tag = "ethereum",
    responses(
        (status = 200, description = "Whether the contract is paused", body = PausedResponse),
        (status = 500, description = "Pause status check failed", body = ErrorResponse)
    )
)]
pub async fn is_paused(State(state): State<AppState>) -> ApiResult<Json<PausedResponse>> {
    let paused = read(&state, Operation::CheckPaused, state.gateway.is_paused()).await?;
    Ok(Json(PausedResponse { paused }))
}

#[utoipa::path(
    post,
    path = "/deposit",
    tag = "ethereum",
    request_body = AmountRequest,
    responses(
        (status = 201, description = "Deposit included in a block", body = TransactionOutcome),
        (status = 500, description = "Deposit failed", body = ErrorResponse)
    )
)]
pub async fn deposit(
    State(state): State<AppState>,
    payload: Result<Json<AmountRequest>, JsonRejection>,
) -> ApiResult<Created<TransactionOutcome>> {
    let Json(request) = extract(Operation::Deposit, payload)?;
    write(Operation::Deposit, state.gateway.deposit(&request.amount)).await
}

#[utoipa::path(
    post,
    path = "/withdraw",
    tag = "ethereum",
    request_body = AmountRequest,
    responses(
        (status = 201, description = "Withdrawal included in a block", body = TransactionOutcome),
        (status = 500, description = "Withdrawal failed", body = ErrorResponse)
    )
)]
pub async fn withdraw(
    State(state): State<AppState>,
    payload: Result<Json<AmountRequest>, JsonRejection>,
) -> ApiResult<Created<TransactionOutcome>> {
    let Json(request) = extract(Operation::Withdraw, payload)?;
    write(Operation::Withdraw, state.gateway.withdraw(&request.amount)).await
}

#[utoipa::path(
    post,
    path = "/set-value",
    tag = "ethereum",
    request_body = SetValueRequest,
    responses(
        (status = 201, description = "New value included in a block", body = TransactionOutcome),
        (status = 500, description = "Setting value failed", body = ErrorResponse)
    )
)]
pub async fn set_value(
    State(state): State<AppState>,
    payload: Result<Json<SetValueRequest>, JsonRejection>,
) -> ApiResult<Created<TransactionOutcome>> {
    let Json(request) = extract(Operation::SetValue, payload)?;
    let new_value =
        units::parse_value(&request.value).map_err(|e| ApiError::new(Operation::SetValue, e))?;
    write(Operation::SetValue, state.gateway.set_value(new_value)).await
}

#[utoipa::path(
    post,
    path = "/set-paused",
    tag = "ethereum",
    request_body = SetPausedRequest,
    responses(
        (status = 201, description = "Pause flag included in a block", body = TransactionOutcome),
        (status = 500, description = "Setting pause status failed", body = ErrorResponse)
    )
)]
pub async fn set_paused(
    State(state): State<AppState>,
    payload: Result<Json<SetPausedRequest>, JsonRejection>,
) -> ApiResult<Created<TransactionOutcome>> {
    let Json(request) = extract(Operation::SetPaused, payload)?;
    write(Operation::SetPaused, state.gateway.set_paused(request.paused)).await
}
