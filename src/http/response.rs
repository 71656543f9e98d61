//! Response bodies and error mapping.
//!
//! Every failure, whatever its source, becomes HTTP 500 with
//! `{"message": "<operation> failed: <error>"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Facade operations, used to label error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetBalance,
    GetContractBalance,
    GetValue,
    CheckPaused,
    Deposit,
    Withdraw,
    SetValue,
    SetPaused,
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Operation::GetBalance => "Get balance",
            Operation::GetContractBalance => "Get contract balance",
            Operation::GetValue => "Get value",
            Operation::CheckPaused => "Pause status check",
            Operation::Deposit => "Deposit",
            Operation::Withdraw => "Withdrawal",
            Operation::SetValue => "Setting value",
            Operation::SetPaused => "Setting pause status",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A failed facade operation.
#[derive(Debug)]
pub struct ApiError {
    pub operation: Operation,
    pub message: String,
}

impl ApiError {
    pub fn new(operation: Operation, error: impl fmt::Display) -> Self {
        Self { operation, message: error.to_string() }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.operation, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(operation = %self.operation, error = %self.message, "Request failed");
        let body = ErrorResponse { message: self.to_string() };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Deposit failed: execution reverted: Pausable: paused")]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BalanceResponse {
    #[schema(example = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")]
    pub address: String,
    /// Ether amount.
    #[schema(example = "0.00000001")]
    pub balance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContractBalanceResponse {
    #[schema(example = "1.5")]
    pub balance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValueResponse {
    #[schema(example = "42")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PausedResponse {
    #[schema(example = true)]
    pub paused: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
