use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use core::TransferError;
use serde_json::json;

/// Custom error type for API handlers
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Conflict(String),
    Forbidden(String),
    BadRequest(String),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<TransferError> for ApiError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::NotFound(msg) => ApiError::NotFound(msg),
            TransferError::Conflict(msg) => ApiError::Conflict(msg),
            TransferError::Authorization(msg) => ApiError::Forbidden(msg),
            TransferError::Validation(msg) => ApiError::BadRequest(msg),
            TransferError::Storage(msg) => ApiError::InternalError(msg),
        }
    }
}

/// Helper type for handler results
pub type ApiResult<T> = Result<T, ApiError>;
