//! Error types for meetrank-rc HTTP handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::engine::{IncorporateError, SubmissionError};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Submission refused (400); nothing was stored
    #[error("{0}")]
    Validation(#[from] SubmissionError),

    /// meetrank-common error (store, config, I/O)
    #[error("Common error: {0}")]
    Common(#[from] meetrank_common::Error),
}

impl From<IncorporateError> for ApiError {
    fn from(err: IncorporateError) -> Self {
        match err {
            IncorporateError::Validation(e) => ApiError::Validation(e),
            IncorporateError::Store(e) => ApiError::Common(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::Validation(err) => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED", err.to_string()),
            ApiError::Common(err) => (StatusCode::INTERNAL_SERVER_ERROR, "COMMON_ERROR", err.to_string()),
        };

        if status.is_server_error() {
            tracing::error!("{}: {}", error_code, message);
        }

        let mut body = json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        // A refused submission still answers with an (empty) row set
        if matches!(self, ApiError::Validation(_)) {
            body["rows"] = json!([]);
        }

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
