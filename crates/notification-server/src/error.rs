//! API error types and handling.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Notification signature does not match")]
    SignatureMismatch,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::SignatureMismatch => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::SignatureMismatch => "SIGNATURE_MISMATCH",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<fawry_core::Error> for ApiError {
    fn from(error: fawry_core::Error) -> Self {
        use fawry_core::Error;

        match error {
            Error::MissingField { .. } | Error::InvalidField { .. } | Error::Json(_) => {
                ApiError::BadRequest(error.to_string())
            }
            Error::SignatureMismatch => ApiError::SignatureMismatch,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(
                error_code = self.error_code(),
                error = %self,
                "Internal server error"
            );
        }

        let body = ErrorResponse::new(self.error_code(), self.to_string());

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
