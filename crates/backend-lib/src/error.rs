// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Fixed body returned for every 500 response.
pub const INTERNAL_ERROR_BODY: &str = "500 - InternalServerError";

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Credential mismatch on signin, or no record behind a valid token.
    #[error("Unauthorized")]
    Unauthorized,

    /// Token signature, algorithm or structure rejected.
    #[error("Authentication error: {0}")]
    Unauthenticated(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized | AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) | AppError::Io(_) | AppError::Json(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "REQ_001",
            AppError::Unauthorized => "AUTH_001",
            AppError::Unauthenticated(_) => "AUTH_002",
            AppError::Internal(_) => "INT_001",
            AppError::Io(_) => "IO_001",
            AppError::Json(_) => "JSON_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::BadRequest(_) => "Invalid request format".to_string(),
            AppError::Unauthorized => "Unauthorized".to_string(),
            AppError::Unauthenticated(_) => "invalid or expired jwt".to_string(),
            AppError::Internal(_) | AppError::Io(_) | AppError::Json(_) => {
                INTERNAL_ERROR_BODY.to_string()
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 500s never carry detail
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
            return (
                status,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                INTERNAL_ERROR_BODY,
            )
                .into_response();
        }

        tracing::debug!(code = self.error_code(), error = %self, "request rejected");

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}
