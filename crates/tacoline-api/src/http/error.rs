//! Application error type mapping to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use tacoline_infra::line::signature::SignatureError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Webhook signature missing or invalid.
    Signature(SignatureError),
    /// Request body could not be understood.
    BadRequest(String),
    /// Generic internal error.
    Internal(String),
}

impl From<SignatureError> for AppError {
    fn from(e: SignatureError) -> Self {
        AppError::Signature(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Signature(SignatureError::InvalidKey(msg)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                format!("invalid channel secret: {msg}"),
            ),
            AppError::Signature(e) => (StatusCode::BAD_REQUEST, "INVALID_SIGNATURE", e.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        };

        if status.is_server_error() {
            tracing::error!(code, %message, "request failed");
        } else {
            tracing::warn!(code, %message, "request rejected");
        }

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
