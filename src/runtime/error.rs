//! JSON error responses for handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::core::SubmitError;

/// Error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body is not a JSON object.
    #[error("Invalid payload")]
    InvalidPayload,

    /// The route exists but not for this method.
    #[error("Invalid method")]
    MethodNotAllowed,

    /// The pool rejected the job at admission.
    #[error(transparent)]
    Rejected(#[from] SubmitError),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::InvalidPayload => (StatusCode::BAD_REQUEST, "INVALID_PAYLOAD", self.to_string()),
            Self::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, "METHOD_NOT_ALLOWED", self.to_string())
            }
            Self::Rejected(SubmitError::QueueFull(_)) => (
                StatusCode::TOO_MANY_REQUESTS,
                "SERVER_BUSY",
                "Server busy, try again later".to_owned(),
            ),
            Self::Rejected(SubmitError::ShuttingDown(_)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SHUTTING_DOWN",
                "Server is shutting down".to_owned(),
            ),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal Server Error".to_owned(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
