//! API error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error types for HTTP responses
///
/// Vote rejections are not errors; they are returned as outcomes with 200.
#[derive(Debug)]
pub enum ApiError {
    /// No caller identity on an administrative request
    MissingIdentity,
    /// Caller identity is not privileged
    Forbidden(String),
    NotFound(String),
    Internal(String),
}

impl From<svy_common::Error> for ApiError {
    fn from(err: svy_common::Error) -> Self {
        match err {
            svy_common::Error::OutOfRange { .. } => ApiError::NotFound(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MissingIdentity => (
                StatusCode::UNAUTHORIZED,
                format!("Missing {} header", crate::IDENTITY_HEADER),
            ),
            ApiError::Forbidden(identity) => (
                StatusCode::FORBIDDEN,
                format!("Identity '{}' is not allowed to perform administrative actions", identity),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Internal error: {}", msg)),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
