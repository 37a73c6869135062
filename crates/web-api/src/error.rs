//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use optsync_core::DomainError;
use optsync_fyers::FyersError;
use serde_json::json;

/// Wrapper turning the shared error taxonomy into HTTP responses.
///
/// Bodies are `{"error": "..."}` across the board. Upstream broker
/// messages pass through verbatim; internal errors are logged and masked.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl ApiError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self(DomainError::not_found(what))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self(DomainError::validation(msg))
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self(DomainError::configuration(msg))
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self(DomainError::Internal(err))
    }
}

impl From<FyersError> for ApiError {
    fn from(err: FyersError) -> Self {
        let mapped = match err {
            FyersError::MissingCredential(field) => {
                DomainError::configuration(format!("missing credential: {field}"))
            }
            other => DomainError::upstream(other.to_string()),
        };
        Self(mapped)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            DomainError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            DomainError::Configuration(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            DomainError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            DomainError::Internal(err) => {
                tracing::error!(error = %err, "Internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
