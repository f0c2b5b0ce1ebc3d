//! JSON error responses

use axum::extract::rejection::JsonRejection;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use geotrace_core::{AuthError, AuthzError, GeotraceError, PersistenceError};

/// Every failure a handler can surface. Always rendered as a JSON object.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] GeotraceError),

    /// Body missing, not JSON, or fields of the wrong type
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Blocking store task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Core(err.into())
    }
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        ApiError::Core(err.into())
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        ApiError::Core(err.into())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Task(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, reason) = match &self {
            ApiError::Core(GeotraceError::Validation(_)) | ApiError::InvalidBody(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, None)
            }
            ApiError::Core(GeotraceError::Auth(AuthError::InvalidCredentials)) => {
                (StatusCode::UNAUTHORIZED, None)
            }
            ApiError::Core(GeotraceError::Authz(err)) => (StatusCode::UNAUTHORIZED, Some(err.kind())),
            ApiError::Core(GeotraceError::Auth(AuthError::TokenIssue(_)))
            | ApiError::Core(GeotraceError::Persistence(_))
            | ApiError::Core(GeotraceError::Config(_))
            | ApiError::Task(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", message);
        }

        let mut body = json!({
            "status": "error",
            "message": message,
        });
        if let Some(reason) = reason {
            body["reason"] = json!(reason);
            return (
                status,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                Json(body),
            )
                .into_response();
        }

        (status, Json(body)).into_response()
    }
}
