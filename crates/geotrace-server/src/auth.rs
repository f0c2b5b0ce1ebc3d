//! Bearer token middleware for protected routes

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use geotrace_core::bearer_token;

use crate::error::ApiError;
use crate::AppState;

/// Reject the request before it reaches the handler unless it carries a
/// valid, unexpired bearer token. The verified identity is stored in the
/// request extensions.
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let identity = match state.gate.authorize(bearer_token(header)) {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!("Rejected {} {}: {}", request.method(), request.uri(), e);
            return Err(e.into());
        }
    };

    tracing::debug!("Authorized '{}' for {}", identity.subject, request.uri());
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
