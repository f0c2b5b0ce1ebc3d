//! HTTP endpoint handlers

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, Request, State},
    Json,
};
use serde::{Deserialize, Serialize};

use geotrace_core::{
    effective_identity, Acknowledgement, LocationEvent, LocationEventInput, Resolution, TOKEN_TYPE,
};

use crate::error::ApiError;
use crate::AppState;

/// Header set by reverse proxies; the first value is the original client
pub const FORWARDED_FOR: &str = "x-forwarded-for";

/// Infer the caller's location from their network address.
///
/// Always answers 200; a failed lookup is reported in the body with
/// `status: "fail"` and zeroed coordinates.
pub async fn track_ip(State(state): State<Arc<AppState>>, request: Request) -> Json<Resolution> {
    let forwarded = request
        .headers()
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok());
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let identity = effective_identity(forwarded, peer);
    Json(state.resolver.resolve(identity).await)
}

/// Record a location event
pub async fn log_target(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LocationEventInput>, JsonRejection>,
) -> Result<Json<Acknowledgement>, ApiError> {
    let Json(input) = payload?;

    let ingestion = state.ingestion.clone();
    let ack = tokio::task::spawn_blocking(move || ingestion.record(input)).await??;

    Ok(Json(ack))
}

/// List every recorded event, newest first
pub async fn get_all_targets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LocationEvent>>, ApiError> {
    let store = state.store().clone();
    let events = tokio::task::spawn_blocking(move || store.list_all()).await??;

    tracing::debug!("Returning {} location events", events.len());
    Ok(Json(events))
}

/// Operator login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Issued bearer token
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Exchange operator credentials for a bearer token
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = payload?;
    let token = state
        .issuer
        .authenticate(&request.username, &request.password)?;

    Ok(Json(LoginResponse {
        access_token: token.token,
        token_type: TOKEN_TYPE.to_string(),
    }))
}
