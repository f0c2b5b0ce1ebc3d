//! Geotrace Server - location ingestion API
//!
//! HTTP surface over geotrace-core: passive IP tracking, event logging,
//! operator login and bearer-protected history retrieval.

pub mod auth;
pub mod error;
pub mod http;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use geotrace_core::{
    AccessGate, CredentialIssuer, EventStore, GeoResolver, GeotraceConfig, IngestionService,
};

pub use error::ApiError;

/// Shared application state, built once at startup
pub struct AppState {
    pub config: GeotraceConfig,
    pub resolver: GeoResolver,
    pub ingestion: IngestionService,
    pub issuer: CredentialIssuer,
    pub gate: AccessGate,
}

impl AppState {
    /// Wire every component from the configuration. Creates the store schema if absent.
    pub fn new(config: GeotraceConfig) -> geotrace_core::Result<Self> {
        let store = EventStore::open(&config.store.db_path)?;
        let resolver = GeoResolver::new(&config.oracle)?;

        Ok(Self {
            resolver,
            ingestion: IngestionService::new(store),
            issuer: CredentialIssuer::new(&config.auth),
            gate: AccessGate::new(&config.auth),
            config,
        })
    }

    pub fn store(&self) -> &EventStore {
        self.ingestion.store()
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut history = Router::new().route("/get-all-targets", get(http::get_all_targets));
    if state.config.server.require_auth {
        history = history.route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));
    } else {
        tracing::warn!("Auth disabled: event history is readable without a token");
    }

    Router::new()
        // Passive inference
        .route("/track-ip", get(http::track_ip))
        .route("/track", get(http::track_ip))
        // Ingestion
        .route("/log-target", post(http::log_target))
        // Credentials
        .route("/login", post(http::login))
        .merge(history)
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Start the server on the configured address
pub async fn serve(state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let addr = state.config.server.bind_addr.clone();
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Geotrace server listening on {}", addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
