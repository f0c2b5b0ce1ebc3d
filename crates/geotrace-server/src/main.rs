//! Geotrace Server Binary
//!
//! Usage: `geotrace-server [config.toml]`. Without a file the built-in
//! defaults are used.

use std::sync::Arc;

use geotrace_core::GeotraceConfig;
use geotrace_server::{serve, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                "geotrace_server=debug,geotrace_core=debug,tower_http=debug".into()
            }),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path);
            GeotraceConfig::load(&path)?
        }
        None => GeotraceConfig::default(),
    };

    let state = Arc::new(AppState::new(config)?);
    serve(state).await
}
