//! websearch-rs: a small JSON web service in front of DuckDuckGo
//!
//! This is the main entry point for the application.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use websearch_rs::{
    config, logging,
    network::HttpClient,
    provider::DuckDuckGo,
    web::{create_router, AppState},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let (settings, source) = config::load()?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = logging::init(&settings.logging)?;

    info!("Starting websearch-rs v{}", websearch_rs::VERSION);
    match source {
        Some(path) => info!("Loaded settings from: {}", path.display()),
        None => info!("No settings file found, using defaults"),
    }

    // Initialize HTTP client and provider
    let client = HttpClient::with_settings(&settings.outgoing)?;
    let provider = Arc::new(DuckDuckGo::new(client));
    info!("Search provider initialized");

    // Bind address
    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    // Create router
    let state = AppState::new(settings, provider)?;
    let app = create_router(state);

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
