//! search-exporter: web UI entry point

use anyhow::Result;
use search_exporter::{
    config::{self, CredentialChain},
    network::HttpClient,
    web::{create_router, AppState},
};
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = config::load()?;

    // Initialize logging
    let default_level = if settings.general.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    info!("Starting search-exporter v{}", search_exporter::VERSION);

    let client = HttpClient::with_settings(&settings.outgoing)?;
    let credentials = CredentialChain::from_settings(&settings.credentials);

    let addr = SocketAddr::new(settings.server.bind_address.parse()?, settings.server.port);

    let state = AppState::from_settings(settings, &credentials, client)?;
    if !state.is_configured() {
        warn!("No API key configured; searches will be refused");
    }

    let app = create_router(state);

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
