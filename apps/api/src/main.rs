mod config;
mod errors;
mod layout;
mod models;
mod problems;
mod routes;
mod state;
mod tutor_client;
mod worksheet;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::tutor_client::TutorApiClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tutor Console API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the remote tutoring API client
    let client = TutorApiClient::new(
        &config.tutor_api_url,
        Duration::from_secs(config.tutor_api_timeout_secs),
    )?;
    info!(
        "Tutor API client initialized ({}, timeout {}s)",
        client.base_url(),
        config.tutor_api_timeout_secs
    );

    // Build app state
    let state = AppState {
        backend: Arc::new(client),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the console's origin once it has a fixed deployment URL

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
