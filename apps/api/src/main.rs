mod assembly;
mod catalog;
mod config;
mod errors;
mod import;
mod models;
mod render;
mod routes;
mod sessions;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::GitHubCatalogClient;
use crate::config::Config;
use crate::import::services::AnalysisClient;
use crate::import::ImportOrchestrator;
use crate::render::RenderClient;
use crate::routes::build_router;
use crate::sessions::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting DevProfile API v{}", env!("CARGO_PKG_VERSION"));

    // Repository catalog
    let catalog = GitHubCatalogClient::new(
        config.github_api_url.clone(),
        config.github_token.clone(),
        config.catalog_cache_ttl,
    )?;
    info!(
        "GitHub catalog client initialized ({}, cap {}, authenticated: {})",
        config.github_api_url,
        config.catalog_limit,
        config.github_token.is_some()
    );

    // Analysis services: one client serves both skill extraction and bullet generation
    let analysis = Arc::new(AnalysisClient::new(config.analysis_service_url.clone())?);
    let orchestrator =
        ImportOrchestrator::new(analysis.clone(), analysis, config.analysis_timeout);
    info!(
        "Analysis client initialized ({}, timeout {}s)",
        config.analysis_service_url,
        config.analysis_timeout.as_secs()
    );

    let renderer = RenderClient::new(config.render_service_url.clone())?;
    info!("Render client initialized ({})", config.render_service_url);

    // Build app state
    let state = AppState {
        catalog: Arc::new(catalog),
        orchestrator,
        renderer: Arc::new(renderer),
        sessions: SessionStore::new(),
        catalog_limit: config.catalog_limit,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
