mod config;
mod embedding;
mod errors;
mod llm_client;
mod ollama;
mod routes;
mod scoring;
mod skills;
mod state;
mod telemetry;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::scoring::engine::ScoringEngine;
use crate::state::AppState;
use crate::telemetry::{init_metrics, metrics_router};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on invalid env vars or unknown providers)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Match-Line scoring service v{}", env!("CARGO_PKG_VERSION"));

    // Build backends and the shared cache. Unreachable backends abort startup.
    let engine = ScoringEngine::from_config(&config)
        .await
        .context("Failed to initialize scoring engine")?;

    let mut app = build_router(AppState::ready(engine));
    if let Some(metrics) = init_metrics(config.metrics_enabled) {
        app = app.merge(metrics_router(metrics));
    }
    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
