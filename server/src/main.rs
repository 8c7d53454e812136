use anyhow::Context;
use registry::Registry;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod api;
mod auth;
mod config;
mod error;
mod registry;

use config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let json = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("reading config {path}"))?;
            ServerConfig::load_from_json(&json).with_context(|| format!("parsing config {path}"))?
        }
        None => ServerConfig::default(),
    };
    let addr = config.bind_addr;

    let registry = Arc::new(Registry::new(config));
    let lifecycle = Arc::clone(&registry).spawn_lifecycle_task();

    let app = api::router(Arc::clone(&registry));

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;

    lifecycle.abort();
    tracing::info!(
        sessions = registry.session_count(),
        "Lifecycle task stopped, dropping sessions"
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Cannot listen for ctrl-c, running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
