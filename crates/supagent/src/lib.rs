//! supagent - record service for the crypto trading agent platform.
//!
//! Stores agents, their sessions, strategies, chat history, notifications,
//! wallet snapshots, users and payments, and exposes create/update/get for
//! each over an API-key protected HTTP interface.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use supagent::models::{AgentSession, SupagentConfig};
//! use supagent::store::RecordStore;
//! use supagent::api::{create_router, AppState};
//! ```

pub use supagent_api as api;
pub use supagent_models as models;
pub use supagent_store as store;

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context};
use axum::Router;
use supagent_api::{create_router, AppState};
use supagent_models::SupagentConfig;
use supagent_store::RecordStore;
use tokio_util::sync::CancellationToken;

/// Open the record store and build the HTTP router from configuration.
/// Fails when no API key can be resolved.
pub fn build_app(config: &SupagentConfig) -> Result<Router, anyhow::Error> {
    let Some(api_key) = config.auth.resolve_api_key() else {
        bail!(
            "no API key configured: set auth.api_key or the {} environment variable",
            config.auth.api_key_env
        );
    };

    let path = Path::new(&config.database.sqlite_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database directory: {}", parent.display()))?;
    }
    let store = RecordStore::open(
        path,
        Duration::from_millis(config.database.busy_timeout_ms),
    )
    .with_context(|| format!("Failed to open database: {}", config.database.sqlite_path))?;

    Ok(create_router(AppState::new(store, api_key)))
}

/// Serve until `cancel` fires, then drain in-flight requests and return.
pub async fn serve(config: &SupagentConfig, cancel: CancellationToken) -> Result<(), anyhow::Error> {
    let app = build_app(config)?;
    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    tracing::info!(addr = %listener.local_addr()?, "supagent listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .context("Server error")?;

    tracing::info!("supagent stopped");
    Ok(())
}
