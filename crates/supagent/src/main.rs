use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use supagent_models::SupagentConfig;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "supagent", about = "Record service for the trading agent platform")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/supagent.toml")]
    config: String,

    /// Override the listen address (e.g. 127.0.0.1:8000)
    #[arg(long)]
    bind: Option<String>,

    /// Override the SQLite database path
    #[arg(long)]
    db: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config: SupagentConfig = if Path::new(&cli.config).exists() {
        let config_str = std::fs::read_to_string(&cli.config)
            .with_context(|| format!("Failed to read config: {}", cli.config))?;
        toml::from_str(&config_str).with_context(|| "Failed to parse config")?
    } else {
        tracing::warn!(path = %cli.config, "Config file not found, using defaults");
        SupagentConfig::default()
    };
    if let Some(bind) = cli.bind {
        config.server.bind_addr = bind;
    }
    if let Some(db) = cli.db {
        config.database.sqlite_path = db;
    }

    let cancel = CancellationToken::new();

    // Handle shutdown signals
    let signal = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Received shutdown signal");
        signal.cancel();
    });

    supagent::serve(&config, cancel).await
}
