//! RELGRID Server
//!
//! Serves one editing session over HTTP.

#![warn(missing_docs)]
#![warn(clippy::all)]

use anyhow::{Context, Result};
use clap::Parser;
use relgrid_server::{AppState, ServerConfig, router};
use relgrid_view::ActionEngine;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "relgrid-server")]
#[command(about = "RELGRID relational grid editor server", long_about = None)]
struct Args {
    /// Editor input file (tables or nested records)
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Interface to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    /// Port to bind
    #[arg(short, long, default_value_t = 8050)]
    port: u16,
    /// Verbose logging
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        let config = ServerConfig::default()
            .with_host(self.host)
            .with_port(self.port)
            .with_debug(self.debug);
        match self.input {
            Some(input) => config.with_input(input),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Args::parse().into_config();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let registry = config
        .load_registry()
        .context("failed to load editor input")?;
    tracing::info!(tables = registry.len(), "session loaded");

    let app = router(AppState::new(ActionEngine::new(registry)));
    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
    tracing::info!("listening on {}", config.bind_addr());
    axum::serve(listener, app).await?;

    Ok(())
}
