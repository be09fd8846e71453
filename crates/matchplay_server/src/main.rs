//! Matchplay server binary.

use anyhow::Result;
use clap::Parser;
use matchplay_server::cli::{Cli, Command};
use matchplay_server::{ServerConfig, build_state, router};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new("info,matchplay=debug,matchplay_server=debug")
            }),
        )
        .init();

    match cli.command {
        Command::Serve { config, host, port } => {
            let config = ServerConfig::load_or_default(&config)?.with_overrides(host, port);
            serve(config).await
        }
    }
}

/// Runs the HTTP server until ctrl-c.
#[instrument(skip(config), fields(addr = %config.bind_addr()))]
async fn serve(config: ServerConfig) -> Result<()> {
    if config.auth().tokens().is_empty() {
        warn!("No bearer tokens configured; every request needing identity will be rejected");
    }

    let state = build_state(&config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %config.bind_addr(), "Matchplay server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for ctrl-c");
    }
    info!("Shutdown signal received");
}
