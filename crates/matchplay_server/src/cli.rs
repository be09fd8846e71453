//! Command-line interface for matchplay.

use clap::{Parser, Subcommand};

/// Matchplay - turn-based tic-tac-toe match server
#[derive(Parser, Debug)]
#[command(name = "matchplay")]
#[command(about = "Tic-tac-toe match server with live updates", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP match server
    Serve {
        /// Path to the TOML config file (defaults used if missing)
        #[arg(short, long, default_value = "matchplay.toml")]
        config: std::path::PathBuf,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
}
