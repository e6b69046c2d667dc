//! searu-dash - terminal front end for the searu dashboard.
//!
//! Logs in against the searu API, keeps the session cookie in an on-disk
//! jar, and issues requests with the token recovered from that cookie.

mod commands;
mod jar;

use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "searu-dash", version, about = "Session and request client for the searu API")]
pub struct Cli {
    /// API base address, e.g. http://localhost:8000/api. Overrides SEARU_API_BASE
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the session cookie
    Login {
        #[arg(short, long)]
        username: Option<String>,
    },
    /// Log out and expire the session cookie
    Logout,
    /// Show the session derived from the stored cookie
    Session,
    /// Print the API server version
    Version,
    /// Projects, nodes, VMs and VPCs at a glance
    Overview,
    /// GET an API path
    Get { path: String },
    /// DELETE an API path
    Delete { path: String },
    /// POST a JSON body to an API path
    Post {
        path: String,
        #[arg(default_value = "{}")]
        body: String,
    },
    /// PUT a JSON body to an API path
    Put { path: String, body: String },
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();
    info!(command = ?cli.command, "searu-dash starting");

    commands::run(cli).await
}
