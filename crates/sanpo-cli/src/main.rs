//! Command-line front end for Sanpo.
//!
//! Draws walk suggestions, shows history and manages shareable task groups
//! for the device identified by the local state file.

mod cli;
mod commands;

use clap::Parser;
use sanpo::{Config, LocalState, Sanpo};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::Args;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(url) = args.database_url.clone() {
        config.database_url = url;
    }
    if let Some(path) = args.state.clone() {
        config.state_path = path;
    }
    debug!(?config, "Loaded configuration");

    let mut state = LocalState::load(&config.state_path)?;
    let client = Sanpo::connect(&config, state.device_id.clone()).await?;

    commands::run(&client, &mut state, args.command).await?;

    state.save(&config.state_path)?;
    client.database().close().await;

    Ok(())
}
