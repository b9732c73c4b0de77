//! Binary crate for the `weather-push` job.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Initializing logging
//! - Loading configuration from the environment and running the pipeline

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
