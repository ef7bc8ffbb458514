//! Binary crate for the `weather` command.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Starting the HTTP server
//! - Interactive configuration and human-friendly output

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
