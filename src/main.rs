//! git-stamps - created/modified timestamps from git history
//!
//! Thin binary over the `git_stamps` library: parses flags, sets up logging
//! and prints or writes the timestamp cache.

mod cli;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Logs go to stderr so the printed mapping on stdout stays valid JSON.
    // RUST_LOG, when set, wins over --log-level.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    cli::run(cli)
}
