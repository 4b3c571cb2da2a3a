pub mod cli;
pub mod db;
pub mod import;
pub mod matching;
pub mod pricing;
pub mod settings;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;

pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    log::debug!("Using database {}", cli.db.display());

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(cli::execute(cli))
}
