//! steamdesk entry point.

mod app;
mod config;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Create desktop launcher entries for the games in a Steam library.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Steam library root (the directory containing `steamapps`).
    library: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize structured logging on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "starting steamdesk");

    let config = config::Config::load()?;

    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(app::run(&config, &cli.library))?;

    tracing::info!(
        scanned = report.scanned,
        skipped = report.skipped,
        written = report.written,
        failed = report.failed,
        icons = report.icons_installed,
        "done"
    );
    Ok(())
}
