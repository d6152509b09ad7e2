//! limebar: reads markup lines on stdin and shows them in a layer-shell bar.
//!
//! Run with:  `status-script | RUST_LOG=info limebar -g x24 -a center`

use anyhow::Result;
use clap::Parser;
use limebar_config::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Logs go to stderr; stdin belongs to the status feed.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!("limebar v{} starting", env!("CARGO_PKG_VERSION"));

    let config = limebar_config::resolve(cli)?;
    limebar_wayland::run(config)?;
    Ok(())
}
