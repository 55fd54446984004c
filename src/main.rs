//! quickspace: a clock/weather strip with prioritised quick events.
//!
//! Run with:  `RUST_LOG=info quickspace`

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the rendered strip.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("quickspace v{} starting", env!("CARGO_PKG_VERSION"));

    quickspace_daemon::run().map_err(Into::into)
}
