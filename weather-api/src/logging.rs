use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `debug` mode logs at debug level and
/// everything else at info.
pub fn init(debug: bool) -> Result<()> {
    let fallback = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}
