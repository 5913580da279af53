//! Tracing setup for karmactl.
//!
//! `RUST_LOG` wins over the configured level. Logs go to stderr so stdout
//! stays clean for JSON output.

use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, else `level` (falling back to `warn` if invalid).
pub fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
