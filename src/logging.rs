//! Logging Setup
//!
//! Library code only emits `tracing` events. The binary decides where they go.

use tracing_subscriber::EnvFilter;

/// Map `-v` occurrences to a default filter directive
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Install a stderr subscriber.
///
/// `RUST_LOG` takes precedence when set; otherwise the level comes from the
/// number of `-v` flags. Calling this twice is harmless, the second call is
/// ignored.
pub fn setup_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
