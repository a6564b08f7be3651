//! Set up the global tracing subscriber for the command line interface.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// The log level used when `RUST_LOG` is not set and verbose output is off.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// The log level used when `RUST_LOG` is not set and verbose output is on.
pub const VERBOSE_LOG_LEVEL: &str = "debug";

/// Install a subscriber that writes to stderr.
///
/// `RUST_LOG` takes precedence over `verbose`. Logs go to stderr so that
/// table and JSON output on stdout stay machine readable.
pub fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_log)
        .init();
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_LOG_LEVEL
    } else {
        DEFAULT_LOG_LEVEL
    }
}
