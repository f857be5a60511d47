//! Sets up logging for the binaries.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// The filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install a subscriber that writes to stderr.
///
/// The level is read from `RUST_LOG` and falls back to [DEFAULT_LOG_FILTER].
/// Calling this more than once is harmless, later calls are ignored.
pub fn setup_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    if let Err(error) = result {
        tracing::debug!("Logging was already set up: {error}");
    }
}
