//! Structured logging.
//!
//! # Design Decisions
//! - Uses the `tracing` crate; the library only emits events, binaries install the subscriber
//! - `RUST_LOG` wins over the configured default directive

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber with `default_directive` (e.g. `"waypoint=debug"`)
/// as the fallback filter.
pub fn init_logging(default_directive: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
