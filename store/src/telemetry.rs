//! Process-level tracing setup.
//!
//! Library code only emits `tracing` events. The binary embedding this crate
//! calls [`init_tracing`] once at start-up; nothing is installed implicitly.

use tracing_subscriber::{EnvFilter, fmt};

/// Failure to install the global subscriber.
#[derive(Debug, thiserror::Error)]
#[error("tracing init failed: {message}")]
pub struct TelemetryError {
    message: String,
}

/// Install a JSON formatter filtered by `RUST_LOG`.
///
/// # Errors
///
/// Returns [`TelemetryError`] when a global subscriber is already set.
pub fn init_tracing() -> Result<(), TelemetryError> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
        .map_err(|err| TelemetryError {
            message: err.to_string(),
        })
}
