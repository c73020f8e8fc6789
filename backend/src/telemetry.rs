//! Tracing subscriber initialisation for embedders and tests.

use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global JSON tracing subscriber, filtered by `RUST_LOG`.
///
/// Initialisation failures (usually a second call) are downgraded to a
/// warning so embedders and test harnesses can call this unconditionally.
pub fn init() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}
