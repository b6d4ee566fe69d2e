//! Tracing setup for binaries embedding the client.

use tracing_subscriber::{fmt, EnvFilter};

/// Initializes a formatted tracing subscriber.
///
/// Filtering follows `RUST_LOG`, defaulting to `info` when unset. Safe to
/// call once per process; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}
