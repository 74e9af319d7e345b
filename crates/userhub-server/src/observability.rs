//! Tracing initialization.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing with the default level.
pub fn init_tracing() {
    init_tracing_with_level("info");
}

/// Initialize tracing, preferring `RUST_LOG` from the environment over the
/// provided level string.
pub fn init_tracing_with_level(level: &str) {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|_| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init();
}
