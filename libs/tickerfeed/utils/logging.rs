//! Logging initialization

use tracing_subscriber::EnvFilter;

/// Initialize tracing with standard configuration (info level)
pub fn init_tracing() {
    init_tracing_with_level("info");
}

/// Initialize tracing with a specific default level
///
/// `RUST_LOG` still wins when set, so operators can raise verbosity per
/// module without touching the config file.
pub fn init_tracing_with_level(level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .init();
}
