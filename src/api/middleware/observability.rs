//! Observability setup.
//!
//! Installs the global tracing subscriber. RUST_LOG controls the filter
//! (default: info); LOG_FORMAT=json switches to JSON lines.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber. Safe to call more than once;
/// later calls are ignored.
pub fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.with_ansi(false).try_init()
    };

    if result.is_ok() {
        tracing::info!(json, "Tracing initialized");
    }
}
