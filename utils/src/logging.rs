//! Structured logging initialization via `tracing`.

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber from the `RUST_LOG` environment
/// variable. Safe to call more than once (later calls are no-ops), so tests
/// can invoke it freely.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// Initialize the tracing subscriber with an explicit level filter and
/// output format, as configured in `StakingConfig` (`log_level` /
/// `log_format`). `json = true` emits one JSON object per event for log
/// shippers; otherwise output is human-readable.
pub fn init_tracing_with(level: &str, json: bool) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }
}
