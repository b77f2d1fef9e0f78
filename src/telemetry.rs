//! `tracing` subscriber setup.

use tracing_subscriber::EnvFilter;

/// Map a configured level to one `EnvFilter` accepts. Unknown levels become `info`.
pub fn normalize_level(level: &str) -> &'static str {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" | "critical" => "error",
        _ => "info",
    }
}

/// Install a fmt subscriber. `RUST_LOG` wins over `log_level`.
///
/// Returns false when a global subscriber was already set.
pub fn init_tracing(log_level: &str) -> bool {
    let fallback = normalize_level(log_level);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
