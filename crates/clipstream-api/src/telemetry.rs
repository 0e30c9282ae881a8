//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins when set; otherwise `info`.
/// Production gets JSON lines, development human-readable output. Safe to
/// call more than once (later calls are no-ops), which keeps test setups
/// simple.
pub fn init_telemetry(json_output: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = if json_output {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };

    if result.is_err() {
        tracing::debug!("Global tracing subscriber already installed");
    }
}
