//! Logging setup.

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. Diagnostics go to stderr so stdout carries
/// only the operator status lines.
pub fn init_logging() {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(create_env_filter())
        .with(fmt_layer)
        .try_init()
        .ok();
}

/// `RUST_LOG` takes precedence over the default level.
fn create_env_filter() -> EnvFilter {
    let directive = std::env::var("RUST_LOG")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string());

    EnvFilter::try_new(&directive).unwrap_or_else(|_| {
        eprintln!(
            "Failed to parse filter directive: {}. Falling back to default: {}",
            directive, DEFAULT_FILTER
        );
        EnvFilter::new(DEFAULT_FILTER)
    })
}
