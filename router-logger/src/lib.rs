//! Logger configuration for the routing engine's binaries and tests.
//!
//! A single global `tracing` subscriber, filtered by `RUST_LOG`, printing
//! to stdout.

use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::{
    filter::Targets,
    layer::{Layer, SubscriberExt},
    util::{SubscriberInitExt, TryInitError},
};

/// Initialize the global `tracing` logger. Panics if one is already set.
pub fn init() {
    try_init().expect("Failed to setup logger");
}

/// Initialize the global logger for tests. Skips setup if `RUST_LOG` isn't
/// set, and tolerates a logger already having been installed by another
/// test thread.
pub fn init_for_testing() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    let _ = try_init();
}

/// Try to initialize the global logger, returning an error if one is
/// already installed.
pub fn try_init() -> Result<(), TryInitError> {
    let rust_log_filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|rust_log| Targets::from_str(&rust_log).ok())
        .unwrap_or_else(|| Targets::new().with_default(Level::INFO));

    let stdout_log = tracing_subscriber::fmt::layer()
        .compact()
        .with_level(true)
        .with_target(true)
        .with_ansi(true)
        .with_filter(rust_log_filter);

    tracing_subscriber::registry().with(stdout_log).try_init()
}
