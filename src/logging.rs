// src/logging.rs

use std::env;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global fmt subscriber. `RUST_LOG` wins; otherwise
/// `LOG_LEVEL` (default `info`) applies to everything.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        EnvFilter::default().add_directive(level.parse().unwrap_or(Level::INFO.into()))
    });
    fmt().with_env_filter(filter).init();
}
