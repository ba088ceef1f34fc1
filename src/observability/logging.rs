//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the process-wide subscriber once, at startup
//! - Select the output format (pretty or JSON)
//! - Honor `RUST_LOG`, falling back to the configured level
//!
//! # Design Decisions
//! - Components log through `tracing` macros and the request span they run in;
//!   nothing holds a logger object
//! - Buffered output is flushed by the subscriber when the process exits

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter directive derived from the configured level.
pub fn default_directive(config: &ObservabilityConfig) -> String {
    format!("mvc_dispatch={},tower_http={}", config.log_level, config.log_level)
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &ObservabilityConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    }
}
