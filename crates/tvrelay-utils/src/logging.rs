/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # tvrelay Logging Module
//!
//! Structured logging for both processes, built on `tracing`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tvrelay_utils::logging;
//! use tvrelay_utils::logging::prelude::*;
//!
//! logging::init("info", "text")?;
//! info!("Application started");
//! ```
//!
//! ## Log Levels
//!
//! - "off", "error", "warn", "info" (default), "debug", "trace"
//!
//! Unknown levels fall back to "info". When `RUST_LOG` is set it takes
//! precedence over the configured level.
//!
//! ## Formats
//!
//! - "text": human-readable lines
//! - "json": one JSON object per event, suited to the platform log drain

use std::sync::OnceLock;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static INIT: OnceLock<()> = OnceLock::new();

/// Error type for logging initialization
#[derive(Debug)]
pub enum LoggingError {
    /// Failed to set the global subscriber
    SubscriberError(String),
}

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggingError::SubscriberError(e) => write!(f, "Subscriber error: {}", e),
        }
    }
}

impl std::error::Error for LoggingError {}

/// Initializes logging with the given level and format.
///
/// Calling this more than once is a no-op; the first configuration wins.
///
/// # Arguments
/// * `level` - Log level filter string (e.g., "info", "debug")
/// * `format` - Log format ("text" or "json")
pub fn init(level: &str, format: &str) -> Result<(), LoggingError> {
    if INIT.get().is_some() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(level)));
    let subscriber = tracing_subscriber::registry().with(env_filter);

    let result = if format.eq_ignore_ascii_case("json") {
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer())
            .try_init()
    };
    result.map_err(|e| LoggingError::SubscriberError(e.to_string()))?;

    let _ = INIT.set(());
    Ok(())
}

/// Normalizes a configured level into a filter directive.
pub fn level_directive(level: &str) -> &'static str {
    match level.trim().to_lowercase().as_str() {
        "off" => "off",
        "error" => "error",
        "warn" | "warning" => "warn",
        "info" => "info",
        "debug" => "debug",
        "trace" => "trace",
        _ => "info",
    }
}

/// Re-export tracing macros for convenience
pub mod prelude {
    pub use tracing::{debug, error, info, trace, warn};
    pub use tracing::{instrument, Instrument};
}
