/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # tvrelay Config Module
//! This module provides the configuration framework shared by the web service and the worker.
//!
//! # Variable Naming Convention
//!
//! - Struct fields use snake_case (e.g., `database`, `check_interval_seconds`)
//! - Environment variables use SCREAMING_SNAKE_CASE and are prefixed with "TVRELAY__"
//!   (e.g., `TVRELAY__DATABASE__URL`)
//! - Configuration file keys use snake_case (e.g., `database.url`, `log.level`)
//!
//! # Configuration Overriding
//!
//! Values are loaded in the following order (later sources take precedence):
//!
//! 1. Default values from the embedded `default.toml` file
//! 2. Values from an optional external configuration file (if provided)
//! 3. `TVRELAY__`-prefixed environment variables
//! 4. The variables injected by the hosting platform (see below)
//!
//! # Platform Variables
//!
//! The deployment descriptor wires these plain variables into both processes.
//! They win over everything else when set to a non-empty value:
//!
//! - `DATABASE_URL` -> `database.url`
//! - `ALPHA_VANTAGE_API_KEY` -> `prices.alpha_vantage_api_key`
//! - `SESSION_SECRET` -> `web.session_secret` (web process only)
//! - `PORT` -> `web.port`

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::env;

const DEFAULT_SETTINGS: &str = include_str!("../default.toml");

/// Connection string of the managed database.
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
/// Market data API key, synced manually on the platform.
pub const ENV_ALPHA_VANTAGE_API_KEY: &str = "ALPHA_VANTAGE_API_KEY";
/// Platform-generated secret guarding the configuration API.
pub const ENV_SESSION_SECRET: &str = "SESSION_SECRET";
/// Listening port assigned to the web process.
pub const ENV_PORT: &str = "PORT";

/// Top-level settings for both processes.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Database configuration
    pub database: Database,
    /// Logging configuration
    pub log: Log,
    /// Web service configuration
    pub web: Web,
    /// Background worker configuration
    pub worker: Worker,
    /// Telegram Bot API configuration
    pub telegram: Telegram,
    /// Market data configuration
    pub prices: Prices,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Database {
    /// Database connection URL
    pub url: String,
    /// Maximum pooled connections per process
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Log {
    /// Log level (e.g., "info", "debug", "warn", "error")
    pub level: String,
    /// Log format: "text" for human-readable, "json" for structured JSON
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_format() -> String {
    "text".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct Web {
    pub host: String,
    pub port: u16,
    /// Bearer secret for `/api/v1`
    pub session_secret: Option<String>,
    /// Externally visible base URL used when building webhook URLs.
    /// Falls back to the request `Host` header when unset.
    pub public_url: Option<String>,
    /// Notification log retention in days (0 keeps everything)
    pub log_retention_days: i64,
    pub log_cleanup_interval_seconds: u64,
}

impl Web {
    /// Address the HTTP listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The configured session secret, ignoring blank values.
    pub fn session_secret(&self) -> Option<&str> {
        non_blank(self.session_secret.as_deref())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Worker {
    /// Seconds between two price alert checks
    pub check_interval_seconds: u64,
    /// Health check HTTP server port
    pub health_port: u16,
    /// Attempts made to reach the database before giving up at startup
    pub startup_retries: u32,
    pub startup_retry_delay_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Telegram {
    /// Bot API base URL
    pub api_base: String,
    pub timeout_seconds: u64,
    /// Message sent when testing a chat configuration
    pub test_message: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Prices {
    /// Alpha Vantage API key; quotes come from Yahoo Finance without one
    pub alpha_vantage_api_key: Option<String>,
    pub alpha_vantage_url: String,
    pub yahoo_chart_url: String,
    pub timeout_seconds: u64,
    /// User agent sent to Yahoo Finance
    pub user_agent: String,
}

impl Prices {
    /// The configured Alpha Vantage key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        non_blank(self.alpha_vantage_api_key.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn platform_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Settings {
    /// Creates a new `Settings` instance
    ///
    /// # Arguments
    ///
    /// * `file` - An optional path to a configuration file
    ///
    /// # Returns
    ///
    /// Returns a `Result` containing the `Settings` instance or a `ConfigError`
    pub fn new(file: Option<String>) -> Result<Self, ConfigError> {
        let mut s = Config::builder().add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Toml));

        s = match file {
            Some(x) => s.add_source(File::with_name(x.as_str())),
            None => s,
        };

        s = s.add_source(Environment::with_prefix("TVRELAY").separator("__"));

        s = s
            .set_override_option("database.url", platform_var(ENV_DATABASE_URL))?
            .set_override_option(
                "prices.alpha_vantage_api_key",
                platform_var(ENV_ALPHA_VANTAGE_API_KEY),
            )?
            .set_override_option("web.session_secret", platform_var(ENV_SESSION_SECRET))?
            .set_override_option("web.port", platform_var(ENV_PORT))?;

        s.build()?.try_deserialize()
    }
}
