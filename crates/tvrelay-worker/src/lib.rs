/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # tvrelay Worker
//!
//! Background process that evaluates price alerts. Every
//! `worker.check_interval_seconds` it loads the due alerts, quotes each
//! symbol once and sends a Telegram message for every alert whose target was
//! crossed. It shares the database, the Telegram client and the delivery path
//! with `tvrelay-web`, and exposes health endpoints on `worker.health_port`.
//!
//! ```toml
//! [worker]
//! check_interval_seconds = 60
//! health_port = 8080
//!
//! [prices]
//! alpha_vantage_api_key = "..." # Yahoo Finance is used when unset
//! ```

pub mod checker;
pub mod cli;
pub mod health;
pub mod metrics;
pub mod prices;
