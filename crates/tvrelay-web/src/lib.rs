/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # tvrelay Web
//!
//! `tvrelay-web` receives TradingView webhooks, renders them into messages and
//! forwards them to Telegram. It also serves the JSON configuration API used to
//! manage Telegram targets, webhook alerts, price alerts and the notification log.
//!
//! The data access layer, the Telegram client and the delivery path are shared
//! with `tvrelay-worker`.

pub mod api;
pub mod cli;
pub mod dal;
pub mod db;
pub mod metrics;
pub mod utils;
