/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Price Alert Checker
//!
//! One cycle loads the due price alerts, fetches one quote per distinct
//! symbol and delivers a Telegram message for every alert whose condition
//! holds. One-time alerts are marked triggered once they fire, whether or not
//! Telegram accepted the message. A failure on one symbol or alert is logged
//! and the cycle moves on.

use crate::metrics;
use crate::prices::PriceClient;
use chrono::Utc;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;
use tvrelay_models::models::{AlertRef, PriceAlert, TelegramConfig};
use tvrelay_utils::logging::prelude::*;
use tvrelay_web::dal::{DalError, DAL};
use tvrelay_web::utils::notifications;
use tvrelay_web::utils::telegram::TelegramClient;
use uuid::Uuid;

/// Counts for one check cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    /// Alerts that were due for evaluation
    pub checked: usize,
    /// Distinct symbols quoted
    pub symbols: usize,
    /// Symbols whose quote failed
    pub quote_errors: usize,
    /// Alerts whose condition held
    pub triggered: usize,
    pub delivered: usize,
    pub failed: usize,
    /// Triggered alerts that could not be sent (inactive or missing target)
    pub skipped: usize,
}

/// Groups alerts by symbol so each symbol is quoted once per cycle.
pub fn group_by_symbol(alerts: Vec<PriceAlert>) -> BTreeMap<String, Vec<PriceAlert>> {
    let mut groups: BTreeMap<String, Vec<PriceAlert>> = BTreeMap::new();
    for alert in alerts {
        groups.entry(alert.symbol.clone()).or_default().push(alert);
    }
    groups
}

#[derive(Clone)]
pub struct PriceAlertChecker {
    dal: DAL,
    telegram: TelegramClient,
    prices: PriceClient,
}

impl PriceAlertChecker {
    pub fn new(dal: DAL, telegram: TelegramClient, prices: PriceClient) -> Self {
        PriceAlertChecker {
            dal,
            telegram,
            prices,
        }
    }

    /// Runs one check cycle.
    ///
    /// Only a failure to load the alerts fails the cycle.
    pub async fn run_once(&self) -> Result<CheckSummary, DalError> {
        let started = Instant::now();
        let result = self.check().await;
        metrics::record_check(result.is_ok(), started.elapsed().as_secs_f64());

        match &result {
            Ok(summary) if summary.checked > 0 => info!(
                "Price check finished: {} alerts, {} triggered, {} delivered, {} failed",
                summary.checked, summary.triggered, summary.delivered, summary.failed
            ),
            Ok(_) => debug!("No price alerts due"),
            Err(e) => error!("Price check failed: {}", e),
        }
        result
    }

    async fn check(&self) -> Result<CheckSummary, DalError> {
        let alerts = self.dal.price_alerts().list_due()?;
        let mut summary = CheckSummary {
            checked: alerts.len(),
            ..Default::default()
        };
        if alerts.is_empty() {
            return Ok(summary);
        }

        let groups = group_by_symbol(alerts);
        summary.symbols = groups.len();
        let mut configs: HashMap<Uuid, Option<TelegramConfig>> = HashMap::new();

        for (symbol, alerts) in groups {
            let quote = match self.prices.quote(&symbol).await {
                Ok(quote) => quote,
                Err(e) => {
                    warn!("Could not get price data for {}: {}", symbol, e);
                    summary.quote_errors += 1;
                    continue;
                }
            };
            let payload = serde_json::to_string(&quote).ok();

            for alert in alerts {
                if !alert.is_triggered_by(quote.price) {
                    continue;
                }
                info!(
                    "Alert triggered for {} (Current: {}, Target: {})",
                    alert.symbol, quote.price, alert.target_price
                );
                summary.triggered += 1;

                let config = match configs.get(&alert.telegram_config_id) {
                    Some(cached) => cached.clone(),
                    None => {
                        let loaded = match self.dal.telegram_configs().get(alert.telegram_config_id) {
                            Ok(config) => config,
                            Err(e) => {
                                error!(
                                    "Failed to load Telegram configuration for '{}': {}",
                                    alert.name, e
                                );
                                summary.skipped += 1;
                                metrics::record_triggered("skipped");
                                continue;
                            }
                        };
                        configs.insert(alert.telegram_config_id, loaded.clone());
                        loaded
                    }
                };

                let config = match config {
                    Some(config) if config.is_active => config,
                    _ => {
                        warn!(
                            "Telegram configuration for price alert '{}' is missing or inactive",
                            alert.name
                        );
                        summary.skipped += 1;
                        metrics::record_triggered("skipped");
                        continue;
                    }
                };

                let message = notifications::price_message(&alert, quote.price);
                match notifications::deliver(
                    &self.dal,
                    &self.telegram,
                    &config,
                    AlertRef::Price(alert.id),
                    payload.clone(),
                    message,
                )
                .await
                {
                    Ok(()) => {
                        summary.delivered += 1;
                        metrics::record_triggered("delivered");
                    }
                    Err(e) => {
                        warn!("Failed to deliver price alert '{}': {}", alert.name, e);
                        summary.failed += 1;
                        metrics::record_triggered("failed");
                    }
                }

                if alert.is_one_time {
                    if let Err(e) = self.dal.price_alerts().mark_triggered(alert.id, Utc::now()) {
                        error!("Failed to mark price alert '{}' triggered: {}", alert.name, e);
                    }
                }
            }
        }

        Ok(summary)
    }
}
