/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Message rendering and delivery shared by webhooks and price alerts.
//!
//! Every call to [`deliver`] leaves exactly one notification log row,
//! whether Telegram accepted the message or not.

use crate::dal::DAL;
use crate::metrics;
use crate::utils::telegram::{TelegramClient, TelegramError};
use crate::utils::templating::render_template;
use serde_json::Value;
use tvrelay_models::models::notification_logs::{STATUS_FAILED, STATUS_SUCCESS};
use tvrelay_models::models::{AlertRef, NewNotificationLog, PriceAlert, TelegramConfig, TradingViewAlert};
use tvrelay_utils::logging::prelude::*;

fn source_label(source: AlertRef) -> &'static str {
    match source {
        AlertRef::Webhook(_) => "webhook",
        AlertRef::Price(_) => "price",
        AlertRef::Unknown => "other",
    }
}

/// Renders a webhook alert's message, falling back to the raw payload when
/// the template cannot be rendered against it.
pub fn webhook_message(alert: &TradingViewAlert, payload: &Value) -> String {
    match render_template(&alert.message_template, payload) {
        Ok(message) => message,
        Err(e) => {
            warn!(
                "Could not render template for alert '{}', sending raw payload: {}",
                alert.name, e
            );
            format!("TradingView Alert ({}): {}", alert.name, payload)
        }
    }
}

/// Renders a price alert's message for `current_price`.
pub fn price_message(alert: &PriceAlert, current_price: f64) -> String {
    match render_template(&alert.message_template, &alert.message_context(current_price)) {
        Ok(message) => message,
        Err(e) => {
            warn!(
                "Could not render template for price alert '{}': {}",
                alert.name, e
            );
            format!(
                "Price alert ({}): {} reached {}, target: {}",
                alert.name, alert.symbol, current_price, alert.target_price
            )
        }
    }
}

/// Sends `message` through `config` and records the attempt.
///
/// A failure to write the log row is logged but does not change the result,
/// which reflects the Telegram delivery alone.
pub async fn deliver(
    dal: &DAL,
    telegram: &TelegramClient,
    config: &TelegramConfig,
    source: AlertRef,
    payload: Option<String>,
    message: String,
) -> Result<(), TelegramError> {
    let result = telegram
        .send_message(&config.bot_token, &config.chat_id, &message)
        .await;

    let (log, status) = match &result {
        Ok(()) => (
            NewNotificationLog::delivered(source, payload, message),
            STATUS_SUCCESS,
        ),
        Err(e) => (
            NewNotificationLog::failed(source, payload, Some(message), e.to_string()),
            STATUS_FAILED,
        ),
    };
    metrics::record_notification(source_label(source), status);

    if let Err(e) = dal.notification_logs().create(&log) {
        error!("Failed to record notification log: {}", e);
    }

    result
}

/// Records a failure that happened before anything was sent.
pub fn record_failure(dal: &DAL, source: AlertRef, payload: Option<String>, error_message: String) {
    metrics::record_notification(source_label(source), STATUS_FAILED);
    let log = NewNotificationLog::failed(source, payload, None, error_message);
    if let Err(e) = dal.notification_logs().create(&log) {
        error!("Failed to record notification log: {}", e);
    }
}
