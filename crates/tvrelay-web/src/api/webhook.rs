/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! TradingView webhook entry point.
//!
//! TradingView posts either a JSON document or plain text. JSON bodies are
//! used as the template context as-is; anything else is wrapped as
//! `{"raw_data": "<body>"}`.

use crate::api::AppState;
use crate::metrics;
use crate::utils::notifications;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tvrelay_models::models::AlertRef;
use tvrelay_utils::logging::prelude::*;

/// Turns a request body into the template context.
pub fn parse_payload(body: &[u8]) -> Value {
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => value,
        Err(_) => json!({ "raw_data": String::from_utf8_lossy(body) }),
    }
}

fn reply(status: StatusCode, outcome: &str, body: Value) -> (StatusCode, Json<Value>) {
    metrics::record_webhook(outcome);
    (status, Json(body))
}

#[utoipa::path(
    post,
    path = "/webhook/{webhook_key}",
    params(("webhook_key" = String, Path, description = "Secret key of the alert")),
    request_body(content = String, description = "JSON document or plain text sent by TradingView"),
    responses(
        (status = 200, description = "Alert sent to Telegram"),
        (status = 400, description = "Telegram configuration is inactive"),
        (status = 404, description = "Alert not found or inactive"),
        (status = 500, description = "Delivery or internal failure")
    ),
    tag = "webhook"
)]
/// Receives a TradingView alert and forwards it to the alert's Telegram chat.
pub async fn receive_webhook(
    State(state): State<AppState>,
    Path(webhook_key): Path<String>,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let alert = match state.dal.tradingview_alerts().get_active_by_key(&webhook_key) {
        Ok(Some(alert)) => alert,
        Ok(None) => {
            warn!("Webhook received for unknown or inactive key");
            return reply(
                StatusCode::NOT_FOUND,
                "not_found",
                json!({"status": "error", "message": "Alert not found or inactive"}),
            );
        }
        Err(e) => {
            error!("Failed to look up webhook alert: {}", e);
            return reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                "error",
                json!({"status": "error", "message": format!("Internal error: {}", e)}),
            );
        }
    };

    info!("Webhook received for alert '{}' ({})", alert.name, alert.id);
    let payload = parse_payload(&body);
    let payload_text = payload.to_string();

    let config = match state.dal.telegram_configs().get(alert.telegram_config_id) {
        Ok(Some(config)) if config.is_active => config,
        Ok(_) => {
            warn!("Telegram configuration for alert '{}' is inactive", alert.name);
            return reply(
                StatusCode::BAD_REQUEST,
                "inactive_config",
                json!({"status": "error", "message": "Telegram configuration is inactive"}),
            );
        }
        Err(e) => {
            error!("Failed to load Telegram configuration: {}", e);
            notifications::record_failure(
                &state.dal,
                AlertRef::Webhook(alert.id),
                Some(payload_text),
                e.to_string(),
            );
            return reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                "error",
                json!({"status": "error", "message": format!("Internal error: {}", e)}),
            );
        }
    };

    let message = notifications::webhook_message(&alert, &payload);

    match notifications::deliver(
        &state.dal,
        &state.telegram,
        &config,
        AlertRef::Webhook(alert.id),
        Some(payload_text),
        message,
    )
    .await
    {
        Ok(()) => reply(
            StatusCode::OK,
            "delivered",
            json!({"status": "success", "message": "Alert sent to Telegram"}),
        ),
        Err(e) => reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            "failed",
            json!({"status": "error", "message": format!("Failed to send to Telegram: {}", e)}),
        ),
    }
}
