/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Dashboard overview: everything configured plus the latest deliveries.

use crate::api::v1::alerts::{webhook_base_url, AlertResponse};
use crate::api::v1::telegram_configs::TelegramConfigResponse;
use crate::api::v1::{dal_error, ApiError};
use crate::api::AppState;
use axum::http::HeaderMap;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tvrelay_models::models::{NotificationLog, PriceAlert};
use utoipa::ToSchema;

/// Number of log rows shown on the dashboard.
pub const RECENT_LOG_LIMIT: i64 = 10;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub telegram_configs: Vec<TelegramConfigResponse>,
    pub alerts: Vec<AlertResponse>,
    pub price_alerts: Vec<PriceAlert>,
    pub recent_logs: Vec<NotificationLog>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Dashboard overview", body = DashboardResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("admin_secret" = [])),
    tag = "dashboard"
)]
/// Returns every configuration and alert with the ten most recent log rows.
pub async fn get_dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardResponse>, ApiError> {
    let dal = &state.dal;
    let base_url = webhook_base_url(state.public_url.as_deref(), &headers);

    let telegram_configs = dal
        .telegram_configs()
        .list()
        .map_err(|e| dal_error("Failed to fetch Telegram configurations", e))?;
    let alerts = dal
        .tradingview_alerts()
        .list()
        .map_err(|e| dal_error("Failed to fetch alerts", e))?;
    let price_alerts = dal
        .price_alerts()
        .list()
        .map_err(|e| dal_error("Failed to fetch price alerts", e))?;
    let recent_logs = dal
        .notification_logs()
        .recent(RECENT_LOG_LIMIT)
        .map_err(|e| dal_error("Failed to fetch notification logs", e))?;

    Ok(Json(DashboardResponse {
        telegram_configs: telegram_configs.into_iter().map(Into::into).collect(),
        alerts: alerts
            .into_iter()
            .map(|a| AlertResponse::new(a, &base_url))
            .collect(),
        price_alerts,
        recent_logs,
    }))
}
