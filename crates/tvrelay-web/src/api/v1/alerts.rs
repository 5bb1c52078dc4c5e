/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Webhook alert endpoints.

use crate::api::v1::{
    api_error, check_telegram_config, check_template, dal_error, not_found, ApiError,
};
use crate::api::AppState;
use crate::dal::DAL;
use crate::utils::generate_webhook_key;
use axum::http::{HeaderMap, StatusCode};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tvrelay_models::models::{NewTradingViewAlert, TradingViewAlert, UpdateTradingViewAlert};
use tvrelay_utils::logging::prelude::*;
use utoipa::ToSchema;
use uuid::Uuid;

/// Attempts made to find an unused webhook key.
const KEY_ATTEMPTS: usize = 5;

/// Request body for creating a webhook alert.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateAlertRequest {
    pub name: String,
    pub telegram_config_id: Uuid,
    /// Defaults to `TradingView Alert: {{strategy}} - {{ticker}} - {{close}}`
    #[serde(default)]
    pub message_template: Option<String>,
}

/// Request body for updating a webhook alert.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateAlertRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub telegram_config_id: Option<Uuid>,
    #[serde(default)]
    pub message_template: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// A webhook alert with the URL TradingView should post to.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AlertResponse {
    pub id: Uuid,
    pub name: String,
    pub webhook_key: String,
    pub webhook_url: String,
    pub message_template: String,
    pub is_active: bool,
    pub telegram_config_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AlertResponse {
    pub fn new(alert: TradingViewAlert, base_url: &str) -> Self {
        Self {
            webhook_url: format!("{}/webhook/{}", base_url, alert.webhook_key),
            id: alert.id,
            name: alert.name,
            webhook_key: alert.webhook_key,
            message_template: alert.message_template,
            is_active: alert.is_active,
            telegram_config_id: alert.telegram_config_id,
            created_at: alert.created_at,
            updated_at: alert.updated_at,
        }
    }
}

/// Base URL used in webhook links: the configured public URL, else the
/// request's `Host` (and `X-Forwarded-Proto` when a proxy terminates TLS).
pub fn webhook_base_url(public_url: Option<&str>, headers: &HeaderMap) -> String {
    if let Some(url) = public_url.filter(|u| !u.trim().is_empty()) {
        return url.trim().trim_end_matches('/').to_string();
    }

    let host = headers
        .get("x-forwarded-host")
        .or_else(|| headers.get(axum::http::header::HOST))
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("http");
    format!("{}://{}", scheme, host)
}

/// Generates a key no other alert uses.
pub fn unique_webhook_key(dal: &DAL) -> Result<String, ApiError> {
    for _ in 0..KEY_ATTEMPTS {
        let key = generate_webhook_key();
        match dal.tradingview_alerts().key_exists(&key) {
            Ok(false) => return Ok(key),
            Ok(true) => debug!("Generated webhook key collided, retrying"),
            Err(e) => return Err(dal_error("Failed to check webhook key", e)),
        }
    }
    Err(api_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Could not generate a unique webhook key",
    ))
}

/// Creates and returns the router for webhook alert endpoints.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/alerts", get(list_alerts).post(create_alert))
        .route(
            "/alerts/:id",
            get(get_alert).put(update_alert).delete(delete_alert),
        )
        .route("/alerts/:id/regenerate-key", post(regenerate_key))
}

#[utoipa::path(
    get,
    path = "/api/v1/alerts",
    responses(
        (status = 200, description = "List all webhook alerts", body = Vec<AlertResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(("admin_secret" = [])),
    tag = "alerts"
)]
/// Lists all webhook alerts.
pub async fn list_alerts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<AlertResponse>>, ApiError> {
    let base_url = webhook_base_url(state.public_url.as_deref(), &headers);
    let alerts = state
        .dal
        .tradingview_alerts()
        .list()
        .map_err(|e| dal_error("Failed to fetch alerts", e))?;
    Ok(Json(
        alerts
            .into_iter()
            .map(|a| AlertResponse::new(a, &base_url))
            .collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/alerts",
    request_body = CreateAlertRequest,
    responses(
        (status = 201, description = "Alert created", body = AlertResponse),
        (status = 400, description = "Invalid request data"),
        (status = 401, description = "Unauthorized")
    ),
    security(("admin_secret" = [])),
    tag = "alerts"
)]
/// Creates a webhook alert with a freshly generated key.
pub async fn create_alert(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateAlertRequest>,
) -> Result<(StatusCode, Json<AlertResponse>), ApiError> {
    check_template(request.message_template.as_deref())?;
    let mut new_alert = NewTradingViewAlert::new(
        request.name,
        generate_webhook_key(),
        request.telegram_config_id,
        request.message_template,
    )
    .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;

    check_telegram_config(&state.dal, new_alert.telegram_config_id)?;
    new_alert.webhook_key = unique_webhook_key(&state.dal)?;

    let alert = state
        .dal
        .tradingview_alerts()
        .create(&new_alert)
        .map_err(|e| dal_error("Failed to create alert", e))?;

    info!("Created webhook alert '{}' ({})", alert.name, alert.id);
    let base_url = webhook_base_url(state.public_url.as_deref(), &headers);
    Ok((StatusCode::CREATED, Json(AlertResponse::new(alert, &base_url))))
}

#[utoipa::path(
    get,
    path = "/api/v1/alerts/{id}",
    params(("id" = Uuid, Path, description = "Alert id")),
    responses(
        (status = 200, description = "Alert found", body = AlertResponse),
        (status = 404, description = "Alert not found")
    ),
    security(("admin_secret" = [])),
    tag = "alerts"
)]
pub async fn get_alert(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<AlertResponse>, ApiError> {
    let alert = state
        .dal
        .tradingview_alerts()
        .get(id)
        .map_err(|e| dal_error("Failed to fetch alert", e))?
        .ok_or_else(|| not_found("Alert"))?;
    let base_url = webhook_base_url(state.public_url.as_deref(), &headers);
    Ok(Json(AlertResponse::new(alert, &base_url)))
}

#[utoipa::path(
    put,
    path = "/api/v1/alerts/{id}",
    params(("id" = Uuid, Path, description = "Alert id")),
    request_body = UpdateAlertRequest,
    responses(
        (status = 200, description = "Alert updated", body = AlertResponse),
        (status = 400, description = "Invalid request data"),
        (status = 404, description = "Alert not found")
    ),
    security(("admin_secret" = [])),
    tag = "alerts"
)]
pub async fn update_alert(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAlertRequest>,
) -> Result<Json<AlertResponse>, ApiError> {
    let update = UpdateTradingViewAlert::new(
        request.name,
        request.message_template,
        request.is_active,
        request.telegram_config_id,
    )
    .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;
    check_template(update.message_template.as_deref())?;
    if let Some(config_id) = update.telegram_config_id {
        check_telegram_config(&state.dal, config_id)?;
    }

    let alert = state
        .dal
        .tradingview_alerts()
        .update(id, &update)
        .map_err(|e| dal_error("Failed to update alert", e))?
        .ok_or_else(|| not_found("Alert"))?;

    info!("Updated webhook alert {}", alert.id);
    let base_url = webhook_base_url(state.public_url.as_deref(), &headers);
    Ok(Json(AlertResponse::new(alert, &base_url)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/alerts/{id}",
    params(("id" = Uuid, Path, description = "Alert id")),
    responses(
        (status = 204, description = "Alert deleted"),
        (status = 404, description = "Alert not found")
    ),
    security(("admin_secret" = [])),
    tag = "alerts"
)]
pub async fn delete_alert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .dal
        .tradingview_alerts()
        .delete(id)
        .map_err(|e| dal_error("Failed to delete alert", e))?;
    if deleted == 0 {
        return Err(not_found("Alert"));
    }
    info!("Deleted webhook alert {}", id);
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/alerts/{id}/regenerate-key",
    params(("id" = Uuid, Path, description = "Alert id")),
    responses(
        (status = 200, description = "Webhook key replaced", body = AlertResponse),
        (status = 404, description = "Alert not found")
    ),
    security(("admin_secret" = [])),
    tag = "alerts"
)]
/// Replaces an alert's webhook key. The old URL stops working immediately.
pub async fn regenerate_key(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<AlertResponse>, ApiError> {
    let webhook_key = unique_webhook_key(&state.dal)?;
    let alert = state
        .dal
        .tradingview_alerts()
        .rotate_key(id, webhook_key)
        .map_err(|e| dal_error("Failed to regenerate webhook key", e))?
        .ok_or_else(|| not_found("Alert"))?;

    info!("Regenerated webhook key for alert {}", alert.id);
    let base_url = webhook_base_url(state.public_url.as_deref(), &headers);
    Ok(Json(AlertResponse::new(alert, &base_url)))
}
