/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Price alert endpoints. The worker evaluates what is stored here.

use crate::api::v1::{
    api_error, check_telegram_config, check_template, dal_error, not_found, ApiError,
};
use crate::api::AppState;
use axum::http::StatusCode;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tvrelay_models::models::{AlertType, NewPriceAlert, PriceAlert, UpdatePriceAlert};
use tvrelay_utils::logging::prelude::*;
use utoipa::ToSchema;
use uuid::Uuid;

/// Request body for creating a price alert.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePriceAlertRequest {
    pub name: String,
    /// Trading symbol, e.g. "SPX" or "AAPL"
    pub symbol: String,
    /// "above" or "below"
    pub alert_type: String,
    pub target_price: f64,
    pub telegram_config_id: Uuid,
    #[serde(default)]
    pub message_template: Option<String>,
    /// Fire only once until reset
    #[serde(default)]
    pub is_one_time: bool,
}

/// Request body for updating a price alert.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdatePriceAlertRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub alert_type: Option<String>,
    #[serde(default)]
    pub target_price: Option<f64>,
    #[serde(default)]
    pub telegram_config_id: Option<Uuid>,
    #[serde(default)]
    pub message_template: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_one_time: Option<bool>,
    /// Re-arm a one-time alert that already fired
    #[serde(default)]
    pub reset_triggered: bool,
}

fn parse_alert_type(value: &str) -> Result<AlertType, ApiError> {
    value
        .parse()
        .map_err(|e: String| api_error(StatusCode::BAD_REQUEST, e))
}

/// Creates and returns the router for price alert endpoints.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/price-alerts",
            get(list_price_alerts).post(create_price_alert),
        )
        .route(
            "/price-alerts/:id",
            get(get_price_alert)
                .put(update_price_alert)
                .delete(delete_price_alert),
        )
}

#[utoipa::path(
    get,
    path = "/api/v1/price-alerts",
    responses(
        (status = 200, description = "List all price alerts", body = Vec<PriceAlert>),
        (status = 401, description = "Unauthorized")
    ),
    security(("admin_secret" = [])),
    tag = "price-alerts"
)]
pub async fn list_price_alerts(
    State(state): State<AppState>,
) -> Result<Json<Vec<PriceAlert>>, ApiError> {
    let alerts = state
        .dal
        .price_alerts()
        .list()
        .map_err(|e| dal_error("Failed to fetch price alerts", e))?;
    Ok(Json(alerts))
}

#[utoipa::path(
    post,
    path = "/api/v1/price-alerts",
    request_body = CreatePriceAlertRequest,
    responses(
        (status = 201, description = "Price alert created", body = PriceAlert),
        (status = 400, description = "Invalid request data"),
        (status = 401, description = "Unauthorized")
    ),
    security(("admin_secret" = [])),
    tag = "price-alerts"
)]
pub async fn create_price_alert(
    State(state): State<AppState>,
    Json(request): Json<CreatePriceAlertRequest>,
) -> Result<(StatusCode, Json<PriceAlert>), ApiError> {
    let alert_type = parse_alert_type(&request.alert_type)?;
    check_template(request.message_template.as_deref())?;

    let new_alert = NewPriceAlert::new(
        request.name,
        request.symbol,
        alert_type,
        request.target_price,
        request.telegram_config_id,
        request.message_template,
        request.is_one_time,
    )
    .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;
    check_telegram_config(&state.dal, new_alert.telegram_config_id)?;

    let alert = state
        .dal
        .price_alerts()
        .create(&new_alert)
        .map_err(|e| dal_error("Failed to create price alert", e))?;

    info!(
        "Created price alert '{}' ({} {} {})",
        alert.name, alert.symbol, alert.alert_type, alert.target_price
    );
    Ok((StatusCode::CREATED, Json(alert)))
}

#[utoipa::path(
    get,
    path = "/api/v1/price-alerts/{id}",
    params(("id" = Uuid, Path, description = "Price alert id")),
    responses(
        (status = 200, description = "Price alert found", body = PriceAlert),
        (status = 404, description = "Price alert not found")
    ),
    security(("admin_secret" = [])),
    tag = "price-alerts"
)]
pub async fn get_price_alert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PriceAlert>, ApiError> {
    state
        .dal
        .price_alerts()
        .get(id)
        .map_err(|e| dal_error("Failed to fetch price alert", e))?
        .map(Json)
        .ok_or_else(|| not_found("Price alert"))
}

#[utoipa::path(
    put,
    path = "/api/v1/price-alerts/{id}",
    params(("id" = Uuid, Path, description = "Price alert id")),
    request_body = UpdatePriceAlertRequest,
    responses(
        (status = 200, description = "Price alert updated", body = PriceAlert),
        (status = 400, description = "Invalid request data"),
        (status = 404, description = "Price alert not found")
    ),
    security(("admin_secret" = [])),
    tag = "price-alerts"
)]
pub async fn update_price_alert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePriceAlertRequest>,
) -> Result<Json<PriceAlert>, ApiError> {
    let alert_type = request
        .alert_type
        .as_deref()
        .map(parse_alert_type)
        .transpose()?;
    check_template(request.message_template.as_deref())?;

    let update = UpdatePriceAlert::new(
        request.name,
        request.symbol,
        alert_type,
        request.target_price,
        request.message_template,
        request.is_active,
        request.is_one_time,
        request.telegram_config_id,
        request.reset_triggered,
    )
    .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;
    if let Some(config_id) = update.telegram_config_id {
        check_telegram_config(&state.dal, config_id)?;
    }

    let alert = state
        .dal
        .price_alerts()
        .update(id, &update)
        .map_err(|e| dal_error("Failed to update price alert", e))?
        .ok_or_else(|| not_found("Price alert"))?;

    if request.reset_triggered {
        info!("Re-armed price alert {}", alert.id);
    }
    Ok(Json(alert))
}

#[utoipa::path(
    delete,
    path = "/api/v1/price-alerts/{id}",
    params(("id" = Uuid, Path, description = "Price alert id")),
    responses(
        (status = 204, description = "Price alert deleted"),
        (status = 404, description = "Price alert not found")
    ),
    security(("admin_secret" = [])),
    tag = "price-alerts"
)]
pub async fn delete_price_alert(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .dal
        .price_alerts()
        .delete(id)
        .map_err(|e| dal_error("Failed to delete price alert", e))?;
    if deleted == 0 {
        return Err(not_found("Price alert"));
    }
    info!("Deleted price alert {}", id);
    Ok(StatusCode::NO_CONTENT)
}
