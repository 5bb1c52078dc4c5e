/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Telegram configuration endpoints.
//!
//! A configuration is only saved after a test message reaches the chat.
//! Bot tokens are never returned in full.

use crate::api::v1::{api_error, dal_error, not_found, ApiError};
use crate::api::AppState;
use axum::http::StatusCode;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tvrelay_models::models::{NewTelegramConfig, TelegramConfig, UpdateTelegramConfig};
use tvrelay_utils::logging::prelude::*;
use utoipa::ToSchema;
use uuid::Uuid;

/// Request body for creating a Telegram configuration.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTelegramConfigRequest {
    pub bot_token: String,
    pub chat_id: String,
}

/// Request body for updating a Telegram configuration.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateTelegramConfigRequest {
    #[serde(default)]
    pub bot_token: Option<String>,
    #[serde(default)]
    pub chat_id: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// A Telegram configuration with its token masked.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TelegramConfigResponse {
    pub id: Uuid,
    /// Last four characters of the bot token
    pub bot_token: String,
    pub chat_id: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TelegramConfig> for TelegramConfigResponse {
    fn from(config: TelegramConfig) -> Self {
        Self {
            id: config.id,
            bot_token: config.masked_token(),
            chat_id: config.chat_id,
            is_active: config.is_active,
            created_at: config.created_at,
            updated_at: config.updated_at,
        }
    }
}

/// A configuration plus the number of alerts using it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TelegramConfigDetailResponse {
    #[serde(flatten)]
    pub config: TelegramConfigResponse,
    pub webhook_alerts: i64,
    pub price_alerts: i64,
}

/// Result of a connection test.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConnectionTestResponse {
    pub success: bool,
    pub message: String,
}

/// Creates and returns the router for Telegram configuration endpoints.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/telegram-configs",
            get(list_telegram_configs).post(create_telegram_config),
        )
        .route(
            "/telegram-configs/:id",
            get(get_telegram_config)
                .put(update_telegram_config)
                .delete(delete_telegram_config),
        )
        .route("/telegram-configs/:id/test", post(test_telegram_config))
}

#[utoipa::path(
    get,
    path = "/api/v1/telegram-configs",
    responses(
        (status = 200, description = "List all Telegram configurations", body = Vec<TelegramConfigResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(("admin_secret" = [])),
    tag = "telegram-configs"
)]
/// Lists all Telegram configurations.
pub async fn list_telegram_configs(
    State(state): State<AppState>,
) -> Result<Json<Vec<TelegramConfigResponse>>, ApiError> {
    let configs = state
        .dal
        .telegram_configs()
        .list()
        .map_err(|e| dal_error("Failed to fetch Telegram configurations", e))?;
    Ok(Json(configs.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/telegram-configs",
    request_body = CreateTelegramConfigRequest,
    responses(
        (status = 201, description = "Configuration created", body = TelegramConfigResponse),
        (status = 400, description = "Missing fields or connection test failed"),
        (status = 401, description = "Unauthorized")
    ),
    security(("admin_secret" = [])),
    tag = "telegram-configs"
)]
/// Creates a Telegram configuration after a successful test message.
pub async fn create_telegram_config(
    State(state): State<AppState>,
    Json(request): Json<CreateTelegramConfigRequest>,
) -> Result<(StatusCode, Json<TelegramConfigResponse>), ApiError> {
    let new_config = NewTelegramConfig::new(request.bot_token, request.chat_id)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;

    if let Err(e) = state
        .telegram
        .test_connection(&new_config.bot_token, &new_config.chat_id)
        .await
    {
        warn!("Refusing to save Telegram configuration: {}", e);
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("Connection test failed: {}", e),
        ));
    }

    let config = state
        .dal
        .telegram_configs()
        .create(&new_config)
        .map_err(|e| dal_error("Failed to create Telegram configuration", e))?;

    info!("Created Telegram configuration {}", config.id);
    Ok((StatusCode::CREATED, Json(config.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/telegram-configs/{id}",
    params(("id" = Uuid, Path, description = "Configuration id")),
    responses(
        (status = 200, description = "Configuration found", body = TelegramConfigDetailResponse),
        (status = 404, description = "Configuration not found")
    ),
    security(("admin_secret" = [])),
    tag = "telegram-configs"
)]
/// Gets one Telegram configuration with its usage counts.
pub async fn get_telegram_config(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TelegramConfigDetailResponse>, ApiError> {
    let configs = state.dal.telegram_configs();
    let config = configs
        .get(id)
        .map_err(|e| dal_error("Failed to fetch Telegram configuration", e))?
        .ok_or_else(|| not_found("Configuration"))?;
    let (webhook_alerts, price_alerts) = configs
        .count_dependents(id)
        .map_err(|e| dal_error("Failed to count alerts", e))?;

    Ok(Json(TelegramConfigDetailResponse {
        config: config.into(),
        webhook_alerts,
        price_alerts,
    }))
}

#[utoipa::path(
    put,
    path = "/api/v1/telegram-configs/{id}",
    params(("id" = Uuid, Path, description = "Configuration id")),
    request_body = UpdateTelegramConfigRequest,
    responses(
        (status = 200, description = "Configuration updated", body = TelegramConfigResponse),
        (status = 400, description = "Invalid request data"),
        (status = 404, description = "Configuration not found")
    ),
    security(("admin_secret" = [])),
    tag = "telegram-configs"
)]
/// Updates a Telegram configuration.
pub async fn update_telegram_config(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTelegramConfigRequest>,
) -> Result<Json<TelegramConfigResponse>, ApiError> {
    let update = UpdateTelegramConfig::new(request.bot_token, request.chat_id, request.is_active)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;

    let config = state
        .dal
        .telegram_configs()
        .update(id, &update)
        .map_err(|e| dal_error("Failed to update Telegram configuration", e))?
        .ok_or_else(|| not_found("Configuration"))?;

    info!("Updated Telegram configuration {}", config.id);
    Ok(Json(config.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/telegram-configs/{id}",
    params(("id" = Uuid, Path, description = "Configuration id")),
    responses(
        (status = 204, description = "Configuration deleted"),
        (status = 404, description = "Configuration not found"),
        (status = 409, description = "Configuration still used by alerts")
    ),
    security(("admin_secret" = [])),
    tag = "telegram-configs"
)]
/// Deletes a Telegram configuration that no alert uses.
pub async fn delete_telegram_config(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .dal
        .telegram_configs()
        .delete(id)
        .map_err(|e| dal_error("Failed to delete Telegram configuration", e))?;

    if deleted == 0 {
        return Err(not_found("Configuration"));
    }
    info!("Deleted Telegram configuration {}", id);
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/telegram-configs/{id}/test",
    params(("id" = Uuid, Path, description = "Configuration id")),
    responses(
        (status = 200, description = "Test message delivered", body = ConnectionTestResponse),
        (status = 404, description = "Configuration not found"),
        (status = 502, description = "Telegram rejected the test message", body = ConnectionTestResponse)
    ),
    security(("admin_secret" = [])),
    tag = "telegram-configs"
)]
/// Sends the test message through a saved configuration.
pub async fn test_telegram_config(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<ConnectionTestResponse>), ApiError> {
    let config = state
        .dal
        .telegram_configs()
        .get(id)
        .map_err(|e| dal_error("Failed to fetch Telegram configuration", e))?
        .ok_or_else(|| not_found("Configuration"))?;

    match state
        .telegram
        .test_connection(&config.bot_token, &config.chat_id)
        .await
    {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(ConnectionTestResponse {
                success: true,
                message: "Connection test successful".to_string(),
            }),
        )),
        Err(e) => Ok((
            StatusCode::BAD_GATEWAY,
            Json(ConnectionTestResponse {
                success: false,
                message: format!("Connection test failed: {}", e),
            }),
        )),
    }
}
