/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::api::v1::alerts::{AlertResponse, CreateAlertRequest, UpdateAlertRequest};
use crate::api::v1::dashboard::DashboardResponse;
use crate::api::v1::logs::LogPageResponse;
use crate::api::v1::price_alerts::{CreatePriceAlertRequest, UpdatePriceAlertRequest};
use crate::api::v1::telegram_configs::{
    ConnectionTestResponse, CreateTelegramConfigRequest, TelegramConfigDetailResponse,
    TelegramConfigResponse, UpdateTelegramConfigRequest,
};
use crate::api::v1::{alerts, dashboard, logs, price_alerts, telegram_configs};
use crate::api::{webhook, AppState};
use axum::{response::Json, routing::get, Router};
use tvrelay_models::models::{AlertType, NotificationLog, PriceAlert};
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        webhook::receive_webhook,
        dashboard::get_dashboard,
        telegram_configs::list_telegram_configs,
        telegram_configs::create_telegram_config,
        telegram_configs::get_telegram_config,
        telegram_configs::update_telegram_config,
        telegram_configs::delete_telegram_config,
        telegram_configs::test_telegram_config,
        alerts::list_alerts,
        alerts::create_alert,
        alerts::get_alert,
        alerts::update_alert,
        alerts::delete_alert,
        alerts::regenerate_key,
        price_alerts::list_price_alerts,
        price_alerts::create_price_alert,
        price_alerts::get_price_alert,
        price_alerts::update_price_alert,
        price_alerts::delete_price_alert,
        logs::list_logs,
    ),
    components(
        schemas(
            DashboardResponse,
            TelegramConfigResponse,
            TelegramConfigDetailResponse,
            CreateTelegramConfigRequest,
            UpdateTelegramConfigRequest,
            ConnectionTestResponse,
            AlertResponse,
            CreateAlertRequest,
            UpdateAlertRequest,
            PriceAlert,
            AlertType,
            CreatePriceAlertRequest,
            UpdatePriceAlertRequest,
            NotificationLog,
            LogPageResponse,
        )
    ),
    tags(
        (name = "webhook", description = "TradingView webhook receiver"),
        (name = "dashboard", description = "Configuration overview"),
        (name = "telegram-configs", description = "Telegram bot configuration API"),
        (name = "alerts", description = "Webhook alert management API"),
        (name = "price-alerts", description = "Price alert management API"),
        (name = "logs", description = "Notification log API")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "admin_secret",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

/// Serves the document at `/api/v1/openapi.json` without authentication.
pub fn routes() -> Router<AppState> {
    Router::new().route("/openapi.json", get(serve_openapi))
}

async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
