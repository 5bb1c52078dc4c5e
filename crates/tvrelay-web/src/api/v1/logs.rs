/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Notification log browsing.

use crate::api::v1::{api_error, dal_error, ApiError};
use crate::api::AppState;
use crate::dal::Page;
use axum::http::StatusCode;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tvrelay_models::models::{NotificationLog, NotificationLogFilter};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;
/// Highest page whose offset fits in an `i64` at any page size.
pub const MAX_PAGE: i64 = i64::MAX / MAX_PER_PAGE;

/// Query string for `GET /api/v1/logs`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct LogsQuery {
    /// 1-based page number
    pub page: Option<i64>,
    /// Rows per page, 1 to 100
    pub per_page: Option<i64>,
    pub alert_id: Option<Uuid>,
    pub price_alert_id: Option<Uuid>,
    /// "success" or "failed"
    pub status: Option<String>,
}

impl LogsQuery {
    /// Page and page size after defaults and clamping.
    pub fn bounds(&self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).clamp(1, MAX_PAGE);
        let per_page = self
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        (page, per_page)
    }

    pub fn filter(&self) -> NotificationLogFilter {
        NotificationLogFilter {
            alert_id: self.alert_id,
            price_alert_id: self.price_alert_id,
            status: self.status.clone(),
        }
    }
}

/// One page of notification log rows.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LogPageResponse {
    pub items: Vec<NotificationLog>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub pages: i64,
}

impl From<Page<NotificationLog>> for LogPageResponse {
    fn from(page: Page<NotificationLog>) -> Self {
        Self {
            items: page.items,
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            pages: page.pages,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/logs", get(list_logs))
}

#[utoipa::path(
    get,
    path = "/api/v1/logs",
    params(LogsQuery),
    responses(
        (status = 200, description = "Notification logs, newest first", body = LogPageResponse),
        (status = 400, description = "Invalid filter"),
        (status = 401, description = "Unauthorized")
    ),
    security(("admin_secret" = [])),
    tag = "logs"
)]
pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<LogPageResponse>, ApiError> {
    let filter = query.filter();
    filter
        .validate()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;
    let (page, per_page) = query.bounds();

    let logs = state
        .dal
        .notification_logs()
        .list(&filter, page, per_page)
        .map_err(|e| dal_error("Failed to fetch notification logs", e))?;

    Ok(Json(logs.into()))
}
