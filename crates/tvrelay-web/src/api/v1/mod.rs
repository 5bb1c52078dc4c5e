/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Configuration API, version 1.

pub mod alerts;
pub mod dashboard;
pub mod logs;
pub mod middleware;
pub mod openapi;
pub mod price_alerts;
pub mod telegram_configs;

use crate::api::AppState;
use crate::dal::{DalError, DAL};
use crate::utils::templating::validate_template;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::{Json, Router};
use serde_json::{json, Value};
use tvrelay_utils::logging::prelude::*;
use uuid::Uuid;

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<Value>);

pub(crate) fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

/// Maps a DAL failure onto a response, logging it with `context`.
pub(crate) fn dal_error(context: &str, e: DalError) -> ApiError {
    match e {
        DalError::InUse(msg) => {
            warn!("{}: {}", context, msg);
            api_error(StatusCode::CONFLICT, msg)
        }
        ref e if e.is_foreign_key_violation() => {
            warn!("{}: {}", context, e);
            api_error(StatusCode::BAD_REQUEST, "Telegram configuration not found")
        }
        DalError::Pool(e) => {
            error!("{}: {}", context, e);
            api_error(StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
        }
        e => {
            error!("{}: {}", context, e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
        }
    }
}

pub(crate) fn not_found(what: &str) -> ApiError {
    api_error(StatusCode::NOT_FOUND, format!("{} not found", what))
}

/// Rejects templates with invalid syntax. Missing or blank templates pass.
pub(crate) fn check_template(template: Option<&str>) -> Result<(), ApiError> {
    match template {
        Some(t) if !t.trim().is_empty() => {
            validate_template(t).map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))
        }
        _ => Ok(()),
    }
}

/// Rejects references to Telegram configurations that do not exist.
pub(crate) fn check_telegram_config(dal: &DAL, id: Uuid) -> Result<(), ApiError> {
    match dal.telegram_configs().get(id) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(api_error(
            StatusCode::BAD_REQUEST,
            "Telegram configuration not found",
        )),
        Err(e) => Err(dal_error("Failed to fetch Telegram configuration", e)),
    }
}

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .merge(dashboard::routes())
        .merge(telegram_configs::routes())
        .merge(alerts::routes())
        .merge(price_alerts::routes())
        .merge(logs::routes())
        .layer(from_fn_with_state(
            state.admin.clone(),
            middleware::auth_middleware,
        ));

    Router::new().merge(protected).merge(openapi::routes())
}
