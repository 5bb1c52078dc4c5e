/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # API Routes Aggregator Module
//!
//! Builds the full router:
//!
//! - `/healthz`, `/readyz`, `/metrics` for the platform
//! - `POST /webhook/:webhook_key` for TradingView
//! - `/api/v1/*` for configuration, behind the admin secret

pub mod v1;
pub mod webhook;

use crate::dal::DAL;
use crate::metrics;
use crate::utils::telegram::TelegramClient;
use axum::{
    extract::{FromRef, MatchedPath, Request, State},
    http::{header, StatusCode},
    middleware::{self as axum_middleware, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tvrelay_utils::logging::prelude::*;
use v1::middleware::AdminSecret;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub dal: DAL,
    pub telegram: TelegramClient,
    pub admin: AdminSecret,
    /// Externally visible base URL for webhook links
    pub public_url: Option<String>,
}

impl FromRef<AppState> for DAL {
    fn from_ref(state: &AppState) -> DAL {
        state.dal.clone()
    }
}

impl FromRef<AppState> for AdminSecret {
    fn from_ref(state: &AppState) -> AdminSecret {
        state.admin.clone()
    }
}

/// Configures and returns the main application router with all API routes
pub fn configure_api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/api/v1", v1::routes(state))
        .route("/webhook/:webhook_key", post(webhook::receive_webhook))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics_handler))
        .layer(axum_middleware::from_fn(track_metrics))
        .layer(TraceLayer::new_for_http())
}

/// Liveness probe.
async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Readiness probe. Ready once a database round trip succeeds.
async fn readyz(State(dal): State<DAL>) -> impl IntoResponse {
    match tokio::task::spawn_blocking(move || dal.ping()).await {
        Ok(Ok(())) => (StatusCode::OK, "Ready"),
        Ok(Err(e)) => {
            warn!("Readiness check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
        }
        Err(e) => {
            error!("Readiness check panicked: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
        }
    }
}

/// Prometheus scrape endpoint.
async fn metrics_handler() -> Response {
    match metrics::encode_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Records request count and latency, labelled by route template so webhook
/// keys never end up in metric labels.
async fn track_metrics(request: Request, next: Next) -> Response {
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let method = request.method().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    metrics::record_http_request(
        &endpoint,
        &method,
        response.status().as_u16(),
        started.elapsed().as_secs_f64(),
    );
    response
}
