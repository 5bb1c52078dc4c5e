/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Health Check Module
//!
//! HTTP health endpoints for the worker. The worker has no public surface;
//! these exist for the platform's probes and for scraping.
//!
//! ## Endpoints
//!
//! - `GET /healthz`: liveness, 200 while the process runs
//! - `GET /readyz`: 200 once a database round trip succeeds
//! - `GET /health`: JSON with database status, the last check cycle, uptime and version
//! - `GET /metrics`: Prometheus text format

use crate::checker::CheckSummary;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tvrelay_utils::logging::prelude::*;
use tvrelay_web::dal::DAL;

/// Outcome of the most recent check cycle.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckStatus {
    pub last_check: Option<DateTime<Utc>>,
    pub last_summary: Option<CheckSummary>,
    pub last_error: Option<String>,
}

impl CheckStatus {
    pub fn record(&mut self, result: &Result<CheckSummary, impl std::fmt::Display>) {
        self.last_check = Some(Utc::now());
        match result {
            Ok(summary) => {
                self.last_summary = Some(summary.clone());
                self.last_error = None;
            }
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }
}

/// Shared state for health endpoints
#[derive(Clone)]
pub struct HealthState {
    pub dal: DAL,
    pub check_status: Arc<RwLock<CheckStatus>>,
    pub start_time: Instant,
}

impl HealthState {
    pub fn new(dal: DAL) -> Self {
        HealthState {
            dal,
            check_status: Arc::new(RwLock::new(CheckStatus::default())),
            start_time: Instant::now(),
        }
    }
}

#[derive(Serialize)]
struct HealthStatus {
    status: String,
    database: DatabaseStatus,
    checker: CheckStatus,
    uptime_seconds: u64,
    version: String,
    timestamp: String,
}

#[derive(Serialize)]
struct DatabaseStatus {
    connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Configures and returns the health check router
pub fn configure_health_routes(state: HealthState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn ping(dal: DAL) -> Result<(), String> {
    match tokio::task::spawn_blocking(move || dal.ping()).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e.to_string()),
        Err(e) => Err(e.to_string()),
    }
}

async fn readyz(State(state): State<HealthState>) -> impl IntoResponse {
    match ping(state.dal).await {
        Ok(()) => (StatusCode::OK, "Ready"),
        Err(e) => {
            warn!("Database connectivity check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
        }
    }
}

/// Detailed health. 503 when the database is unreachable.
async fn health(State(state): State<HealthState>) -> impl IntoResponse {
    let (connected, error) = match ping(state.dal.clone()).await {
        Ok(()) => (true, None),
        Err(e) => {
            warn!("Database connectivity check failed: {}", e);
            (false, Some(e))
        }
    };
    let checker = state.check_status.read().await.clone();

    let body = HealthStatus {
        status: if connected { "healthy" } else { "unhealthy" }.to_string(),
        database: DatabaseStatus { connected, error },
        checker,
        uptime_seconds: state.start_time.elapsed().as_secs(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    };
    let status = if connected {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}

async fn metrics_handler() -> Response {
    match tvrelay_web::metrics::encode_metrics() {
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
