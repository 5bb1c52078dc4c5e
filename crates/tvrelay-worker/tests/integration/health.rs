/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::fixtures::offline_dal;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;
use tvrelay_worker::checker::CheckSummary;
use tvrelay_worker::health::{configure_health_routes, HealthState};

async fn get(state: HealthState, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = configure_health_routes(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_healthz_without_database() {
    let (status, body) = get(HealthState::new(offline_dal()), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_readyz_reports_database_down() {
    let (status, body) = get(HealthState::new(offline_dal()), "/readyz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, b"Database unavailable");
}

#[tokio::test]
async fn test_health_includes_last_check() {
    let state = HealthState::new(offline_dal());
    let result: Result<CheckSummary, String> = Ok(CheckSummary {
        checked: 4,
        triggered: 1,
        delivered: 1,
        ..Default::default()
    });
    state.check_status.write().await.record(&result);

    let (status, body) = get(state, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["database"]["connected"], false);
    assert!(json["database"]["error"].is_string());
    assert_eq!(json["checker"]["last_summary"]["checked"], 4);
    assert_eq!(json["checker"]["last_summary"]["delivered"], 1);
    assert!(json["checker"]["last_error"].is_null());
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_metrics_exports_worker_collectors() {
    tvrelay_worker::metrics::init();
    let (status, body) = get(HealthState::new(offline_dal()), "/metrics").await;
    assert_eq!(status, StatusCode::OK);

    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("tvrelay_worker_checks_total"));
    assert!(text.contains("tvrelay_worker_check_duration_seconds"));
}
