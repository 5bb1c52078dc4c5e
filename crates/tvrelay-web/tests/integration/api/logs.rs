/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use axum::http::StatusCode;
use tvrelay_models::models::{AlertRef, NewNotificationLog};

use super::{admin_request, json_body};
use crate::fixtures::TestFixture;

#[tokio::test]
async fn test_invalid_status_filter() {
    let fixture = TestFixture::offline().await;

    let response = admin_request(
        fixture.create_test_router(),
        "GET",
        "/api/v1/logs?status=pending",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Invalid status filter: pending");
}

#[tokio::test]
#[ignore]
async fn test_logs_are_paginated_newest_first() {
    let fixture = TestFixture::new().await;
    let config = fixture.insert_telegram_config();
    let alert = fixture.insert_webhook_alert(config.id, None);

    for i in 0..5 {
        let log = NewNotificationLog::delivered(
            AlertRef::Webhook(alert.id),
            Some(format!("{{\"n\":{}}}", i)),
            format!("message {}", i),
        );
        fixture.dal.notification_logs().create(&log).unwrap();
    }

    let response = admin_request(
        fixture.create_test_router(),
        "GET",
        &format!("/api/v1/logs?per_page=2&page=1&alert_id={}", alert.id),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["total"], 5);
    assert_eq!(body["pages"], 3);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
#[ignore]
async fn test_dashboard_shows_recent_logs() {
    let fixture = TestFixture::new().await;
    let config = fixture.insert_telegram_config();
    let alert = fixture.insert_webhook_alert(config.id, None);
    for i in 0..12 {
        let log = NewNotificationLog::delivered(
            AlertRef::Webhook(alert.id),
            None,
            format!("message {}", i),
        );
        fixture.dal.notification_logs().create(&log).unwrap();
    }

    let response = admin_request(fixture.create_test_router(), "GET", "/api/v1/dashboard", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["recent_logs"].as_array().unwrap().len(), 10);
    assert_eq!(body["telegram_configs"][0]["bot_token"], "****oken");
    assert_eq!(body["alerts"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_huge_page_does_not_overflow() {
    let fixture = TestFixture::offline().await;

    let response = admin_request(
        fixture.create_test_router(),
        "GET",
        "/api/v1/logs?page=9223372036854775807&per_page=100",
        None,
    )
    .await;

    // Reaches the database lookup instead of failing on the offset.
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
#[ignore]
async fn test_huge_page_is_empty() {
    let fixture = TestFixture::new().await;
    let config = fixture.insert_telegram_config();
    let alert = fixture.insert_webhook_alert(config.id, None);
    let log = NewNotificationLog::delivered(AlertRef::Webhook(alert.id), None, "hi".to_string());
    fixture.dal.notification_logs().create(&log).unwrap();

    let response = admin_request(
        fixture.create_test_router(),
        "GET",
        "/api/v1/logs?page=9223372036854775807",
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["total"].as_i64().unwrap() >= 1);
    assert!(body["items"].as_array().unwrap().is_empty());
}
