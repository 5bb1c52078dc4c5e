/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use super::{admin_request, json_body};
use crate::fixtures::TestFixture;

#[tokio::test]
#[ignore]
async fn test_create_alert_generates_key_and_url() {
    let fixture = TestFixture::new().await;
    let config = fixture.insert_telegram_config();

    let response = admin_request(
        fixture.create_test_router(),
        "POST",
        "/api/v1/alerts",
        Some(json!({"name": "BTC breakout", "telegram_config_id": config.id})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    let key = body["webhook_key"].as_str().unwrap();
    assert_eq!(key.len(), 16);
    assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(
        body["webhook_url"],
        format!("https://relay.example.com/webhook/{}", key)
    );
    assert_eq!(
        body["message_template"],
        "TradingView Alert: {{strategy}} - {{ticker}} - {{close}}"
    );
}

#[tokio::test]
#[ignore]
async fn test_create_alert_rejects_bad_template() {
    let fixture = TestFixture::new().await;
    let config = fixture.insert_telegram_config();

    let response = admin_request(
        fixture.create_test_router(),
        "POST",
        "/api/v1/alerts",
        Some(json!({
            "name": "Broken",
            "telegram_config_id": config.id,
            "message_template": "{{ ticker"
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(fixture.dal.tradingview_alerts().list().unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_create_alert_rejects_unknown_config() {
    let fixture = TestFixture::new().await;

    let response = admin_request(
        fixture.create_test_router(),
        "POST",
        "/api/v1/alerts",
        Some(json!({"name": "Orphan", "telegram_config_id": Uuid::new_v4()})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Telegram configuration not found");
}

#[tokio::test]
#[ignore]
async fn test_regenerate_key_invalidates_old_url() {
    let fixture = TestFixture::new().await;
    let config = fixture.insert_telegram_config();
    let alert = fixture.insert_webhook_alert(config.id, None);

    let response = admin_request(
        fixture.create_test_router(),
        "POST",
        &format!("/api/v1/alerts/{}/regenerate-key", alert.id),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_ne!(body["webhook_key"], alert.webhook_key.as_str());

    assert!(fixture
        .dal
        .tradingview_alerts()
        .get_active_by_key(&alert.webhook_key)
        .unwrap()
        .is_none());
}

#[tokio::test]
#[ignore]
async fn test_update_and_delete_alert() {
    let fixture = TestFixture::new().await;
    let config = fixture.insert_telegram_config();
    let alert = fixture.insert_webhook_alert(config.id, None);
    let uri = format!("/api/v1/alerts/{}", alert.id);

    let response = admin_request(
        fixture.create_test_router(),
        "PUT",
        &uri,
        Some(json!({"name": "Renamed", "is_active": false})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["is_active"], false);
    assert_eq!(body["webhook_key"], alert.webhook_key.as_str());

    let response = admin_request(fixture.create_test_router(), "DELETE", &uri, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = admin_request(fixture.create_test_router(), "GET", &uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_overlong_alert_name_is_rejected() {
    let fixture = TestFixture::offline().await;

    let response = admin_request(
        fixture.create_test_router(),
        "POST",
        "/api/v1/alerts",
        Some(json!({
            "name": "n".repeat(101),
            "telegram_config_id": uuid::Uuid::new_v4()
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Name cannot be longer than 100 characters");
}
