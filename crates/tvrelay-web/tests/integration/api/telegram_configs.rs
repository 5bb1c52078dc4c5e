/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use axum::http::StatusCode;
use serde_json::json;

use super::{admin_request, json_body};
use crate::fixtures::TestFixture;

#[tokio::test]
#[ignore]
async fn test_create_config_sends_test_message_and_masks_token() {
    let fixture = TestFixture::new().await;

    let response = admin_request(
        fixture.create_test_router(),
        "POST",
        "/api/v1/telegram-configs",
        Some(json!({"bot_token": " 123456:SECRETtokenWXYZ ", "chat_id": "-1002"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["bot_token"], "****WXYZ");
    assert_eq!(body["chat_id"], "-1002");
    assert_eq!(body["is_active"], true);

    let sent = fixture.sent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "bot123456:SECRETtokenWXYZ");
    assert_eq!(sent[0].1["text"], "Relay test message");
}

#[tokio::test]
#[ignore]
async fn test_create_config_refused_when_test_fails() {
    let fixture = TestFixture::with_failing_telegram().await;

    let response = admin_request(
        fixture.create_test_router(),
        "POST",
        "/api/v1/telegram-configs",
        Some(json!({"bot_token": "123:bad", "chat_id": "1"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Connection test failed"));
    assert!(fixture.dal.telegram_configs().list().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_config_requires_fields() {
    let fixture = TestFixture::offline().await;

    let response = admin_request(
        fixture.create_test_router(),
        "POST",
        "/api/v1/telegram-configs",
        Some(json!({"bot_token": "  ", "chat_id": "1"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Bot token and chat ID are required");
    assert!(fixture.sent_messages().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_delete_config_in_use_conflicts() {
    let fixture = TestFixture::new().await;
    let config = fixture.insert_telegram_config();
    fixture.insert_webhook_alert(config.id, None);

    let uri = format!("/api/v1/telegram-configs/{}", config.id);
    let response = admin_request(fixture.create_test_router(), "DELETE", &uri, None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = admin_request(fixture.create_test_router(), "GET", &uri, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["webhook_alerts"], 1);
    assert_eq!(body["price_alerts"], 0);
}

#[tokio::test]
#[ignore]
async fn test_delete_unused_config() {
    let fixture = TestFixture::new().await;
    let config = fixture.insert_telegram_config();
    let uri = format!("/api/v1/telegram-configs/{}", config.id);

    let response = admin_request(fixture.create_test_router(), "DELETE", &uri, None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = admin_request(fixture.create_test_router(), "DELETE", &uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_connection_test_endpoint() {
    let fixture = TestFixture::new().await;
    let config = fixture.insert_telegram_config();

    let response = admin_request(
        fixture.create_test_router(),
        "POST",
        &format!("/api/v1/telegram-configs/{}/test", config.id),
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(fixture.sent_messages().len(), 1);
}

#[tokio::test]
async fn test_overlong_token_is_rejected_before_test_message() {
    let fixture = TestFixture::offline().await;

    let response = admin_request(
        fixture.create_test_router(),
        "POST",
        "/api/v1/telegram-configs",
        Some(json!({
            "bot_token": "1".repeat(150),
            "chat_id": "-1001"
        })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Bot token cannot be longer than 100 characters");
    assert!(fixture.sent_messages().is_empty());
}
