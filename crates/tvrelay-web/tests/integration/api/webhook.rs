/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use tvrelay_models::models::{
    NotificationLogFilter, UpdateTelegramConfig, UpdateTradingViewAlert,
};

use super::json_body;
use crate::fixtures::TestFixture;

async fn post_webhook(app: Router, key: &str, content_type: &str, body: &str) -> axum::http::Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(format!("/webhook/{}", key))
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

#[tokio::test]
#[ignore]
async fn test_webhook_renders_and_delivers() {
    let fixture = TestFixture::new().await;
    let config = fixture.insert_telegram_config();
    let alert = fixture.insert_webhook_alert(config.id, Some("{{ ticker }} {{ action }} @ {{ close }}"));

    let response = post_webhook(
        fixture.create_test_router(),
        &alert.webhook_key,
        "application/json",
        r#"{"ticker":"BTCUSD","action":"buy","close":64000.5}"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Alert sent to Telegram");

    let sent = fixture.sent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, format!("bot{}", config.bot_token));
    assert_eq!(sent[0].1["chat_id"], config.chat_id.as_str());
    assert_eq!(sent[0].1["text"], "BTCUSD buy @ 64000.5");

    let logs = fixture
        .dal
        .notification_logs()
        .list(
            &NotificationLogFilter {
                alert_id: Some(alert.id),
                ..Default::default()
            },
            1,
            20,
        )
        .unwrap();
    assert_eq!(logs.total, 1);
    assert!(logs.items[0].is_success());
    assert_eq!(logs.items[0].message_sent.as_deref(), Some("BTCUSD buy @ 64000.5"));
}

#[tokio::test]
#[ignore]
async fn test_plain_text_body_is_wrapped() {
    let fixture = TestFixture::new().await;
    let config = fixture.insert_telegram_config();
    let alert = fixture.insert_webhook_alert(config.id, Some("Raw: {{ raw_data }}"));

    let response = post_webhook(
        fixture.create_test_router(),
        &alert.webhook_key,
        "text/plain",
        "BTCUSD crossed 70000",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(fixture.sent_messages()[0].1["text"], "Raw: BTCUSD crossed 70000");
}

#[tokio::test]
#[ignore]
async fn test_unknown_key_is_not_found() {
    let fixture = TestFixture::new().await;

    let response = post_webhook(fixture.create_test_router(), "NoSuchKey0000000", "text/plain", "x").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Alert not found or inactive");
    assert!(fixture.sent_messages().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_inactive_alert_is_not_found() {
    let fixture = TestFixture::new().await;
    let config = fixture.insert_telegram_config();
    let alert = fixture.insert_webhook_alert(config.id, None);
    fixture
        .dal
        .tradingview_alerts()
        .update(
            alert.id,
            &UpdateTradingViewAlert::new(None, None, Some(false), None).unwrap(),
        )
        .unwrap();

    let response = post_webhook(fixture.create_test_router(), &alert.webhook_key, "text/plain", "x").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_inactive_config_is_bad_request() {
    let fixture = TestFixture::new().await;
    let config = fixture.insert_telegram_config();
    let alert = fixture.insert_webhook_alert(config.id, None);
    fixture
        .dal
        .telegram_configs()
        .update(config.id, &UpdateTelegramConfig::new(None, None, Some(false)).unwrap())
        .unwrap();

    let response = post_webhook(fixture.create_test_router(), &alert.webhook_key, "text/plain", "x").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Telegram configuration is inactive");
    assert!(fixture.sent_messages().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_telegram_failure_is_logged() {
    let fixture = TestFixture::with_failing_telegram().await;
    let config = fixture.insert_telegram_config();
    let alert = fixture.insert_webhook_alert(config.id, None);

    let response = post_webhook(
        fixture.create_test_router(),
        &alert.webhook_key,
        "application/json",
        r#"{"strategy":"EMA","ticker":"ETHUSD","close":3100.25}"#,
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to send to Telegram"));

    let logs = fixture
        .dal
        .notification_logs()
        .list(
            &NotificationLogFilter {
                alert_id: Some(alert.id),
                status: Some("failed".to_string()),
                ..Default::default()
            },
            1,
            20,
        )
        .unwrap();
    assert_eq!(logs.total, 1);
    assert!(logs.items[0]
        .error_message
        .as_deref()
        .unwrap()
        .contains("400"));
}
