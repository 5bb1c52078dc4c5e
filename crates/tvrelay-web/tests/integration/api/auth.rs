/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

use super::json_body;
use crate::fixtures::TestFixture;

#[tokio::test]
async fn test_missing_authorization_is_rejected() {
    let fixture = TestFixture::offline().await;
    let app = fixture.create_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/alerts")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_secret_is_rejected() {
    let fixture = TestFixture::offline().await;
    let app = fixture.create_test_router();

    for uri in ["/api/v1/dashboard", "/api/v1/telegram-configs", "/api/v1/logs"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .header(header::AUTHORIZATION, "Bearer not-the-secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
    }
}

#[tokio::test]
async fn test_openapi_document_is_public() {
    let fixture = TestFixture::offline().await;
    let app = fixture.create_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let doc = json_body(response).await;
    assert!(doc["paths"]["/webhook/{webhook_key}"].is_object());
    assert!(doc["components"]["securitySchemes"]["admin_secret"].is_object());
}

#[tokio::test]
async fn test_webhook_does_not_require_secret() {
    let fixture = TestFixture::offline().await;
    let app = fixture.create_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/webhook/AbCdEfGh12345678")
                .body(Body::from("hello"))
                .unwrap(),
        )
        .await
        .unwrap();

    // The database is down, so the lookup fails, but auth never got in the way.
    assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
}
