/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

mod alerts;
mod auth;
mod health;
mod logs;
mod telegram_configs;
mod webhook;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::fixtures::ADMIN_SECRET;

/// Sends an authenticated request with an optional JSON body.
pub async fn admin_request(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> Response<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_SECRET));
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}
