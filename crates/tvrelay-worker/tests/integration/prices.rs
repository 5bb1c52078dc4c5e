/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::fixtures::{price_settings, spawn_alpha_vantage, spawn_yahoo, yahoo_client};
use axum::http::StatusCode;
use serde_json::json;
use tvrelay_worker::prices::{PriceClient, PriceError, PriceSource};

#[tokio::test]
async fn test_alpha_vantage_quote() {
    let (base, recorded) = spawn_alpha_vantage(
        StatusCode::OK,
        json!({"Global Quote": {"01. symbol": "AAPL", "05. price": "189.8400"}}),
    )
    .await;
    let client = PriceClient::new(&price_settings(Some("demo-key"), &base)).unwrap();
    assert_eq!(client.source(), PriceSource::AlphaVantage);

    let quote = client.quote("AAPL").await.unwrap();
    assert_eq!(quote.symbol, "AAPL");
    assert_eq!(quote.price, 189.84);
    assert_eq!(quote.source, PriceSource::AlphaVantage);

    let requests = recorded.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["function"], "GLOBAL_QUOTE");
    assert_eq!(requests[0]["symbol"], "AAPL");
    assert_eq!(requests[0]["apikey"], "demo-key");
}

#[tokio::test]
async fn test_alpha_vantage_rate_limit_is_invalid_data() {
    let (base, _) = spawn_alpha_vantage(
        StatusCode::OK,
        json!({"Note": "Our standard API rate limit is 25 requests per day."}),
    )
    .await;
    let client = PriceClient::new(&price_settings(Some("demo-key"), &base)).unwrap();

    let err = client.quote("AAPL").await.unwrap_err();
    assert!(matches!(err, PriceError::InvalidData(_)));
}

#[tokio::test]
async fn test_blank_key_uses_yahoo() {
    let (base, recorded) = spawn_yahoo(StatusCode::OK, 5123.41).await;
    let client = PriceClient::new(&price_settings(Some("  "), &base)).unwrap();
    assert_eq!(client.source(), PriceSource::Yahoo);

    let quote = client.quote("SPY").await.unwrap();
    assert_eq!(quote.price, 5123.41);
    assert_eq!(recorded.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_yahoo_quote_sends_symbol_and_user_agent() {
    let (base, recorded) = spawn_yahoo(StatusCode::OK, 5123.41).await;
    let client = yahoo_client(&base);

    let quote = client.quote("^GSPC").await.unwrap();
    assert_eq!(quote.price, 5123.41);
    assert_eq!(quote.source, PriceSource::Yahoo);

    let requests = recorded.lock().unwrap().clone();
    assert_eq!(requests[0]["symbol"], "^GSPC");
    assert_eq!(requests[0]["user_agent"], "relay-test-agent");
}

#[tokio::test]
async fn test_yahoo_error_status() {
    let (base, _) = spawn_yahoo(StatusCode::NOT_FOUND, 0.0).await;
    let client = yahoo_client(&base);

    match client.quote("NOPE").await {
        Err(PriceError::Status { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_provider_is_transport_error() {
    let client = yahoo_client("http://127.0.0.1:1");
    let err = client.quote("SPY").await.unwrap_err();
    assert!(matches!(err, PriceError::Transport(_)));
}
