/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Metrics Module
//!
//! Prometheus metrics for the relay. The registry is shared with the worker,
//! which registers its own collectors into it.

use once_cell::sync::Lazy;
use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};

/// Global Prometheus registry for all relay metrics
pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// HTTP request counter
/// Labels: endpoint, method, status
pub static HTTP_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    let opts = Opts::new(
        "tvrelay_http_requests_total",
        "Total number of HTTP requests by endpoint and status",
    );
    let counter = CounterVec::new(opts, &["endpoint", "method", "status"])
        .expect("Failed to create HTTP requests counter");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("Failed to register HTTP requests counter");
    counter
});

/// HTTP request duration histogram
/// Labels: endpoint, method
pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let opts = HistogramOpts::new(
        "tvrelay_http_request_duration_seconds",
        "HTTP request latency distribution in seconds",
    )
    .buckets(vec![
        0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ]);
    let histogram = HistogramVec::new(opts, &["endpoint", "method"])
        .expect("Failed to create HTTP request duration histogram");
    REGISTRY
        .register(Box::new(histogram.clone()))
        .expect("Failed to register HTTP request duration histogram");
    histogram
});

/// Webhooks received
/// Labels: outcome (delivered, failed, not_found, inactive_config, error)
pub static WEBHOOKS_RECEIVED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    let opts = Opts::new(
        "tvrelay_webhooks_received_total",
        "Total number of TradingView webhooks received by outcome",
    );
    let counter =
        CounterVec::new(opts, &["outcome"]).expect("Failed to create webhooks counter");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("Failed to register webhooks counter");
    counter
});

/// Telegram notifications
/// Labels: source (webhook, price, test), status (success, failed)
pub static NOTIFICATIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    let opts = Opts::new(
        "tvrelay_notifications_total",
        "Total number of Telegram notifications by source and status",
    );
    let counter = CounterVec::new(opts, &["source", "status"])
        .expect("Failed to create notifications counter");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("Failed to register notifications counter");
    counter
});

/// Telegram API call duration
pub static TELEGRAM_SEND_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let opts = HistogramOpts::new(
        "tvrelay_telegram_send_duration_seconds",
        "Telegram sendMessage latency distribution in seconds",
    )
    .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]);
    let histogram = HistogramVec::new(opts, &["status"])
        .expect("Failed to create Telegram duration histogram");
    REGISTRY
        .register(Box::new(histogram.clone()))
        .expect("Failed to register Telegram duration histogram");
    histogram
});

/// Records a finished HTTP request.
pub fn record_http_request(endpoint: &str, method: &str, status: u16, duration_seconds: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[endpoint, method, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[endpoint, method])
        .observe(duration_seconds);
}

pub fn record_webhook(outcome: &str) {
    WEBHOOKS_RECEIVED_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_notification(source: &str, status: &str) {
    NOTIFICATIONS_TOTAL.with_label_values(&[source, status]).inc();
}

pub fn record_telegram_send(status: &str, duration_seconds: f64) {
    TELEGRAM_SEND_DURATION_SECONDS
        .with_label_values(&[status])
        .observe(duration_seconds);
}

/// Encodes all registered metrics in Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    // Touch the collectors so they appear before their first sample.
    Lazy::force(&HTTP_REQUESTS_TOTAL);
    Lazy::force(&HTTP_REQUEST_DURATION_SECONDS);
    Lazy::force(&WEBHOOKS_RECEIVED_TOTAL);
    Lazy::force(&NOTIFICATIONS_TOTAL);
    Lazy::force(&TELEGRAM_SEND_DURATION_SECONDS);

    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = vec![];
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
