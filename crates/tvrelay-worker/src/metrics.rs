/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Metrics Module
//!
//! Prometheus metrics for the price alert worker. Collectors are registered
//! into the shared relay registry so `/metrics` also carries the delivery
//! metrics recorded by the notification path.

use once_cell::sync::Lazy;
use prometheus::{CounterVec, Gauge, Histogram, HistogramOpts, HistogramVec, Opts};
use tvrelay_web::metrics::REGISTRY;

/// Check cycles
/// Labels: status (success/error)
pub static CHECKS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    let opts = Opts::new(
        "tvrelay_worker_checks_total",
        "Total number of price alert check cycles",
    );
    let counter = CounterVec::new(opts, &["status"]).expect("Failed to create checks counter");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("Failed to register checks counter");
    counter
});

/// Check cycle duration histogram
pub static CHECK_DURATION_SECONDS: Lazy<Histogram> = Lazy::new(|| {
    let opts = HistogramOpts::new(
        "tvrelay_worker_check_duration_seconds",
        "Price alert check cycle latency distribution in seconds",
    )
    .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]);
    let histogram =
        Histogram::with_opts(opts).expect("Failed to create check duration histogram");
    REGISTRY
        .register(Box::new(histogram.clone()))
        .expect("Failed to register check duration histogram");
    histogram
});

/// Price quote requests
/// Labels: source, status
pub static QUOTE_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let opts = HistogramOpts::new(
        "tvrelay_worker_quote_duration_seconds",
        "Price quote request latency distribution in seconds",
    )
    .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]);
    let histogram = HistogramVec::new(opts, &["source", "status"])
        .expect("Failed to create quote duration histogram");
    REGISTRY
        .register(Box::new(histogram.clone()))
        .expect("Failed to register quote duration histogram");
    histogram
});

/// Alerts whose condition held
/// Labels: outcome (delivered/failed/skipped)
pub static ALERTS_TRIGGERED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    let opts = Opts::new(
        "tvrelay_worker_alerts_triggered_total",
        "Total number of price alerts whose condition was met",
    );
    let counter = CounterVec::new(opts, &["outcome"])
        .expect("Failed to create triggered alerts counter");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("Failed to register triggered alerts counter");
    counter
});

/// Last successful check (Unix timestamp)
pub static LAST_SUCCESSFUL_CHECK_TIMESTAMP: Lazy<Gauge> = Lazy::new(|| {
    let opts = Opts::new(
        "tvrelay_worker_last_successful_check_timestamp",
        "Unix timestamp of the last successful price alert check",
    );
    let gauge = Gauge::with_opts(opts).expect("Failed to create last check gauge");
    REGISTRY
        .register(Box::new(gauge.clone()))
        .expect("Failed to register last check gauge");
    gauge
});

/// Registers every worker collector so it is exported before its first sample.
pub fn init() {
    Lazy::force(&CHECKS_TOTAL);
    Lazy::force(&CHECK_DURATION_SECONDS);
    Lazy::force(&QUOTE_DURATION_SECONDS);
    Lazy::force(&ALERTS_TRIGGERED_TOTAL);
    Lazy::force(&LAST_SUCCESSFUL_CHECK_TIMESTAMP);
}

pub fn record_check(success: bool, duration_seconds: f64) {
    let status = if success { "success" } else { "error" };
    CHECKS_TOTAL.with_label_values(&[status]).inc();
    CHECK_DURATION_SECONDS.observe(duration_seconds);
    if success {
        LAST_SUCCESSFUL_CHECK_TIMESTAMP.set(chrono::Utc::now().timestamp() as f64);
    }
}

pub fn record_quote(source: &str, status: &str, duration_seconds: f64) {
    QUOTE_DURATION_SECONDS
        .with_label_values(&[source, status])
        .observe(duration_seconds);
}

pub fn record_triggered(outcome: &str) {
    ALERTS_TRIGGERED_TOTAL.with_label_values(&[outcome]).inc();
}
