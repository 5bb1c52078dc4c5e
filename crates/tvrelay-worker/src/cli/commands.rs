/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # CLI Commands Module
//!
//! `start` waits for the database, starts the health server and runs the
//! price check loop until Ctrl-C or SIGTERM. `run-once` runs a single cycle
//! and prints its summary.
//!
//! The worker never applies migrations; the web service owns the schema.

use crate::checker::PriceAlertChecker;
use crate::health::{self, HealthState};
use crate::metrics;
use crate::prices::PriceClient;
use tokio::time::{interval, sleep, Duration, MissedTickBehavior};
use tvrelay_utils::config::Settings;
use tvrelay_utils::logging::prelude::*;
use tvrelay_web::dal::{DalError, DAL};
use tvrelay_web::db::create_shared_connection_pool;
use tvrelay_web::utils::{shutdown_signal, telegram::TelegramClient};

/// Runs one blocking database check. A check that panics counts as a failure.
async fn check_once<F>(check: F) -> Result<(), String>
where
    F: FnOnce() -> Result<(), DalError> + Send + 'static,
{
    match tokio::task::spawn_blocking(check).await {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(e) => Err(format!("database check panicked: {}", e)),
    }
}

/// Pings the database until it answers or `retries` attempts have failed.
pub async fn wait_for_database(dal: &DAL, retries: u32, delay: Duration) -> Result<(), String> {
    let retries = retries.max(1);
    let mut attempt = 1;
    loop {
        let dal = dal.clone();
        match check_once(move || dal.ping()).await {
            Ok(()) => {
                info!("Database is reachable");
                return Ok(());
            }
            Err(e) if attempt < retries => {
                warn!(
                    "Database not reachable (attempt {}/{}): {}",
                    attempt, retries, e
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                error!(
                    "Database not reachable after {} attempts. Giving up.",
                    retries
                );
                return Err(e);
            }
        }
    }
}

fn build_checker(config: &Settings) -> Result<(DAL, PriceAlertChecker), Box<dyn std::error::Error>> {
    let pool =
        create_shared_connection_pool(&config.database.url, config.database.max_connections)?;
    let dal = DAL::new(pool);
    let telegram = TelegramClient::new(&config.telegram)?;
    let prices = PriceClient::new(&config.prices)?;
    info!("Price quotes come from {}", prices.source().as_str());

    Ok((dal.clone(), PriceAlertChecker::new(dal, telegram, prices)))
}

pub async fn start(config: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting TradingView relay worker");
    metrics::init();

    let (dal, checker) = build_checker(config)?;

    info!("Waiting for database to be ready");
    wait_for_database(
        &dal,
        config.worker.startup_retries,
        Duration::from_secs(config.worker.startup_retry_delay_seconds),
    )
    .await?;

    let health_state = HealthState::new(dal);
    let check_status = health_state.check_status.clone();

    let health_port = config.worker.health_port;
    info!("Starting health check server on port {}", health_port);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", health_port)).await?;
    let health_router = health::configure_health_routes(health_state);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_router).await {
            error!("Health check server failed: {}", e);
        }
    });

    let period = Duration::from_secs(config.worker.check_interval_seconds.max(1));
    info!(
        "Starting price alert checker (interval: {}s)",
        period.as_secs()
    );
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                let result = checker.run_once().await;
                check_status.write().await.record(&result);
            }
        }
    }

    info!("Worker stopped");
    Ok(())
}

pub async fn run_once(config: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    info!("Running a single price check");
    let (dal, checker) = build_checker(config)?;
    wait_for_database(
        &dal,
        config.worker.startup_retries,
        Duration::from_secs(config.worker.startup_retry_delay_seconds),
    )
    .await?;

    let summary = checker.run_once().await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
