/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

use crate::api::{self, v1::middleware::AdminSecret, AppState};
use crate::dal::DAL;
use crate::db::create_shared_connection_pool;
use crate::utils;
use crate::utils::background_tasks::{start_log_cleanup_task, LogCleanupConfig};
use crate::utils::telegram::TelegramClient;
use std::path::Path;
use tvrelay_utils::config::Settings;
use tvrelay_utils::descriptor::{Descriptor, DescriptorError};
use tvrelay_utils::logging::prelude::*;
use uuid::Uuid;

/// Starts the web server.
///
/// Creates the pool, applies migrations, starts the log cleanup task and
/// serves until Ctrl-C or SIGTERM.
pub async fn serve(config: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting TradingView relay web service");

    info!("Creating database connection pool");
    let connection_pool =
        create_shared_connection_pool(&config.database.url, config.database.max_connections)?;

    info!("Running pending database migrations");
    let applied = connection_pool.run_migrations()?;
    info!("Database migrations completed ({} applied)", applied);

    let dal = DAL::new(connection_pool);
    let telegram = TelegramClient::new(&config.telegram)?;

    let admin = match config.web.session_secret() {
        Some(secret) => AdminSecret::new(secret),
        None => {
            let secret = utils::generate_admin_secret();
            warn!("SESSION_SECRET is not set; generated a temporary admin secret");
            println!("Admin secret for this run: {}", secret);
            AdminSecret::new(&secret)
        }
    };
    info!("Admin secret fingerprint: {}", admin.fingerprint());

    info!("Starting background tasks");
    start_log_cleanup_task(dal.clone(), LogCleanupConfig::from(&config.web));

    let state = AppState {
        dal,
        telegram,
        admin,
        public_url: config.web.public_url.clone(),
    };

    info!("Configuring API routes");
    let app = api::configure_api_routes(state.clone()).with_state(state);

    let addr = config.web.bind_address();
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("TradingView relay web service is now running");
    axum::serve(listener, app)
        .with_graceful_shutdown(utils::shutdown_signal())
        .await?;

    info!("Web service stopped");
    Ok(())
}

/// Validates a deployment descriptor and prints every violation found.
pub fn check_descriptor(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    info!("Checking deployment descriptor {}", path.display());

    let descriptor = Descriptor::from_path(path)?;
    let violations = descriptor.violations();

    if violations.is_empty() {
        println!("{}: OK", path.display());
        return Ok(());
    }

    println!("{}: {} problem(s)", path.display(), violations.len());
    for violation in &violations {
        println!("  - {}", violation);
    }
    Err(Box::new(DescriptorError::Invalid(violations)))
}

/// Replaces the webhook key of one alert and prints the new key.
pub fn rotate_webhook_key(config: &Settings, id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
    info!("Rotating webhook key for alert {}", id);

    let pool = create_shared_connection_pool(&config.database.url, 1)?;
    let dal = DAL::new(pool);
    let alerts = dal.tradingview_alerts();

    let alert = alerts.get(id)?.ok_or("Alert not found")?;

    let mut webhook_key = utils::generate_webhook_key();
    while alerts.key_exists(&webhook_key)? {
        webhook_key = utils::generate_webhook_key();
    }

    let alert = alerts
        .rotate_key(alert.id, webhook_key)?
        .ok_or("Alert not found")?;

    info!("Webhook key rotated for alert: {}", alert.name);
    println!("New webhook key for '{}': {}", alert.name, alert.webhook_key);
    Ok(())
}
