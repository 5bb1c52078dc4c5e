/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Utility functions shared by the web service and the worker.

use rand::distributions::Alphanumeric;
use rand::Rng;
use tvrelay_utils::logging::prelude::*;

pub mod background_tasks;
pub mod notifications;
pub mod telegram;
pub mod templating;

/// Length of generated webhook keys.
pub const WEBHOOK_KEY_LENGTH: usize = 16;

/// Length of the admin secret generated when none is configured.
pub const ADMIN_SECRET_LENGTH: usize = 32;

fn random_alphanumeric(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generates a random alphanumeric webhook key.
pub fn generate_webhook_key() -> String {
    random_alphanumeric(WEBHOOK_KEY_LENGTH)
}

/// Generates an admin secret for deployments that did not set one.
pub fn generate_admin_secret() -> String {
    random_alphanumeric(ADMIN_SECRET_LENGTH)
}

/// Resolves once the process is asked to stop (Ctrl-C or SIGTERM).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl+c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+c, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
