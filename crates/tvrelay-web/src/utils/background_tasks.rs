/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Background tasks for the web service.

use crate::dal::DAL;
use chrono::{Duration as ChronoDuration, Utc};
use std::time::Duration;
use tokio::time::interval;
use tvrelay_utils::config::Web;
use tvrelay_utils::logging::prelude::*;

/// Configuration for the notification log cleanup task.
#[derive(Debug, Clone)]
pub struct LogCleanupConfig {
    /// How often to run the cleanup (in seconds).
    pub interval_seconds: u64,
    /// Rows older than this many days are deleted. 0 keeps everything.
    pub retention_days: i64,
}

impl Default for LogCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            retention_days: 30,
        }
    }
}

impl From<&Web> for LogCleanupConfig {
    fn from(web: &Web) -> Self {
        Self {
            interval_seconds: web.log_cleanup_interval_seconds.max(1),
            retention_days: web.log_retention_days,
        }
    }
}

/// Deletes log rows past the retention window once. Returns the number deleted.
pub fn cleanup_logs_once(dal: &DAL, retention_days: i64) -> usize {
    if retention_days <= 0 {
        return 0;
    }

    let cutoff = Utc::now() - ChronoDuration::days(retention_days);
    match dal.notification_logs().delete_older_than(cutoff) {
        Ok(deleted) => {
            if deleted > 0 {
                info!(
                    "Cleaned up {} notification logs (age > {}d)",
                    deleted, retention_days
                );
            }
            deleted
        }
        Err(e) => {
            error!("Failed to cleanup notification logs: {}", e);
            0
        }
    }
}

/// Starts the notification log cleanup task. Does nothing when retention is disabled.
pub fn start_log_cleanup_task(dal: DAL, config: LogCleanupConfig) {
    if config.retention_days <= 0 {
        info!("Notification log retention disabled; cleanup task not started");
        return;
    }

    info!(
        "Starting notification log cleanup task (interval: {}s, retention: {}d)",
        config.interval_seconds, config.retention_days
    );

    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(config.interval_seconds));

        loop {
            ticker.tick().await;
            let dal = dal.clone();
            let retention_days = config.retention_days;
            if let Err(e) =
                tokio::task::spawn_blocking(move || cleanup_logs_once(&dal, retention_days)).await
            {
                error!("Notification log cleanup panicked: {}", e);
            }
        }
    });
}
