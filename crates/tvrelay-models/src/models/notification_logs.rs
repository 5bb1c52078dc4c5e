/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Notification Logs Module
//!
//! Every delivery attempt, webhook or price driven, leaves one log row. Rows
//! are append-only; deleting the originating alert nulls the reference but
//! keeps the row.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_FAILED: &str = "failed";

/// Represents a recorded delivery attempt.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::schema::notification_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NotificationLog {
    pub id: Uuid,
    /// Originating webhook alert, if any
    pub alert_id: Option<Uuid>,
    /// Originating price alert, if any
    pub price_alert_id: Option<Uuid>,
    /// Raw payload that triggered the delivery
    pub payload: Option<String>,
    /// Rendered message text
    pub message_sent: Option<String>,
    /// "success" or "failed"
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NotificationLog {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

/// What caused a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertRef {
    Webhook(Uuid),
    Price(Uuid),
    /// Ad-hoc sends such as connection tests
    Unknown,
}

impl AlertRef {
    fn columns(self) -> (Option<Uuid>, Option<Uuid>) {
        match self {
            AlertRef::Webhook(id) => (Some(id), None),
            AlertRef::Price(id) => (None, Some(id)),
            AlertRef::Unknown => (None, None),
        }
    }
}

/// Represents a new log row to be inserted into the database.
#[derive(Insertable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::notification_logs)]
pub struct NewNotificationLog {
    pub alert_id: Option<Uuid>,
    pub price_alert_id: Option<Uuid>,
    pub payload: Option<String>,
    pub message_sent: Option<String>,
    pub status: String,
    pub error_message: Option<String>,
}

impl NewNotificationLog {
    /// A log row for a message Telegram accepted.
    pub fn delivered(source: AlertRef, payload: Option<String>, message: String) -> Self {
        let (alert_id, price_alert_id) = source.columns();
        NewNotificationLog {
            alert_id,
            price_alert_id,
            payload,
            message_sent: Some(message),
            status: STATUS_SUCCESS.to_string(),
            error_message: None,
        }
    }

    /// A log row for a failed delivery. `message` is absent when rendering never happened.
    pub fn failed(
        source: AlertRef,
        payload: Option<String>,
        message: Option<String>,
        error: impl Into<String>,
    ) -> Self {
        let (alert_id, price_alert_id) = source.columns();
        NewNotificationLog {
            alert_id,
            price_alert_id,
            payload,
            message_sent: message,
            status: STATUS_FAILED.to_string(),
            error_message: Some(error.into()),
        }
    }
}

/// Optional filters for listing logs.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct NotificationLogFilter {
    pub alert_id: Option<Uuid>,
    pub price_alert_id: Option<Uuid>,
    /// "success" or "failed"
    pub status: Option<String>,
}

impl NotificationLogFilter {
    /// Rejects status values the table can never hold.
    pub fn validate(&self) -> Result<(), String> {
        match self.status.as_deref() {
            None | Some(STATUS_SUCCESS) | Some(STATUS_FAILED) => Ok(()),
            Some(other) => Err(format!("Invalid status filter: {}", other)),
        }
    }
}
