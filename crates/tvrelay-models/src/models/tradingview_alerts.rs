/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # TradingView Alerts Module
//!
//! A TradingView alert owns a secret webhook key. TradingView posts alert
//! payloads to `/webhook/<webhook_key>`; the payload fields are rendered into
//! `message_template` and sent through the alert's Telegram config.

use super::{check_length, MAX_NAME_LENGTH};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const MAX_WEBHOOK_KEY_LENGTH: usize = 50;

/// Template used when none is supplied.
pub const DEFAULT_WEBHOOK_TEMPLATE: &str =
    "TradingView Alert: {{strategy}} - {{ticker}} - {{close}}";

/// Represents a webhook alert in the system.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::schema::tradingview_alerts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TradingViewAlert {
    /// Unique identifier for the alert
    pub id: Uuid,
    /// Human-readable name
    pub name: String,
    /// Secret path segment identifying the alert
    pub webhook_key: String,
    /// Message template rendered against the webhook payload
    pub message_template: String,
    /// Whether the webhook accepts deliveries
    pub is_active: bool,
    /// Telegram config that receives the rendered message
    pub telegram_config_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Represents a new webhook alert to be inserted into the database.
#[derive(Insertable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::tradingview_alerts)]
pub struct NewTradingViewAlert {
    pub name: String,
    pub webhook_key: String,
    pub message_template: String,
    pub is_active: bool,
    pub telegram_config_id: Uuid,
}

impl NewTradingViewAlert {
    /// Creates a new, active `NewTradingViewAlert`.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the alert
    /// * `webhook_key` - Generated webhook key
    /// * `telegram_config_id` - Telegram config receiving messages
    /// * `message_template` - Optional template; blank or missing uses the default
    pub fn new(
        name: String,
        webhook_key: String,
        telegram_config_id: Uuid,
        message_template: Option<String>,
    ) -> Result<Self, String> {
        if name.trim().is_empty() {
            return Err("Name and Telegram configuration are required".to_string());
        }
        if webhook_key.trim().is_empty() {
            return Err("Webhook key cannot be empty".to_string());
        }
        check_length("Name", name.trim(), MAX_NAME_LENGTH)?;
        check_length("Webhook key", &webhook_key, MAX_WEBHOOK_KEY_LENGTH)?;

        let message_template = message_template
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_WEBHOOK_TEMPLATE.to_string());

        Ok(NewTradingViewAlert {
            name: name.trim().to_string(),
            webhook_key,
            message_template,
            is_active: true,
            telegram_config_id,
        })
    }
}

/// Changes applied to an existing webhook alert. `None` leaves a column untouched.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::tradingview_alerts)]
pub struct UpdateTradingViewAlert {
    pub name: Option<String>,
    pub webhook_key: Option<String>,
    pub message_template: Option<String>,
    pub is_active: Option<bool>,
    pub telegram_config_id: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UpdateTradingViewAlert {
    pub fn new(
        name: Option<String>,
        message_template: Option<String>,
        is_active: Option<bool>,
        telegram_config_id: Option<Uuid>,
    ) -> Result<Self, String> {
        if name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err("Name cannot be empty".to_string());
        }
        if let Some(name) = &name {
            check_length("Name", name.trim(), MAX_NAME_LENGTH)?;
        }
        if message_template
            .as_deref()
            .is_some_and(|t| t.trim().is_empty())
        {
            return Err("Message template cannot be empty".to_string());
        }

        Ok(UpdateTradingViewAlert {
            name: name.map(|n| n.trim().to_string()),
            webhook_key: None,
            message_template,
            is_active,
            telegram_config_id,
            updated_at: Some(Utc::now()),
        })
    }

    /// A change that only replaces the webhook key.
    pub fn rotate_key(webhook_key: String) -> Self {
        UpdateTradingViewAlert {
            webhook_key: Some(webhook_key),
            updated_at: Some(Utc::now()),
            ..Default::default()
        }
    }
}
