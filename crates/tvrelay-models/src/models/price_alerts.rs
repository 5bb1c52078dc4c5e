/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Price Alerts Module
//!
//! A price alert watches one symbol and fires when the current price crosses
//! `target_price` in the configured direction:
//!
//! - `above`: fires when price > target
//! - `below`: fires when price < target
//!
//! One-time alerts record `is_triggered` / `last_triggered_at` when they fire
//! and are skipped afterwards until the trigger is reset.

use super::{check_length, MAX_NAME_LENGTH};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

pub const MAX_SYMBOL_LENGTH: usize = 30;

/// Template used when none is supplied.
pub const DEFAULT_PRICE_TEMPLATE: &str =
    "Alerta de precio: {{symbol}} ha alcanzado {{current_price}}, objetivo: {{target_price}}";

/// Direction a price has to move for the alert to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Above,
    Below,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Above => "above",
            AlertType::Below => "below",
        }
    }

    /// Whether `current` satisfies this direction against `target`.
    pub fn is_met(&self, current: f64, target: f64) -> bool {
        match self {
            AlertType::Above => current > target,
            AlertType::Below => current < target,
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AlertType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "above" => Ok(AlertType::Above),
            "below" => Ok(AlertType::Below),
            other => Err(format!("Invalid alert type: {}", other)),
        }
    }
}

/// Represents a price alert in the system.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::schema::price_alerts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PriceAlert {
    pub id: Uuid,
    pub name: String,
    /// Upper-cased trading symbol (e.g., SPX, AAPL)
    pub symbol: String,
    /// "above" or "below"
    pub alert_type: String,
    pub target_price: f64,
    pub message_template: String,
    pub is_active: bool,
    /// Whether the alert fires only once
    pub is_one_time: bool,
    /// Whether a one-time alert has already fired
    pub is_triggered: bool,
    pub last_triggered_at: Option<DateTime<Utc>>,
    pub telegram_config_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PriceAlert {
    pub fn kind(&self) -> Result<AlertType, String> {
        self.alert_type.parse()
    }

    /// Whether the alert should be evaluated in the next check.
    pub fn is_due(&self) -> bool {
        self.is_active && !(self.is_one_time && self.is_triggered)
    }

    /// Whether `current_price` fires this alert. Unknown types never fire.
    pub fn is_triggered_by(&self, current_price: f64) -> bool {
        self.kind()
            .map(|kind| kind.is_met(current_price, self.target_price))
            .unwrap_or(false)
    }

    /// Values available to the message template.
    pub fn message_context(&self, current_price: f64) -> serde_json::Value {
        json!({
            "name": self.name,
            "symbol": self.symbol,
            "current_price": current_price,
            "target_price": self.target_price,
            "alert_type": self.alert_type,
        })
    }
}

/// Represents a new price alert to be inserted into the database.
#[derive(Insertable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::price_alerts)]
pub struct NewPriceAlert {
    pub name: String,
    pub symbol: String,
    pub alert_type: String,
    pub target_price: f64,
    pub message_template: String,
    pub is_active: bool,
    pub is_one_time: bool,
    pub telegram_config_id: Uuid,
}

fn validate_symbol(symbol: &str) -> Result<String, String> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err("Symbol cannot be empty".to_string());
    }
    check_length("Symbol", &symbol, MAX_SYMBOL_LENGTH)?;
    Ok(symbol)
}

fn validate_target(target_price: f64) -> Result<f64, String> {
    if !target_price.is_finite() {
        return Err("Target price must be a finite number".to_string());
    }
    Ok(target_price)
}

impl NewPriceAlert {
    /// Creates a new, active `NewPriceAlert`.
    ///
    /// The symbol is upper-cased and a blank template falls back to the default.
    pub fn new(
        name: String,
        symbol: String,
        alert_type: AlertType,
        target_price: f64,
        telegram_config_id: Uuid,
        message_template: Option<String>,
        is_one_time: bool,
    ) -> Result<Self, String> {
        if name.trim().is_empty() {
            return Err("Name cannot be empty".to_string());
        }
        check_length("Name", name.trim(), MAX_NAME_LENGTH)?;

        Ok(NewPriceAlert {
            name: name.trim().to_string(),
            symbol: validate_symbol(&symbol)?,
            alert_type: alert_type.as_str().to_string(),
            target_price: validate_target(target_price)?,
            message_template: message_template
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PRICE_TEMPLATE.to_string()),
            is_active: true,
            is_one_time,
            telegram_config_id,
        })
    }
}

/// Changes applied to an existing price alert. `None` leaves a column untouched.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::price_alerts)]
pub struct UpdatePriceAlert {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub alert_type: Option<String>,
    pub target_price: Option<f64>,
    pub message_template: Option<String>,
    pub is_active: Option<bool>,
    pub is_one_time: Option<bool>,
    pub is_triggered: Option<bool>,
    pub last_triggered_at: Option<Option<DateTime<Utc>>>,
    pub telegram_config_id: Option<Uuid>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UpdatePriceAlert {
    /// Validates an edit. `reset_triggered` re-arms a fired one-time alert.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: Option<String>,
        symbol: Option<String>,
        alert_type: Option<AlertType>,
        target_price: Option<f64>,
        message_template: Option<String>,
        is_active: Option<bool>,
        is_one_time: Option<bool>,
        telegram_config_id: Option<Uuid>,
        reset_triggered: bool,
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

        let (is_triggered, last_triggered_at) = if reset_triggered {
            (Some(false), Some(None))
        } else {
            (None, None)
        };

        Ok(UpdatePriceAlert {
            name: name.map(|n| n.trim().to_string()),
            symbol: symbol.as_deref().map(validate_symbol).transpose()?,
            alert_type: alert_type.map(|t| t.as_str().to_string()),
            target_price: target_price.map(validate_target).transpose()?,
            message_template,
            is_active,
            is_one_time,
            is_triggered,
            last_triggered_at,
            telegram_config_id,
            updated_at: Some(Utc::now()),
        })
    }

    /// The change recorded when a one-time alert fires.
    pub fn triggered_at(at: DateTime<Utc>) -> Self {
        UpdatePriceAlert {
            is_triggered: Some(true),
            last_triggered_at: Some(Some(at)),
            updated_at: Some(at),
            ..Default::default()
        }
    }
}
