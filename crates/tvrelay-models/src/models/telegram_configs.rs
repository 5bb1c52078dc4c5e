/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Telegram Configs Module
//!
//! A Telegram config is a bot token plus the chat the bot posts into. Webhook
//! alerts and price alerts both point at one config; inactive configs stop
//! webhook deliveries for every alert bound to them.

use super::check_length;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const MAX_BOT_TOKEN_LENGTH: usize = 100;
pub const MAX_CHAT_ID_LENGTH: usize = 100;

/// Represents a Telegram target in the system.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone, Serialize, Deserialize, ToSchema)]
#[diesel(table_name = crate::schema::telegram_configs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TelegramConfig {
    /// Unique identifier for the config
    pub id: Uuid,
    /// Bot API token issued by BotFather
    pub bot_token: String,
    /// Chat (user, group or channel) that receives messages
    pub chat_id: String,
    /// Whether deliveries through this config are allowed
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TelegramConfig {
    /// The bot token with everything but its last four characters hidden.
    pub fn masked_token(&self) -> String {
        let visible: String = self
            .bot_token
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("****{}", visible)
    }
}

/// Represents a new Telegram config to be inserted into the database.
#[derive(Insertable, Debug, Clone, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::telegram_configs)]
pub struct NewTelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub is_active: bool,
}

impl NewTelegramConfig {
    /// Creates a new, active `NewTelegramConfig`.
    ///
    /// # Returns
    ///
    /// An error message if the bot token or chat id is empty.
    pub fn new(bot_token: String, chat_id: String) -> Result<Self, String> {
        let bot_token = bot_token.trim().to_string();
        let chat_id = chat_id.trim().to_string();

        if bot_token.is_empty() || chat_id.is_empty() {
            return Err("Bot token and chat ID are required".to_string());
        }
        check_length("Bot token", &bot_token, MAX_BOT_TOKEN_LENGTH)?;
        check_length("Chat ID", &chat_id, MAX_CHAT_ID_LENGTH)?;

        Ok(NewTelegramConfig {
            bot_token,
            chat_id,
            is_active: true,
        })
    }
}

/// Changes applied to an existing Telegram config. `None` leaves a column untouched.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::telegram_configs)]
pub struct UpdateTelegramConfig {
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub is_active: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

impl UpdateTelegramConfig {
    pub fn new(
        bot_token: Option<String>,
        chat_id: Option<String>,
        is_active: Option<bool>,
    ) -> Result<Self, String> {
        let bot_token = bot_token.map(|t| t.trim().to_string());
        let chat_id = chat_id.map(|c| c.trim().to_string());

        if bot_token.as_deref() == Some("") || chat_id.as_deref() == Some("") {
            return Err("Bot token and chat ID cannot be empty".to_string());
        }
        if let Some(token) = &bot_token {
            check_length("Bot token", token, MAX_BOT_TOKEN_LENGTH)?;
        }
        if let Some(chat) = &chat_id {
            check_length("Chat ID", chat, MAX_CHAT_ID_LENGTH)?;
        }

        Ok(UpdateTelegramConfig {
            bot_token,
            chat_id,
            is_active,
            updated_at: Utc::now(),
        })
    }
}
