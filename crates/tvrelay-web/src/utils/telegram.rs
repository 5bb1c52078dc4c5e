/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Telegram Bot API client.
//!
//! Messages are posted to `<api_base>/bot<token>/sendMessage` as
//! `{chat_id, text, parse_mode: "HTML"}`. Any non-200 answer is an error
//! carrying the status code and the response body.

use crate::metrics;
use serde::Serialize;
use std::time::{Duration, Instant};
use tvrelay_utils::config::Telegram;
use tvrelay_utils::logging::prelude::*;

/// Error returned when a message could not be delivered.
#[derive(Debug)]
pub enum TelegramError {
    /// The request never produced a response (DNS, TLS, timeout)
    Transport(String),
    /// Telegram answered with a non-200 status
    Api { status: u16, body: String },
}

impl std::fmt::Display for TelegramError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TelegramError::Transport(e) => write!(f, "Exception sending Telegram message: {}", e),
            TelegramError::Api { status, body } => write!(
                f,
                "Failed to send message to Telegram. Status code: {}, Response: {}",
                status, body
            ),
        }
    }
}

impl std::error::Error for TelegramError {}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

/// Client for the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    api_base: String,
    test_message: String,
}

impl TelegramClient {
    /// Creates a client from the `[telegram]` settings.
    pub fn new(settings: &Telegram) -> Result<Self, TelegramError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| TelegramError::Transport(e.to_string()))?;

        Ok(TelegramClient {
            http,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            test_message: settings.test_message.clone(),
        })
    }

    fn send_url(&self, bot_token: &str) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, bot_token)
    }

    /// Sends `text` to `chat_id` through the bot identified by `bot_token`.
    pub async fn send_message(
        &self,
        bot_token: &str,
        chat_id: &str,
        text: &str,
    ) -> Result<(), TelegramError> {
        debug!("Sending Telegram message to chat {}", chat_id);
        let started = Instant::now();

        let result = self.post(bot_token, chat_id, text).await;

        let status = if result.is_ok() { "success" } else { "failed" };
        metrics::record_telegram_send(status, started.elapsed().as_secs_f64());

        match &result {
            Ok(()) => info!("Message sent successfully to Telegram chat {}", chat_id),
            Err(e) => error!("{}", e),
        }
        result
    }

    async fn post(&self, bot_token: &str, chat_id: &str, text: &str) -> Result<(), TelegramError> {
        let response = self
            .http
            .post(self.send_url(bot_token))
            .json(&SendMessage {
                chat_id,
                text,
                parse_mode: "HTML",
            })
            .send()
            .await
            .map_err(|e| TelegramError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::OK {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(TelegramError::Api {
            status: status.as_u16(),
            body,
        })
    }

    /// Verifies a bot token / chat pair by sending the configured test message.
    pub async fn test_connection(&self, bot_token: &str, chat_id: &str) -> Result<(), TelegramError> {
        info!("Testing Telegram connection to chat {}", chat_id);
        self.send_message(bot_token, chat_id, &self.test_message).await
    }
}
