/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Market Price Client
//!
//! Fetches the latest price for a symbol.
//!
//! - With an Alpha Vantage key the `GLOBAL_QUOTE` function is used and the
//!   price is read from `"Global Quote"."05. price"`.
//! - Without a key the Yahoo Finance chart API is used and the price is read
//!   from `chart.result[0].meta.regularMarketPrice`. Yahoo rejects requests
//!   without a browser user agent.
//!
//! Any failure is reported as a `PriceError`; callers skip the symbol for the
//! current cycle.

use crate::metrics;
use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::{Duration, Instant};
use tvrelay_utils::config::Prices;
use tvrelay_utils::logging::prelude::*;

/// Where quotes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    AlphaVantage,
    Yahoo,
}

impl PriceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceSource::AlphaVantage => "alpha_vantage",
            PriceSource::Yahoo => "yahoo",
        }
    }
}

/// A price observation. Serialized as the notification log payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    pub symbol: String,
    pub price: f64,
    pub source: PriceSource,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug)]
pub enum PriceError {
    /// The request never produced a response
    Transport(String),
    /// The provider answered with a non-success status
    Status { status: u16, body: String },
    /// The response did not contain a usable price
    InvalidData(String),
}

impl fmt::Display for PriceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceError::Transport(e) => write!(f, "Price request failed: {}", e),
            PriceError::Status { status, body } => {
                write!(f, "Price provider returned {}: {}", status, body)
            }
            PriceError::InvalidData(e) => write!(f, "Invalid price data: {}", e),
        }
    }
}

impl std::error::Error for PriceError {}

impl From<reqwest::Error> for PriceError {
    fn from(e: reqwest::Error) -> Self {
        PriceError::Transport(e.to_string())
    }
}

/// Reads the price from an Alpha Vantage `GLOBAL_QUOTE` response.
///
/// Alpha Vantage reports rate limiting and unknown symbols with a 200 and a
/// body that lacks the quote, so a missing field is an error.
pub fn parse_alpha_vantage(body: &Value) -> Result<f64, PriceError> {
    let raw = body
        .get("Global Quote")
        .and_then(|q| q.get("05. price"))
        .ok_or_else(|| PriceError::InvalidData(format!("no Global Quote price in {}", body)))?;

    let price = match raw {
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| PriceError::InvalidData(format!("price '{}': {}", s, e)))?,
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| PriceError::InvalidData(format!("price {}", n)))?,
        other => return Err(PriceError::InvalidData(format!("price {}", other))),
    };
    finite(price)
}

/// Reads the price from a Yahoo Finance chart response.
pub fn parse_yahoo(body: &Value) -> Result<f64, PriceError> {
    let price = body
        .pointer("/chart/result/0/meta/regularMarketPrice")
        .and_then(Value::as_f64)
        .ok_or_else(|| PriceError::InvalidData("no regularMarketPrice in chart result".into()))?;
    finite(price)
}

fn finite(price: f64) -> Result<f64, PriceError> {
    if price.is_finite() {
        Ok(price)
    } else {
        Err(PriceError::InvalidData(format!("price {} is not finite", price)))
    }
}

/// HTTP client for market prices.
#[derive(Clone)]
pub struct PriceClient {
    http: Client,
    api_key: Option<String>,
    alpha_vantage_url: String,
    yahoo_chart_url: String,
    user_agent: String,
}

impl PriceClient {
    pub fn new(settings: &Prices) -> Result<Self, PriceError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(PriceClient {
            http,
            api_key: settings.api_key().map(str::to_string),
            alpha_vantage_url: settings.alpha_vantage_url.clone(),
            yahoo_chart_url: settings.yahoo_chart_url.trim_end_matches('/').to_string(),
            user_agent: settings.user_agent.clone(),
        })
    }

    /// Provider used for every quote.
    pub fn source(&self) -> PriceSource {
        if self.api_key.is_some() {
            PriceSource::AlphaVantage
        } else {
            PriceSource::Yahoo
        }
    }

    /// Fetches the latest price for `symbol`.
    pub async fn quote(&self, symbol: &str) -> Result<PriceQuote, PriceError> {
        let source = self.source();
        let started = Instant::now();

        let result = match source {
            PriceSource::AlphaVantage => self.alpha_vantage(symbol).await,
            PriceSource::Yahoo => self.yahoo(symbol).await,
        };
        metrics::record_quote(
            source.as_str(),
            if result.is_ok() { "success" } else { "error" },
            started.elapsed().as_secs_f64(),
        );

        let price = result?;
        debug!("Quote for {} from {}: {}", symbol, source.as_str(), price);
        Ok(PriceQuote {
            symbol: symbol.to_string(),
            price,
            source,
            timestamp: Utc::now(),
        })
    }

    async fn alpha_vantage(&self, symbol: &str) -> Result<f64, PriceError> {
        let api_key = self.api_key.as_deref().unwrap_or_default();
        let response = self
            .http
            .get(&self.alpha_vantage_url)
            .query(&[
                ("function", "GLOBAL_QUOTE"),
                ("symbol", symbol),
                ("apikey", api_key),
            ])
            .send()
            .await?;

        parse_alpha_vantage(&Self::json_body(response).await?)
    }

    async fn yahoo(&self, symbol: &str) -> Result<f64, PriceError> {
        let mut url = Url::parse(&self.yahoo_chart_url)
            .map_err(|e| PriceError::Transport(format!("invalid chart URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| PriceError::Transport("chart URL cannot take a path".into()))?
            .push(symbol);

        let response = self
            .http
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        parse_yahoo(&Self::json_body(response).await?)
    }

    async fn json_body(response: reqwest::Response) -> Result<Value, PriceError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PriceError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json::<Value>()
            .await
            .map_err(|e| PriceError::InvalidData(e.to_string()))
    }
}
