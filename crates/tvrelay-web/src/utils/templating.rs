/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Tera rendering for alert message templates.
//!
//! Templates use `{{ variable }}` placeholders. Webhook templates see the
//! top-level keys of the TradingView payload; price templates see `symbol`,
//! `current_price`, `target_price`, `alert_type` and `name`.

use serde_json::Value;
use tera::{Context, Tera};

/// Error type for templating operations.
#[derive(Debug, Clone)]
pub struct TemplateError {
    pub message: String,
    pub details: Option<String>,
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}: {}", self.message, details),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for TemplateError {}

/// Validate template syntax without rendering.
///
/// ```
/// use tvrelay_web::utils::templating::validate_template;
///
/// assert!(validate_template("{{ ticker }} closed at {{ close }}").is_ok());
/// assert!(validate_template("{{ ticker").is_err());
/// ```
pub fn validate_template(template_content: &str) -> Result<(), TemplateError> {
    let mut tera = Tera::default();

    tera.add_raw_template("__validation__", template_content)
        .map_err(|e| TemplateError {
            message: "Invalid template syntax".to_string(),
            details: Some(error_chain(&e)),
        })?;

    Ok(())
}

/// Render a template against the top-level keys of `parameters`.
///
/// Non-object parameters produce an empty context. Autoescaping is off so
/// Telegram receives the text as written.
///
/// ```
/// use tvrelay_web::utils::templating::render_template;
/// use serde_json::json;
///
/// let out = render_template("{{ ticker }} @ {{ close }}", &json!({"ticker": "BTCUSD", "close": 64000.5}))
///     .unwrap();
/// assert_eq!(out, "BTCUSD @ 64000.5");
/// ```
pub fn render_template(template_content: &str, parameters: &Value) -> Result<String, TemplateError> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![]);

    tera.add_raw_template("message", template_content)
        .map_err(|e| TemplateError {
            message: "Template parse error".to_string(),
            details: Some(error_chain(&e)),
        })?;

    let mut context = Context::new();
    if let Value::Object(map) = parameters {
        for (key, value) in map {
            context.insert(key, value);
        }
    }

    tera.render("message", &context).map_err(|e| TemplateError {
        message: "Template rendering failed".to_string(),
        details: Some(error_chain(&e)),
    })
}

/// Tera nests the useful message in the error source chain.
fn error_chain(e: &tera::Error) -> String {
    let mut parts = vec![e.to_string()];
    let mut source = std::error::Error::source(e);
    while let Some(inner) = source {
        parts.push(inner.to_string());
        source = inner.source();
    }
    parts.join(": ")
}
