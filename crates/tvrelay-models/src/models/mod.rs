//! Data models for our application to interact with
pub mod notification_logs;
pub mod price_alerts;
pub mod telegram_configs;
pub mod tradingview_alerts;

pub use notification_logs::{AlertRef, NewNotificationLog, NotificationLog, NotificationLogFilter};
pub use price_alerts::{AlertType, NewPriceAlert, PriceAlert, UpdatePriceAlert};
pub use telegram_configs::{NewTelegramConfig, TelegramConfig, UpdateTelegramConfig};
pub use tradingview_alerts::{NewTradingViewAlert, TradingViewAlert, UpdateTradingViewAlert};

/// Longest alert name the schema stores.
pub const MAX_NAME_LENGTH: usize = 100;

/// Rejects values longer than the `VARCHAR(max)` column they are stored in.
pub(crate) fn check_length(field: &str, value: &str, max: usize) -> Result<(), String> {
    if value.chars().count() > max {
        return Err(format!("{} cannot be longer than {} characters", field, max));
    }
    Ok(())
}
