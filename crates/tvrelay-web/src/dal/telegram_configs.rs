/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer for TelegramConfig operations.

use crate::dal::{DalError, DAL};
use diesel::prelude::*;
use tvrelay_models::models::{NewTelegramConfig, TelegramConfig, UpdateTelegramConfig};
use tvrelay_models::schema::{price_alerts, telegram_configs, tradingview_alerts};
use uuid::Uuid;

/// Data Access Layer for TelegramConfig operations.
pub struct TelegramConfigsDAL<'a> {
    /// Reference to the main DAL instance.
    pub dal: &'a DAL,
}

impl TelegramConfigsDAL<'_> {
    /// Creates a new Telegram config.
    pub fn create(&self, new_config: &NewTelegramConfig) -> Result<TelegramConfig, DalError> {
        let conn = &mut self.dal.conn()?;

        Ok(diesel::insert_into(telegram_configs::table)
            .values(new_config)
            .get_result(conn)?)
    }

    /// Gets a Telegram config by ID.
    pub fn get(&self, id: Uuid) -> Result<Option<TelegramConfig>, DalError> {
        let conn = &mut self.dal.conn()?;

        Ok(telegram_configs::table
            .filter(telegram_configs::id.eq(id))
            .first(conn)
            .optional()?)
    }

    /// Lists all Telegram configs, newest first.
    pub fn list(&self) -> Result<Vec<TelegramConfig>, DalError> {
        let conn = &mut self.dal.conn()?;

        Ok(telegram_configs::table
            .order(telegram_configs::created_at.desc())
            .load(conn)?)
    }

    /// Updates a Telegram config. Returns `None` for an unknown id.
    pub fn update(
        &self,
        id: Uuid,
        update: &UpdateTelegramConfig,
    ) -> Result<Option<TelegramConfig>, DalError> {
        let conn = &mut self.dal.conn()?;

        Ok(
            diesel::update(telegram_configs::table.filter(telegram_configs::id.eq(id)))
                .set(update)
                .get_result(conn)
                .optional()?,
        )
    }

    /// Counts webhook and price alerts pointing at a config.
    pub fn count_dependents(&self, id: Uuid) -> Result<(i64, i64), DalError> {
        let conn = &mut self.dal.conn()?;

        let webhooks = tradingview_alerts::table
            .filter(tradingview_alerts::telegram_config_id.eq(id))
            .count()
            .get_result(conn)?;
        let prices = price_alerts::table
            .filter(price_alerts::telegram_config_id.eq(id))
            .count()
            .get_result(conn)?;
        Ok((webhooks, prices))
    }

    /// Deletes a Telegram config.
    ///
    /// Fails with `DalError::InUse` while any webhook or price alert still uses
    /// it. Returns the number of deleted rows.
    pub fn delete(&self, id: Uuid) -> Result<usize, DalError> {
        let conn = &mut self.dal.conn()?;

        conn.transaction(|conn| {
            let webhooks: i64 = tradingview_alerts::table
                .filter(tradingview_alerts::telegram_config_id.eq(id))
                .count()
                .get_result(conn)?;
            let prices: i64 = price_alerts::table
                .filter(price_alerts::telegram_config_id.eq(id))
                .count()
                .get_result(conn)?;

            if webhooks + prices > 0 {
                return Err(DalError::InUse(format!(
                    "Cannot delete configuration with associated alerts ({} webhook, {} price)",
                    webhooks, prices
                )));
            }

            Ok(
                diesel::delete(telegram_configs::table.filter(telegram_configs::id.eq(id)))
                    .execute(conn)?,
            )
        })
    }
}
