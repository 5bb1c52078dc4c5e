/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer for TradingViewAlert operations.

use crate::dal::{DalError, DAL};
use diesel::prelude::*;
use tvrelay_models::models::{NewTradingViewAlert, TradingViewAlert, UpdateTradingViewAlert};
use tvrelay_models::schema::tradingview_alerts;
use uuid::Uuid;

/// Data Access Layer for TradingViewAlert operations.
pub struct TradingViewAlertsDAL<'a> {
    /// Reference to the main DAL instance.
    pub dal: &'a DAL,
}

impl TradingViewAlertsDAL<'_> {
    /// Creates a new webhook alert.
    pub fn create(&self, new_alert: &NewTradingViewAlert) -> Result<TradingViewAlert, DalError> {
        let conn = &mut self.dal.conn()?;

        Ok(diesel::insert_into(tradingview_alerts::table)
            .values(new_alert)
            .get_result(conn)?)
    }

    /// Gets a webhook alert by ID.
    pub fn get(&self, id: Uuid) -> Result<Option<TradingViewAlert>, DalError> {
        let conn = &mut self.dal.conn()?;

        Ok(tradingview_alerts::table
            .filter(tradingview_alerts::id.eq(id))
            .first(conn)
            .optional()?)
    }

    /// Resolves a webhook key to its alert. Inactive alerts are not returned.
    pub fn get_active_by_key(&self, webhook_key: &str) -> Result<Option<TradingViewAlert>, DalError> {
        let conn = &mut self.dal.conn()?;

        Ok(tradingview_alerts::table
            .filter(tradingview_alerts::webhook_key.eq(webhook_key))
            .filter(tradingview_alerts::is_active.eq(true))
            .first(conn)
            .optional()?)
    }

    /// Whether any alert already uses the key.
    pub fn key_exists(&self, webhook_key: &str) -> Result<bool, DalError> {
        let conn = &mut self.dal.conn()?;

        Ok(diesel::select(diesel::dsl::exists(
            tradingview_alerts::table.filter(tradingview_alerts::webhook_key.eq(webhook_key)),
        ))
        .get_result(conn)?)
    }

    /// Lists all webhook alerts, newest first.
    pub fn list(&self) -> Result<Vec<TradingViewAlert>, DalError> {
        let conn = &mut self.dal.conn()?;

        Ok(tradingview_alerts::table
            .order(tradingview_alerts::created_at.desc())
            .load(conn)?)
    }

    /// Updates a webhook alert. Returns `None` for an unknown id.
    pub fn update(
        &self,
        id: Uuid,
        update: &UpdateTradingViewAlert,
    ) -> Result<Option<TradingViewAlert>, DalError> {
        let conn = &mut self.dal.conn()?;

        Ok(
            diesel::update(tradingview_alerts::table.filter(tradingview_alerts::id.eq(id)))
                .set(update)
                .get_result(conn)
                .optional()?,
        )
    }

    /// Replaces the webhook key of an alert.
    pub fn rotate_key(
        &self,
        id: Uuid,
        webhook_key: String,
    ) -> Result<Option<TradingViewAlert>, DalError> {
        self.update(id, &UpdateTradingViewAlert::rotate_key(webhook_key))
    }

    /// Deletes a webhook alert. Its log rows survive with a null reference.
    pub fn delete(&self, id: Uuid) -> Result<usize, DalError> {
        let conn = &mut self.dal.conn()?;

        Ok(
            diesel::delete(tradingview_alerts::table.filter(tradingview_alerts::id.eq(id)))
                .execute(conn)?,
        )
    }
}
