/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer for PriceAlert operations.

use crate::dal::{DalError, DAL};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tvrelay_models::models::{NewPriceAlert, PriceAlert, UpdatePriceAlert};
use tvrelay_models::schema::price_alerts;
use uuid::Uuid;

/// Data Access Layer for PriceAlert operations.
pub struct PriceAlertsDAL<'a> {
    /// Reference to the main DAL instance.
    pub dal: &'a DAL,
}

impl PriceAlertsDAL<'_> {
    /// Creates a new price alert.
    pub fn create(&self, new_alert: &NewPriceAlert) -> Result<PriceAlert, DalError> {
        let conn = &mut self.dal.conn()?;

        Ok(diesel::insert_into(price_alerts::table)
            .values(new_alert)
            .get_result(conn)?)
    }

    /// Gets a price alert by ID.
    pub fn get(&self, id: Uuid) -> Result<Option<PriceAlert>, DalError> {
        let conn = &mut self.dal.conn()?;

        Ok(price_alerts::table
            .filter(price_alerts::id.eq(id))
            .first(conn)
            .optional()?)
    }

    /// Lists all price alerts, newest first.
    pub fn list(&self) -> Result<Vec<PriceAlert>, DalError> {
        let conn = &mut self.dal.conn()?;

        Ok(price_alerts::table
            .order(price_alerts::created_at.desc())
            .load(conn)?)
    }

    /// Lists the alerts the next price check should evaluate: active ones,
    /// minus one-time alerts that already fired.
    pub fn list_due(&self) -> Result<Vec<PriceAlert>, DalError> {
        let conn = &mut self.dal.conn()?;

        Ok(price_alerts::table
            .filter(price_alerts::is_active.eq(true))
            .filter(
                price_alerts::is_one_time
                    .eq(false)
                    .or(price_alerts::is_triggered.eq(false)),
            )
            .order((price_alerts::symbol.asc(), price_alerts::created_at.asc()))
            .load(conn)?)
    }

    /// Updates a price alert. Returns `None` for an unknown id.
    pub fn update(&self, id: Uuid, update: &UpdatePriceAlert) -> Result<Option<PriceAlert>, DalError> {
        let conn = &mut self.dal.conn()?;

        Ok(
            diesel::update(price_alerts::table.filter(price_alerts::id.eq(id)))
                .set(update)
                .get_result(conn)
                .optional()?,
        )
    }

    /// Records that an alert fired at `at`.
    pub fn mark_triggered(&self, id: Uuid, at: DateTime<Utc>) -> Result<Option<PriceAlert>, DalError> {
        self.update(id, &UpdatePriceAlert::triggered_at(at))
    }

    /// Deletes a price alert. Its log rows survive with a null reference.
    pub fn delete(&self, id: Uuid) -> Result<usize, DalError> {
        let conn = &mut self.dal.conn()?;

        Ok(diesel::delete(price_alerts::table.filter(price_alerts::id.eq(id))).execute(conn)?)
    }
}
