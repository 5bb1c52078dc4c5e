/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer for NotificationLog operations.
//!
//! Logs are append-only apart from retention cleanup.

use crate::dal::{DalError, DAL};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use tvrelay_models::models::{NewNotificationLog, NotificationLog, NotificationLogFilter};
use tvrelay_models::schema::notification_logs;

/// One page of results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Total rows matching the filter
    pub total: i64,
    /// 1-based page number
    pub page: i64,
    pub per_page: i64,
    pub pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, per_page: i64) -> Self {
        let pages = if per_page > 0 {
            total / per_page + i64::from(total % per_page != 0)
        } else {
            0
        };
        Page {
            items,
            total,
            page,
            per_page,
            pages,
        }
    }
}

/// Data Access Layer for NotificationLog operations.
pub struct NotificationLogsDAL<'a> {
    /// Reference to the main DAL instance.
    pub dal: &'a DAL,
}

impl NotificationLogsDAL<'_> {
    /// Records a delivery attempt.
    pub fn create(&self, new_log: &NewNotificationLog) -> Result<NotificationLog, DalError> {
        let conn = &mut self.dal.conn()?;

        Ok(diesel::insert_into(notification_logs::table)
            .values(new_log)
            .get_result(conn)?)
    }

    /// The most recent `limit` log rows.
    pub fn recent(&self, limit: i64) -> Result<Vec<NotificationLog>, DalError> {
        let conn = &mut self.dal.conn()?;

        Ok(notification_logs::table
            .order(notification_logs::created_at.desc())
            .limit(limit)
            .load(conn)?)
    }

    /// Lists log rows newest first, filtered and paginated.
    ///
    /// Pages past the end come back empty rather than failing.
    pub fn list(
        &self,
        filter: &NotificationLogFilter,
        page: i64,
        per_page: i64,
    ) -> Result<Page<NotificationLog>, DalError> {
        let conn = &mut self.dal.conn()?;
        let page = page.max(1);
        let per_page = per_page.max(1);

        let total = filtered(filter).count().get_result(conn)?;
        let items = filtered(filter)
            .order(notification_logs::created_at.desc())
            .offset(page_offset(page, per_page))
            .limit(per_page)
            .load(conn)?;

        Ok(Page::new(items, total, page, per_page))
    }

    /// Deletes rows created before `cutoff`. Returns the number of deleted rows.
    pub fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, DalError> {
        let conn = &mut self.dal.conn()?;

        Ok(
            diesel::delete(notification_logs::table.filter(notification_logs::created_at.lt(cutoff)))
                .execute(conn)?,
        )
    }
}

/// Rows skipped before `page`. Saturates so absurd pages come back empty.
fn page_offset(page: i64, per_page: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(per_page.max(1))
}

fn filtered(filter: &NotificationLogFilter) -> notification_logs::BoxedQuery<'static, diesel::pg::Pg> {
    let mut query = notification_logs::table.into_boxed();

    if let Some(alert_id) = filter.alert_id {
        query = query.filter(notification_logs::alert_id.eq(alert_id));
    }
    if let Some(price_alert_id) = filter.price_alert_id {
        query = query.filter(notification_logs::price_alert_id.eq(price_alert_id));
    }
    if let Some(status) = filter.status.clone() {
        query = query.filter(notification_logs::status.eq(status));
    }

    query
}
