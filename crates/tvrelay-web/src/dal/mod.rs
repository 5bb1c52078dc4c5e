/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Data Access Layer.
//!
//! `DAL` owns the connection pool and hands out one accessor per table:
//!
//! ```rust,ignore
//! let alert = dal.tradingview_alerts().get_active_by_key(&key)?;
//! ```

use crate::db::ConnectionPool;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};

mod notification_logs;
mod price_alerts;
mod telegram_configs;
mod tradingview_alerts;

pub use notification_logs::{NotificationLogsDAL, Page};
pub use price_alerts::PriceAlertsDAL;
pub use telegram_configs::TelegramConfigsDAL;
pub use tradingview_alerts::TradingViewAlertsDAL;

/// Error returned by every DAL operation.
#[derive(Debug)]
pub enum DalError {
    /// No connection could be checked out of the pool
    Pool(r2d2::Error),
    /// The query itself failed
    Query(diesel::result::Error),
    /// The row is still referenced by other rows
    InUse(String),
}

impl std::fmt::Display for DalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DalError::Pool(e) => write!(f, "Database unavailable: {}", e),
            DalError::Query(e) => write!(f, "Query failed: {}", e),
            DalError::InUse(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for DalError {}

impl From<r2d2::Error> for DalError {
    fn from(e: r2d2::Error) -> Self {
        DalError::Pool(e)
    }
}

impl From<diesel::result::Error> for DalError {
    fn from(e: diesel::result::Error) -> Self {
        DalError::Query(e)
    }
}

impl DalError {
    /// Whether the error is a unique constraint violation.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            DalError::Query(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _
            ))
        )
    }

    /// Whether the error is a foreign key violation, e.g. an unknown Telegram config id.
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            DalError::Query(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                _
            ))
        )
    }
}

/// The main Data Access Layer struct.
#[derive(Clone)]
pub struct DAL {
    pub pool: ConnectionPool,
}

impl DAL {
    pub fn new(pool: ConnectionPool) -> Self {
        DAL { pool }
    }

    pub(crate) fn conn(
        &self,
    ) -> Result<PooledConnection<ConnectionManager<PgConnection>>, DalError> {
        Ok(self.pool.get()?)
    }

    /// Runs a trivial query to prove the database answers.
    pub fn ping(&self) -> Result<(), DalError> {
        let conn = &mut self.conn()?;
        diesel::sql_query("SELECT 1").execute(conn)?;
        Ok(())
    }

    pub fn telegram_configs(&self) -> TelegramConfigsDAL {
        TelegramConfigsDAL { dal: self }
    }

    pub fn tradingview_alerts(&self) -> TradingViewAlertsDAL {
        TradingViewAlertsDAL { dal: self }
    }

    pub fn price_alerts(&self) -> PriceAlertsDAL {
        PriceAlertsDAL { dal: self }
    }

    pub fn notification_logs(&self) -> NotificationLogsDAL {
        NotificationLogsDAL { dal: self }
    }
}
