/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! Database connection pool management using diesel and r2d2.

use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::PgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;
use url::Url;

/// Embedded migrations for the relay tables.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../tvrelay-models/migrations");

/// Seconds a caller waits for a free connection before giving up.
const CONNECTION_TIMEOUT_SECONDS: u64 = 5;

/// Represents a pool of PostgreSQL database connections.
#[derive(Clone)]
pub struct ConnectionPool {
    /// The actual connection pool.
    pub pool: Pool<ConnectionManager<PgConnection>>,
}

/// Error raised while preparing the database.
#[derive(Debug)]
pub enum DbError {
    /// The connection URL could not be parsed
    InvalidUrl(String),
    /// No connection could be checked out
    Pool(r2d2::Error),
    /// Applying migrations failed
    Migration(String),
}

impl std::fmt::Display for DbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbError::InvalidUrl(e) => write!(f, "Invalid database URL: {}", e),
            DbError::Pool(e) => write!(f, "Connection pool error: {}", e),
            DbError::Migration(e) => write!(f, "Migration error: {}", e),
        }
    }
}

impl std::error::Error for DbError {}

impl From<r2d2::Error> for DbError {
    fn from(e: r2d2::Error) -> Self {
        DbError::Pool(e)
    }
}

/// Creates a shared connection pool for a PostgreSQL database.
///
/// The pool connects lazily, so a process can start (and answer liveness
/// probes) before the database is reachable.
///
/// # Arguments
///
/// * `database_url` - Full connection string, as injected by the platform
/// * `max_size` - The maximum number of connections the pool should maintain
pub fn create_shared_connection_pool(
    database_url: &str,
    max_size: u32,
) -> Result<ConnectionPool, DbError> {
    let url = Url::parse(database_url).map_err(|e| DbError::InvalidUrl(e.to_string()))?;
    if !matches!(url.scheme(), "postgres" | "postgresql") {
        return Err(DbError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            url.scheme()
        )));
    }

    let manager = ConnectionManager::<PgConnection>::new(url.as_str());
    let pool = Pool::builder()
        .max_size(max_size.max(1))
        .min_idle(Some(0))
        .connection_timeout(Duration::from_secs(CONNECTION_TIMEOUT_SECONDS))
        .build_unchecked(manager);

    Ok(ConnectionPool { pool })
}

impl ConnectionPool {
    /// Gets a connection from the pool.
    pub fn get(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, r2d2::Error> {
        self.pool.get()
    }

    /// Applies every pending embedded migration.
    pub fn run_migrations(&self) -> Result<usize, DbError> {
        let mut conn = self.get()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::Migration(e.to_string()))?;
        Ok(applied.len())
    }
}
