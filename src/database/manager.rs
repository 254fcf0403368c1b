use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the storage backend
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database configuration: {0}")]
    Config(String),

    /// The backend could not be reached or no pooled connection freed up in time
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error("Query '{operation}' timed out after {elapsed:?}")]
    Timeout {
        operation: &'static str,
        elapsed: Duration,
    },

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => DatabaseError::Unavailable(err.to_string()),
            other => DatabaseError::Sqlx(other),
        }
    }
}

/// Connection options from `DATABASE_URL`, or from the individual DB_* parts
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, DatabaseError> {
    if let Some(url) = &config.url {
        return PgConnectOptions::from_str(url)
            .map_err(|e| DatabaseError::Config(format!("DATABASE_URL: {}", e)));
    }

    let mut options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .database(&config.name);
    if !config.password.is_empty() {
        options = options.password(&config.password);
    }
    Ok(options)
}

/// Build the bounded connection pool.
///
/// Connections are opened lazily, so the server starts even while the
/// backend is down; requests then fail with [`DatabaseError::Unavailable`].
/// A pooled connection goes back to the pool when dropped, which covers every
/// exit path of a query.
pub fn connect_pool(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let options = connect_options(config)?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect_lazy_with(options);

    info!(
        "Created database pool (max {} connections, acquire timeout {:?})",
        config.max_connections,
        config.acquire_timeout()
    );
    Ok(pool)
}
