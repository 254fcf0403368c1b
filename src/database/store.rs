use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{PgPool, Postgres, Row};
use tracing::warn;

use crate::config::DatabaseConfig;
use crate::database::manager::DatabaseError;
use crate::database::models::Square;
use crate::input::SquareInput;

/// Storage backend for squares. Every method maps to exactly one statement.
#[async_trait]
pub trait SquareStore: Send + Sync {
    /// Insert a square, returning the id the backend assigned
    async fn create(&self, input: &SquareInput) -> Result<i64, DatabaseError>;

    async fn list(&self) -> Result<Vec<Square>, DatabaseError>;

    async fn find(&self, id: i64) -> Result<Option<Square>, DatabaseError>;

    /// Overwrite all fields of a square. `false` when no square has this id.
    async fn update(&self, id: i64, input: &SquareInput) -> Result<bool, DatabaseError>;

    /// Hard delete. `false` when no square has this id.
    async fn delete(&self, id: i64) -> Result<bool, DatabaseError>;

    /// Round-trip to the backend
    async fn ping(&self) -> Result<(), DatabaseError>;
}

const SELECT_SQL: &str = r#"
    SELECT id, title, plane, purpose, delineator, notations, details, "extraData",
           "class", parent, depth, name, size, color, "type", parent_id
    FROM squares
"#;

const SELECT_BY_ID_SQL: &str = r#"
    SELECT id, title, plane, purpose, delineator, notations, details, "extraData",
           "class", parent, depth, name, size, color, "type", parent_id
    FROM squares
    WHERE id = $1
"#;

const INSERT_SQL: &str = r#"
    INSERT INTO squares (title, plane, purpose, delineator, notations, details, "extraData",
                         "class", parent, depth, name, size, color, "type", parent_id)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
    RETURNING id
"#;

const UPDATE_SQL: &str = r#"
    UPDATE squares
    SET title = $1, plane = $2, purpose = $3, delineator = $4, notations = $5, details = $6,
        "extraData" = $7, "class" = $8, parent = $9, depth = $10, name = $11, size = $12,
        color = $13, "type" = $14, parent_id = $15
    WHERE id = $16
"#;

const DELETE_SQL: &str = "DELETE FROM squares WHERE id = $1";

/// [`SquareStore`] over a PostgreSQL connection pool
#[derive(Clone)]
pub struct PgSquareStore {
    pool: PgPool,
    query_timeout: Duration,
    slow_query_threshold: Option<Duration>,
}

impl PgSquareStore {
    pub fn new(pool: PgPool, config: &DatabaseConfig) -> Self {
        Self {
            pool,
            query_timeout: config.query_timeout(),
            slow_query_threshold: config.slow_query_threshold(),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run one statement under the query timeout, warning when it runs slow
    async fn timed<T, F>(&self, operation: &'static str, query: F) -> Result<T, DatabaseError>
    where
        F: Future<Output = Result<T, sqlx::Error>> + Send,
    {
        let started = Instant::now();
        let result = tokio::time::timeout(self.query_timeout, query)
            .await
            .map_err(|_| DatabaseError::Timeout {
                operation,
                elapsed: started.elapsed(),
            })?;

        let elapsed = started.elapsed();
        if let Some(threshold) = self.slow_query_threshold {
            if elapsed > threshold {
                warn!(operation, ?elapsed, "Slow query");
            }
        }

        result.map_err(DatabaseError::from)
    }
}

/// Bind the 15 data fields in column order ($1..$15)
fn bind_input<'q>(
    query: Query<'q, Postgres, PgArguments>,
    input: &'q SquareInput,
) -> Query<'q, Postgres, PgArguments> {
    query
        .bind(&input.title)
        .bind(&input.plane)
        .bind(&input.purpose)
        .bind(&input.delineator)
        .bind(&input.notations)
        .bind(&input.details)
        .bind(&input.extra_data)
        .bind(&input.class)
        .bind(&input.parent)
        .bind(input.depth)
        .bind(&input.name)
        .bind(input.size)
        .bind(&input.color)
        .bind(&input.kind)
        .bind(input.parent_id)
}

#[async_trait]
impl SquareStore for PgSquareStore {
    async fn create(&self, input: &SquareInput) -> Result<i64, DatabaseError> {
        let query = bind_input(sqlx::query(INSERT_SQL), input);
        let row = self.timed("create", query.fetch_one(&self.pool)).await?;
        let id: i64 = row.try_get("id")?;
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<Square>, DatabaseError> {
        let query = sqlx::query_as::<_, Square>(SELECT_SQL);
        self.timed("list", query.fetch_all(&self.pool)).await
    }

    async fn find(&self, id: i64) -> Result<Option<Square>, DatabaseError> {
        let query = sqlx::query_as::<_, Square>(SELECT_BY_ID_SQL).bind(id);
        self.timed("find", query.fetch_optional(&self.pool)).await
    }

    async fn update(&self, id: i64, input: &SquareInput) -> Result<bool, DatabaseError> {
        let query = bind_input(sqlx::query(UPDATE_SQL), input).bind(id);
        let result = self.timed("update", query.execute(&self.pool)).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let query = sqlx::query(DELETE_SQL).bind(id);
        let result = self.timed("delete", query.execute(&self.pool)).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.timed("ping", sqlx::query("SELECT 1").execute(&self.pool))
            .await
            .map(|_| ())
    }
}
