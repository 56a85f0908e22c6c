//! Durable storage for advertisements: table DDL plus CRUD and search
//! against PostgreSQL.

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Duration;

use crate::error::AppError;
use crate::model::{Advertisement, NewAdvertisement, SearchFilters, UpdateAdvertisement};

const COLUMNS: &str = "id, title, description, price, author, created_at";

/// Connect with bounded exponential backoff so the service can come up
/// while the database container is still starting.
pub async fn connect_with_retry(url: &str) -> Result<PgPool, sqlx::Error> {
    const MAX_ATTEMPTS: u32 = 5;
    let mut delay = Duration::from_millis(500);
    let mut attempt = 1u32;
    loop {
        match PgPoolOptions::new().max_connections(5).connect(url).await {
            Ok(pool) => return Ok(pool),
            Err(e) if attempt < MAX_ATTEMPTS => {
                tracing::warn!(error = %e, attempt, delay_ms = delay.as_millis() as u64, "database not ready, retrying");
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Resource store for `advertisements`. Holds the pool; constructed once in
/// `main` and injected through `AppState`.
#[derive(Clone)]
pub struct AdvertisementStore {
    pool: PgPool,
}

impl AdvertisementStore {
    pub fn new(pool: PgPool) -> Self {
        AdvertisementStore { pool }
    }

    /// Connectivity check, used by the status probe.
    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Create the `advertisements` table if absent. Called before the
    /// listener binds, and again by the status probe.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS advertisements (
                id SERIAL PRIMARY KEY,
                title VARCHAR(200) NOT NULL,
                description TEXT,
                price DOUBLE PRECISION NOT NULL,
                author VARCHAR(100) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Insert one row; id and created_at are assigned by the database.
    pub async fn insert(&self, new: &NewAdvertisement) -> Result<Advertisement, AppError> {
        let row = sqlx::query_as::<_, Advertisement>(&format!(
            "INSERT INTO advertisements (title, description, price, author) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            COLUMNS
        ))
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.price)
        .bind(&new.author)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Advertisement>, AppError> {
        let row = sqlx::query_as::<_, Advertisement>(&format!(
            "SELECT {} FROM advertisements WHERE id = $1",
            COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Overwrite exactly the supplied fields. `None` if the id is absent.
    /// An empty field set performs no write and returns the current row.
    pub async fn update_fields(
        &self,
        id: i32,
        update: &UpdateAdvertisement,
    ) -> Result<Option<Advertisement>, AppError> {
        if update.is_empty() {
            return self.find_by_id(id).await;
        }
        let mut qb = update_query(id, update);
        tracing::debug!(sql = qb.sql(), "update");
        let row = qb
            .build_query_as::<Advertisement>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Remove the row permanently. Returns whether a row was deleted.
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM advertisements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Search with OR-combined predicates; no filters returns every row in
    /// storage order.
    pub async fn search(&self, filters: &SearchFilters) -> Result<Vec<Advertisement>, AppError> {
        let mut qb = search_query(filters);
        tracing::debug!(sql = qb.sql(), "search");
        let rows = qb
            .build_query_as::<Advertisement>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

/// Every supplied predicate becomes one clause, all joined with OR.
/// Wildcard characters in the needle are passed through to ILIKE unescaped.
fn search_query(filters: &SearchFilters) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM advertisements", COLUMNS));
    if filters.is_empty() {
        return qb;
    }
    qb.push(" WHERE ");
    let mut clause = qb.separated(" OR ");
    if let Some(title) = &filters.title {
        clause.push("title ILIKE ");
        clause.push_bind_unseparated(format!("%{}%", title));
    }
    if let Some(description) = &filters.description {
        clause.push("description ILIKE ");
        clause.push_bind_unseparated(format!("%{}%", description));
    }
    if let Some(author) = &filters.author {
        clause.push("author ILIKE ");
        clause.push_bind_unseparated(format!("%{}%", author));
    }
    if let Some(min) = filters.min_price {
        clause.push("price >= ");
        clause.push_bind_unseparated(min);
    }
    if let Some(max) = filters.max_price {
        clause.push("price <= ");
        clause.push_bind_unseparated(max);
    }
    qb
}

fn update_query(id: i32, update: &UpdateAdvertisement) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE advertisements SET ");
    let mut assignments = qb.separated(", ");
    if let Some(title) = &update.title {
        assignments.push("title = ");
        assignments.push_bind_unseparated(title.clone());
    }
    if let Some(description) = &update.description {
        assignments.push("description = ");
        assignments.push_bind_unseparated(description.clone());
    }
    if let Some(price) = update.price {
        assignments.push("price = ");
        assignments.push_bind_unseparated(price);
    }
    if let Some(author) = &update.author {
        assignments.push("author = ");
        assignments.push_bind_unseparated(author.clone());
    }
    qb.push(" WHERE id = ");
    qb.push_bind(id);
    qb.push(format!(" RETURNING {}", COLUMNS));
    qb
}
