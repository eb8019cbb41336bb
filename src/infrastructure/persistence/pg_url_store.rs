//! PostgreSQL implementation of the URL store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{ShortCode, UrlMapping};
use crate::domain::repositories::{StoreError, UrlStore};

/// PostgreSQL store for URL mappings.
///
/// Relies on the `UNIQUE` constraint on `urls.code`; a violation on insert is
/// reported as [`StoreError::Duplicate`].
pub struct PgUrlStore {
    pool: Arc<PgPool>,
}

impl PgUrlStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations (creates the `urls` table if missing).
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(self.pool.as_ref()).await
    }
}

fn map_insert_error(e: sqlx::Error, code: &ShortCode) -> StoreError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return StoreError::Duplicate(code.to_string());
    }

    StoreError::Database(e)
}

#[async_trait]
impl UrlStore for PgUrlStore {
    async fn exists(&self, code: &ShortCode) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM urls WHERE code = $1)",
        )
        .bind(code.as_str())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn save(&self, code: &ShortCode, original_url: &str) -> Result<UrlMapping, StoreError> {
        let created_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            INSERT INTO urls (code, original_url)
            VALUES ($1, $2)
            RETURNING created_at
            "#,
        )
        .bind(code.as_str())
        .bind(original_url)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| map_insert_error(e, code))?;

        Ok(UrlMapping::new(
            code.clone(),
            original_url.to_owned(),
            created_at,
        ))
    }

    async fn resolve(&self, code: &ShortCode) -> Result<UrlMapping, StoreError> {
        let row = sqlx::query_as::<_, (String, DateTime<Utc>)>(
            "SELECT original_url, created_at FROM urls WHERE code = $1",
        )
        .bind(code.as_str())
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(|(original_url, created_at)| UrlMapping::new(code.clone(), original_url, created_at))
            .ok_or_else(|| StoreError::NotFound(code.to_string()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
