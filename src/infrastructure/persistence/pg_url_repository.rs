//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{UpsertOutcome, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::StoreError;

/// PostgreSQL repository backed by the `url_map` table.
///
/// Uses SQLx prepared statements for SQL injection protection. The `id`
/// primary key is what rejects a second insert of the same code.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UrlRecordRow {
    id: String,
    redirect_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UrlRecordRow> for UrlRecord {
    fn from(row: UrlRecordRow) -> Self {
        UrlRecord {
            id: row.id,
            redirect_url: row.redirect_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<UrlRecord>, StoreError> {
        let row = sqlx::query_as::<_, UrlRecordRow>(
            r#"
            SELECT id, redirect_url, created_at, updated_at
            FROM url_map
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn insert(&self, record: UrlRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO url_map (id, redirect_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(record.id)
        .bind(record.redirect_url)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn touch(&self, id: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE url_map
            SET updated_at = GREATEST(updated_at, $1)
            WHERE id = $2
            "#,
        )
        .bind(at)
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn upsert(&self, record: UrlRecord) -> Result<UpsertOutcome, StoreError> {
        // xmax is 0 only for a row version created by this statement's insert.
        let inserted: bool = sqlx::query_scalar(
            r#"
            INSERT INTO url_map (id, redirect_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET updated_at = GREATEST(url_map.updated_at, EXCLUDED.updated_at)
            RETURNING (xmax = 0) AS inserted
            "#,
        )
        .bind(record.id)
        .bind(record.redirect_url)
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(if inserted {
            UpsertOutcome::Created
        } else {
            UpsertOutcome::Refreshed
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}
