
use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use super::models::{NewUploadedDocument, UploadedDocument};

pub struct DocumentQueries;

impl DocumentQueries {
    /// Append a registry row. The id and timestamp are assigned here, by the
    /// store, never by the caller.
    #[inline]
    pub async fn insert(
        pool: &SqlitePool,
        new_document: NewUploadedDocument,
    ) -> Result<UploadedDocument> {
        let now = Utc::now().naive_utc();
        let id = sqlx::query(
            "INSERT INTO users_documents (owner_id, filename, uploaded_at) VALUES (?, ?, ?)",
        )
        .bind(&new_document.owner_id)
        .bind(&new_document.filename)
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to insert document record")?
        .last_insert_rowid();

        debug!("Inserted document record {}", id);

        Self::get_by_id(pool, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve inserted document"))
    }

    #[inline]
    pub async fn get_by_id(pool: &SqlitePool, id: i64) -> Result<Option<UploadedDocument>> {
        sqlx::query_as::<_, UploadedDocument>(
            "SELECT id, owner_id, filename, uploaded_at FROM users_documents WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("Failed to get document by id")
    }

    #[inline]
    pub async fn list_by_owner(
        pool: &SqlitePool,
        owner_id: &str,
    ) -> Result<Vec<UploadedDocument>> {
        sqlx::query_as::<_, UploadedDocument>(
            "SELECT id, owner_id, filename, uploaded_at FROM users_documents \
             WHERE owner_id = ? ORDER BY id",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
        .context("Failed to list documents by owner")
    }

    #[inline]
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<UploadedDocument>> {
        sqlx::query_as::<_, UploadedDocument>(
            "SELECT id, owner_id, filename, uploaded_at FROM users_documents ORDER BY id",
        )
        .fetch_all(pool)
        .await
        .context("Failed to list documents")
    }

    #[inline]
    pub async fn count(pool: &SqlitePool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users_documents")
            .fetch_one(pool)
            .await
            .context("Failed to count documents")?;

        Ok(count)
    }
}
