
pub mod models;
pub mod queries;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use tracing::debug;

use crate::database::sqlite::models::{NewUploadedDocument, UploadedDocument};
use crate::database::sqlite::queries::DocumentQueries;

pub type DbPool = Pool<Sqlite>;

/// Registry bootstrap statement. `IF NOT EXISTS` keeps it safe to run on
/// every process start. The CHECK constraints hold the invariant that owner
/// and filename are always present on a row.
const CREATE_DOCUMENTS_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS users_documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id TEXT NOT NULL CHECK (owner_id <> ''),
    filename TEXT NOT NULL CHECK (filename <> ''),
    uploaded_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

/// Durable registry of uploaded documents, backed by SQLite. Concurrent
/// inserts are serialized by SQLite's single-row write atomicity; no
/// application-level locking sits on top.
#[derive(Debug, Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    #[inline]
    pub async fn new<P: AsRef<Path>>(database_path: P) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
            .context("Failed to create database connection pool")?;

        let database = Self { pool };
        database.ensure_schema().await?;

        Ok(database)
    }

    #[inline]
    pub async fn initialize_from_data_dir(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir).with_context(|| {
            format!("Failed to create data directory: {}", data_dir.display())
        })?;

        Self::new(data_dir.join("documents.db")).await
    }

    #[inline]
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Create the registry table if it is missing. Idempotent.
    #[inline]
    pub async fn ensure_schema(&self) -> Result<()> {
        debug!("Ensuring document registry schema");

        sqlx::query(CREATE_DOCUMENTS_TABLE)
            .execute(&self.pool)
            .await
            .context("Failed to create users_documents table")?;

        Ok(())
    }

    #[inline]
    pub async fn insert_document(
        &self,
        new_document: NewUploadedDocument,
    ) -> Result<UploadedDocument> {
        DocumentQueries::insert(&self.pool, new_document).await
    }

    #[inline]
    pub async fn list_documents_by_owner(&self, owner_id: &str) -> Result<Vec<UploadedDocument>> {
        DocumentQueries::list_by_owner(&self.pool, owner_id).await
    }

    #[inline]
    pub async fn list_documents(&self) -> Result<Vec<UploadedDocument>> {
        DocumentQueries::list_all(&self.pool).await
    }

    #[inline]
    pub async fn count_documents(&self) -> Result<i64> {
        DocumentQueries::count(&self.pool).await
    }
}
