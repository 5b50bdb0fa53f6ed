
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered upload. The registry is append-only: rows are inserted once
/// with a store-assigned id and timestamp, and never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UploadedDocument {
    pub id: i64,
    pub owner_id: String,
    pub filename: String,
    pub uploaded_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUploadedDocument {
    pub owner_id: String,
    pub filename: String,
}
