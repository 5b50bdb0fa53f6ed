// Ingestion pipeline: validate → store blob + metadata → extract → index


pub mod validate;

use std::path::Path;
use tracing::{info, warn};

use crate::database::sqlite::Database;
use crate::database::sqlite::models::{NewUploadedDocument, UploadedDocument};
use crate::extractor::TextExtractor;
use crate::indexer::{IndexBuilder, index_key};
use crate::uploads::UploadStore;

pub use validate::{MAX_UPLOAD_BYTES, PDF_CONTENT_TYPE, ValidationError, validate};

/// A file as submitted by the caller, alive for a single ingestion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawUpload {
    pub content_type: String,
    pub size_bytes: u64,
    pub name: String,
    pub bytes: Vec<u8>,
}

impl RawUpload {
    /// Build an upload from a local file, inferring the MIME type from the
    /// extension the way a browser form would.
    #[inline]
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let content_type = if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        {
            PDF_CONTENT_TYPE.to_string()
        } else {
            "application/octet-stream".to_string()
        };

        Ok(Self {
            content_type,
            size_bytes: bytes.len() as u64,
            name,
            bytes,
        })
    }
}

/// Terminal result of one ingestion run. Exactly one failure variant per
/// pipeline stage. Nothing is retried, and a failed stage leaves the writes
/// of earlier stages in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    Done {
        document: UploadedDocument,
        index_key: String,
    },
    RejectedInvalid {
        reason: String,
    },
    StorageFailed {
        detail: String,
    },
    ExtractionFailed {
        detail: String,
    },
    IndexingFailed {
        detail: String,
    },
}

impl IngestOutcome {
    #[inline]
    pub fn is_done(&self) -> bool {
        matches!(self, IngestOutcome::Done { .. })
    }
}

/// Orchestrates one upload through validation, storage, extraction, and
/// indexing. The stores are borrowed from the caller, so independent runs
/// can share them concurrently; a run holds no lock for its duration.
pub struct IngestPipeline<'a, E, B> {
    uploads: &'a UploadStore,
    database: &'a Database,
    extractor: &'a E,
    index_builder: &'a B,
}

impl<'a, E, B> IngestPipeline<'a, E, B>
where
    E: TextExtractor,
    B: IndexBuilder,
{
    #[inline]
    pub fn new(
        uploads: &'a UploadStore,
        database: &'a Database,
        extractor: &'a E,
        index_builder: &'a B,
    ) -> Self {
        Self {
            uploads,
            database,
            extractor,
            index_builder,
        }
    }

    /// Run one upload to a terminal outcome. Each stage's success is the
    /// precondition for the next; the first failure ends the run.
    #[inline]
    pub async fn ingest(&self, upload: RawUpload, owner_id: &str) -> IngestOutcome {
        if let Err(reason) = validate(&upload) {
            info!("Rejected upload {}: {}", upload.name, reason);
            return IngestOutcome::RejectedInvalid {
                reason: reason.to_string(),
            };
        }

        // Blob before metadata: a registry row must never point at a missing
        // blob. The reverse gap (blob without a row after a crash between
        // the two writes) is accepted.
        let stored_name = match self.uploads.save(&upload.name, &upload.bytes).await {
            Ok(name) => name,
            Err(e) => {
                warn!("Failed to store blob for {}: {}", upload.name, e);
                return IngestOutcome::StorageFailed {
                    detail: e.to_string(),
                };
            }
        };

        let document = match self
            .database
            .insert_document(NewUploadedDocument {
                owner_id: owner_id.to_string(),
                filename: stored_name.clone(),
            })
            .await
        {
            Ok(document) => document,
            Err(e) => {
                warn!("Failed to record metadata for {}: {:#}", stored_name, e);
                return IngestOutcome::StorageFailed {
                    detail: format!("{:#}", e),
                };
            }
        };

        let text = match self
            .extractor
            .extract(&self.uploads.path_for(&stored_name))
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to extract text from {}: {}", stored_name, e);
                return IngestOutcome::ExtractionFailed {
                    detail: e.to_string(),
                };
            }
        };

        let key = index_key(&stored_name);
        if let Err(e) = self.index_builder.build_and_persist(&text, &key).await {
            warn!("Failed to index {}: {}", stored_name, e);
            return IngestOutcome::IndexingFailed {
                detail: e.to_string(),
            };
        }

        info!(
            "Ingested {} for owner {} (document id {})",
            stored_name, owner_id, document.id
        );
        IngestOutcome::Done {
            document,
            index_key: key,
        }
    }
}
