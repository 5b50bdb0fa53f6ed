//! End-to-end ingestion scenarios driven through the public API, with the
//! external capabilities (PDF parsing, embedding service) replaced by stubs.

use async_trait::async_trait;
use doc_ingest::database::sqlite::Database;
use doc_ingest::extractor::{ExtractionError, TextExtractor};
use doc_ingest::indexer::{IndexBuilder, IndexError};
use doc_ingest::pipeline::{IngestOutcome, IngestPipeline, PDF_CONTENT_TYPE, RawUpload};
use doc_ingest::uploads::UploadStore;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct StubExtractor {
    text: String,
}

#[async_trait]
impl TextExtractor for StubExtractor {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        if !path.exists() {
            return Err(ExtractionError::NotFound(path.display().to_string()));
        }
        Ok(self.text.clone())
    }
}

/// Index builder that mirrors the production one's layout by creating a
/// directory per key, without requiring an embedding server.
struct DirectoryIndexBuilder {
    indexes_dir: PathBuf,
}

impl DirectoryIndexBuilder {
    fn new(indexes_dir: PathBuf) -> Self {
        Self { indexes_dir }
    }
}

#[async_trait]
impl IndexBuilder for DirectoryIndexBuilder {
    async fn build_and_persist(&self, text: &str, index_key: &str) -> Result<(), IndexError> {
        if text.trim().is_empty() {
            return Err(IndexError::EmptyText);
        }
        std::fs::create_dir_all(self.indexes_dir.join(index_key))
            .map_err(|e| IndexError::Store(e.to_string()))?;
        Ok(())
    }
}

struct Harness {
    _temp_dir: TempDir,
    uploads: UploadStore,
    database: Database,
    indexes_dir: PathBuf,
}

async fn harness() -> Harness {
    let temp_dir = TempDir::new().expect("can create temp dir");
    let database = Database::initialize_from_data_dir(temp_dir.path())
        .await
        .expect("can initialize database");
    let uploads = UploadStore::new(temp_dir.path().join("uploads"));
    let indexes_dir = temp_dir.path().join("indexes");
    Harness {
        _temp_dir: temp_dir,
        uploads,
        database,
        indexes_dir,
    }
}

fn upload(name: &str, content_type: &str, size_bytes: u64) -> RawUpload {
    RawUpload {
        content_type: content_type.to_string(),
        size_bytes,
        name: name.to_string(),
        bytes: vec![0x25; size_bytes.min(4096) as usize],
    }
}

#[tokio::test]
async fn valid_pdf_flows_through_to_a_persisted_index() {
    let h = harness().await;
    let extractor = StubExtractor {
        text: "Quarterly results...".to_string(),
    };
    let builder = DirectoryIndexBuilder::new(h.indexes_dir.clone());
    let pipeline = IngestPipeline::new(&h.uploads, &h.database, &extractor, &builder);

    let outcome = pipeline
        .ingest(upload("report.pdf", PDF_CONTENT_TYPE, 2048), "u1")
        .await;

    assert!(outcome.is_done(), "expected Done, got {:?}", outcome);

    let documents = h
        .database
        .list_documents_by_owner("u1")
        .await
        .expect("can list documents");
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].owner_id, "u1");
    assert_eq!(documents[0].filename, "report.pdf");

    assert!(h.uploads.contains("report.pdf"));
    assert!(
        h.indexes_dir.join("report").is_dir(),
        "index subtree exists under the filename stem"
    );
}

#[tokio::test]
async fn non_pdf_upload_is_rejected_with_no_side_effects() {
    let h = harness().await;
    let extractor = StubExtractor {
        text: "unused".to_string(),
    };
    let builder = DirectoryIndexBuilder::new(h.indexes_dir.clone());
    let pipeline = IngestPipeline::new(&h.uploads, &h.database, &extractor, &builder);

    let outcome = pipeline
        .ingest(upload("notes.txt", "text/plain", 64), "u1")
        .await;

    assert_eq!(
        outcome,
        IngestOutcome::RejectedInvalid {
            reason: "Invalid Document Type".to_string()
        }
    );
    assert!(!h.uploads.contains("notes.txt"));
    assert_eq!(h.database.count_documents().await.expect("can count"), 0);
    assert!(!h.indexes_dir.exists());
}

#[tokio::test]
async fn oversized_pdf_is_rejected_by_size() {
    let h = harness().await;
    let extractor = StubExtractor {
        text: "unused".to_string(),
    };
    let builder = DirectoryIndexBuilder::new(h.indexes_dir.clone());
    let pipeline = IngestPipeline::new(&h.uploads, &h.database, &extractor, &builder);

    let outcome = pipeline
        .ingest(upload("big.pdf", PDF_CONTENT_TYPE, 2_000_000), "u1")
        .await;

    assert_eq!(
        outcome,
        IngestOutcome::RejectedInvalid {
            reason: "Invalid Document Size".to_string()
        }
    );
    assert_eq!(h.database.count_documents().await.expect("can count"), 0);
}

#[tokio::test]
async fn empty_extraction_leaves_blob_and_row_but_no_index() {
    let h = harness().await;
    let extractor = StubExtractor {
        text: String::new(),
    };
    let builder = DirectoryIndexBuilder::new(h.indexes_dir.clone());
    let pipeline = IngestPipeline::new(&h.uploads, &h.database, &extractor, &builder);

    let outcome = pipeline
        .ingest(upload("scanned.pdf", PDF_CONTENT_TYPE, 512), "u1")
        .await;

    assert!(matches!(outcome, IngestOutcome::IndexingFailed { .. }));
    assert!(h.uploads.contains("scanned.pdf"));
    assert_eq!(h.database.count_documents().await.expect("can count"), 1);
    assert!(!h.indexes_dir.join("scanned").exists());
}

#[tokio::test]
async fn schema_bootstrap_survives_repeated_startups() {
    let temp_dir = TempDir::new().expect("can create temp dir");

    for _ in 0..3 {
        let database = Database::initialize_from_data_dir(temp_dir.path())
            .await
            .expect("can initialize database");
        database.ensure_schema().await.expect("bootstrap is safe");
    }

    let database = Database::initialize_from_data_dir(temp_dir.path())
        .await
        .expect("can initialize database");
    assert_eq!(database.count_documents().await.expect("can count"), 0);
}

#[tokio::test]
async fn independent_uploads_can_run_concurrently() {
    let h = harness().await;

    let mut handles = Vec::new();
    for i in 0..4 {
        let uploads = h.uploads.clone();
        let database = h.database.clone();
        let indexes_dir = h.indexes_dir.clone();
        handles.push(tokio::spawn(async move {
            let extractor = StubExtractor {
                text: format!("content {}", i),
            };
            let builder = DirectoryIndexBuilder::new(indexes_dir);
            let pipeline = IngestPipeline::new(&uploads, &database, &extractor, &builder);
            pipeline
                .ingest(
                    upload(&format!("file-{}.pdf", i), PDF_CONTENT_TYPE, 256),
                    &format!("owner-{}", i),
                )
                .await
        }));
    }

    for handle in handles {
        let outcome = handle.await.expect("task join succeeds");
        assert!(outcome.is_done(), "expected Done, got {:?}", outcome);
    }

    assert_eq!(h.database.count_documents().await.expect("can count"), 4);
    for i in 0..4 {
        assert!(h.indexes_dir.join(format!("file-{}", i)).is_dir());
    }
}
