use anyhow::Context;
use std::path::PathBuf;
use tracing::info;

use crate::config::{Config, default_data_dir};
use crate::database::lancedb::vector_store::VectorStore;
use crate::database::sqlite::Database;
use crate::extractor::PdfTextExtractor;
use crate::indexer::VectorIndexBuilder;
use crate::pipeline::{IngestOutcome, IngestPipeline, RawUpload};
use crate::uploads::UploadStore;
use crate::{IngestError, Result};

fn resolve_data_dir(data_dir: Option<PathBuf>) -> Result<PathBuf> {
    match data_dir {
        Some(dir) => Ok(dir),
        None => default_data_dir().map_err(|e| IngestError::Config(e.to_string())),
    }
}

/// Ingest one local file for an owner. Prints the outcome and returns an
/// error for every non-successful stage so the process exits nonzero.
#[inline]
pub async fn ingest_document(
    file: PathBuf,
    owner: String,
    data_dir: Option<PathBuf>,
) -> Result<()> {
    let data_dir = resolve_data_dir(data_dir)?;
    let config = Config::load(&data_dir)?;

    let database = Database::initialize_from_data_dir(&data_dir).await?;
    let uploads = UploadStore::new(config.uploads_dir());
    let extractor = PdfTextExtractor;
    let index_builder = VectorIndexBuilder::new(&config)?;

    let upload = RawUpload::from_file(&file)?;
    info!("Ingesting {} for owner {}", upload.name, owner);

    let pipeline = IngestPipeline::new(&uploads, &database, &extractor, &index_builder);
    match pipeline.ingest(upload, &owner).await {
        IngestOutcome::Done {
            document,
            index_key,
        } => {
            println!(
                "Ingested {} (document id {}, owner {})",
                document.filename, document.id, document.owner_id
            );
            println!("Index written under key {:?}", index_key);
            Ok(())
        }
        IngestOutcome::RejectedInvalid { reason } => {
            println!("Upload rejected: {}", reason);
            Err(IngestError::Rejected(reason))
        }
        IngestOutcome::StorageFailed { detail } => {
            println!("Storage failed: {}", detail);
            Err(IngestError::Storage(detail))
        }
        IngestOutcome::ExtractionFailed { detail } => {
            println!("Text extraction failed: {}", detail);
            Err(IngestError::Extraction(detail))
        }
        IngestOutcome::IndexingFailed { detail } => {
            println!("Indexing failed: {}", detail);
            Err(IngestError::Indexing(detail))
        }
    }
}

/// List registered documents, optionally restricted to one owner.
#[inline]
pub async fn list_documents(owner: Option<String>, data_dir: Option<PathBuf>) -> Result<()> {
    let data_dir = resolve_data_dir(data_dir)?;
    let database = Database::initialize_from_data_dir(&data_dir).await?;

    let documents = match owner {
        Some(owner) => database.list_documents_by_owner(&owner).await?,
        None => database.list_documents().await?,
    };

    if documents.is_empty() {
        println!("No documents have been ingested yet.");
        return Ok(());
    }

    println!("Documents ({} total):", documents.len());
    for document in &documents {
        println!(
            "  [{}] {} (owner: {}, uploaded: {})",
            document.id,
            document.filename,
            document.owner_id,
            document.uploaded_at.format("%Y-%m-%d %H:%M:%S")
        );
    }

    Ok(())
}

/// Show the data layout, registry size, index subtrees, and whether the
/// embedding server is reachable.
#[inline]
pub async fn show_status(data_dir: Option<PathBuf>) -> Result<()> {
    let data_dir = resolve_data_dir(data_dir)?;
    let config = Config::load(&data_dir)?;
    let database = Database::initialize_from_data_dir(&data_dir).await?;

    println!("Data directory: {}", data_dir.display());
    println!(
        "Documents registered: {}",
        database.count_documents().await?
    );

    match crate::embeddings::ollama::OllamaClient::new(&config.ollama) {
        Ok(client) => match client.health_check() {
            Ok(()) => println!("Embedding server: ready ({})", client.endpoint()),
            Err(e) => println!("Embedding server: unavailable ({})", e),
        },
        Err(e) => println!("Embedding server: misconfigured ({})", e),
    }

    let indexes_dir = config.indexes_dir();
    if !indexes_dir.is_dir() {
        println!("No indexes have been written yet.");
        return Ok(());
    }

    let mut keys: Vec<String> = std::fs::read_dir(&indexes_dir)
        .with_context(|| {
            format!(
                "Failed to read indexes directory: {}",
                indexes_dir.display()
            )
        })?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    keys.sort();

    println!("Indexes ({} total):", keys.len());
    for key in keys {
        match VectorStore::open(&indexes_dir.join(&key)).await {
            Ok(store) => match store.count_embeddings().await {
                Ok(count) => println!("  {} ({} embeddings)", key, count),
                Err(e) => println!("  {} (unreadable: {})", key, e),
            },
            Err(e) => println!("  {} (unreadable: {})", key, e),
        }
    }

    Ok(())
}

/// Print the active configuration.
#[inline]
pub fn show_config(data_dir: Option<PathBuf>) -> Result<()> {
    let data_dir = resolve_data_dir(data_dir)?;
    let config = Config::load(&data_dir)?;

    let rendered = toml::to_string_pretty(&config)
        .map_err(|e| IngestError::Config(e.to_string()))?;

    println!("Configuration ({}):", config.config_file_path().display());
    print!("{}", rendered);

    Ok(())
}

/// Write the active configuration to disk, creating the data directory.
#[inline]
pub fn init_config(data_dir: Option<PathBuf>) -> Result<()> {
    let data_dir = resolve_data_dir(data_dir)?;
    let config = Config::load(&data_dir)?;
    config.save()?;

    println!("Wrote {}", config.config_file_path().display());

    Ok(())
}
