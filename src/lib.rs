use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

/// Crate-level error for the command layer. Each pipeline stage has its own
/// typed error next to its module; a finished ingestion run is reported via
/// `pipeline::IngestOutcome` rather than by error propagation.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upload rejected: {0}")]
    Rejected(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Indexing error: {0}")]
    Indexing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod commands;
pub mod config;
pub mod database;
pub mod embeddings;
pub mod extractor;
pub mod indexer;
pub mod pipeline;
pub mod uploads;
