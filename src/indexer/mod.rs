#[cfg(test)]
mod tests;

use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::Config;
use crate::database::lancedb::EmbeddingRecord;
use crate::database::lancedb::vector_store::VectorStore;
use crate::embeddings::chunking::{ChunkingConfig, chunk_text};
use crate::embeddings::ollama::OllamaClient;

/// Errors surfaced while building or persisting a vector index.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("no indexable text content")]
    EmptyText,
    #[error("embedding generation failed: {0}")]
    Embedding(String),
    #[error("index persistence failed: {0}")]
    Store(String),
}

/// Capability that turns extracted text into a persisted vector index.
#[async_trait]
pub trait IndexBuilder: Send + Sync {
    async fn build_and_persist(&self, text: &str, index_key: &str) -> Result<(), IndexError>;
}

/// Derive the index key for a stored filename: the filename with its
/// extension stripped. The same filename always maps to the same key, and
/// therefore to the same persisted index location.
#[inline]
pub fn index_key(filename: &str) -> String {
    Path::new(filename).file_stem().map_or_else(
        || filename.to_string(),
        |stem| stem.to_string_lossy().into_owned(),
    )
}

/// Production index builder: chunk the text, embed each chunk through
/// Ollama, and persist the vectors as one LanceDB subtree per index key.
pub struct VectorIndexBuilder {
    ollama: OllamaClient,
    chunking: ChunkingConfig,
    indexes_dir: PathBuf,
}

impl VectorIndexBuilder {
    #[inline]
    pub fn new(config: &Config) -> crate::Result<Self> {
        let ollama = OllamaClient::new(&config.ollama)
            .map_err(|e| crate::IngestError::Config(e.to_string()))?;

        Ok(Self {
            ollama,
            chunking: config.chunking.clone(),
            indexes_dir: config.indexes_dir(),
        })
    }
}

#[async_trait]
impl IndexBuilder for VectorIndexBuilder {
    async fn build_and_persist(&self, text: &str, index_key: &str) -> Result<(), IndexError> {
        if text.trim().is_empty() {
            return Err(IndexError::EmptyText);
        }

        let chunks = chunk_text(text, &self.chunking);
        debug!("Embedding {} chunks for index {}", chunks.len(), index_key);

        let contents: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = self
            .ollama
            .embed_batch(&contents)
            .map_err(|e| IndexError::Embedding(format!("{:#}", e)))?;

        let created_at = Utc::now().to_rfc3339();
        let records: Vec<EmbeddingRecord> = chunks
            .iter()
            .zip(vectors)
            .map(|(chunk, vector)| EmbeddingRecord {
                id: Uuid::new_v4().to_string(),
                vector,
                document: index_key.to_string(),
                content: chunk.content.clone(),
                token_count: chunk.token_count as u32,
                chunk_index: chunk.chunk_index as u32,
                created_at: created_at.clone(),
            })
            .collect();

        let store = VectorStore::open(&self.indexes_dir.join(index_key))
            .await
            .map_err(|e| IndexError::Store(e.to_string()))?;
        store
            .replace_embeddings(&records)
            .await
            .map_err(|e| IndexError::Store(e.to_string()))?;

        info!(
            "Persisted index {} ({} embeddings)",
            index_key,
            records.len()
        );
        Ok(())
    }
}
