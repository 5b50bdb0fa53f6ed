#[cfg(test)]
mod tests;

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors surfaced while turning a stored blob into plain text. A missing
/// blob is reported distinctly from an unparseable one.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
    #[error("unparseable document: {0}")]
    Parse(String),
}

/// Capability that turns a stored upload into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionError>;
}

/// PDF text extraction backed by the `pdf-extract` parser. Page texts come
/// back concatenated in page order; the separator between pages is whatever
/// the parser emits, stable for a given input file.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    #[inline]
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractionError::Parse(e.to_string()))
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        if !path.exists() {
            return Err(ExtractionError::NotFound(path.display().to_string()));
        }

        let bytes = tokio::fs::read(path).await?;
        debug!(
            "Extracting text from {} ({} bytes)",
            path.display(),
            bytes.len()
        );

        self.extract_bytes(&bytes)
    }
}
