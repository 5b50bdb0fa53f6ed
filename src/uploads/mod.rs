
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors from the raw blob area.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid upload filename {0:?}")]
    InvalidFilename(String),
    #[error("failed to write upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Flat directory of uploaded blobs, keyed by filename.
///
/// Saving under an existing name silently overwrites the previous blob;
/// names are not deduplicated or timestamped in storage.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    #[inline]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a blob, creating the uploads area on first use. Returns the
    /// stored filename, which may differ from `name` after sanitization.
    #[inline]
    pub async fn save(&self, name: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let stored = sanitize_filename(name)?;
        tokio::fs::create_dir_all(&self.root).await?;

        let path = self.root.join(&stored);
        tokio::fs::write(&path, bytes).await?;

        debug!("Stored {} bytes at {}", bytes.len(), path.display());
        Ok(stored)
    }

    /// Location of a stored blob. The blob is not required to exist.
    #[inline]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.root.join(name).is_file()
    }
}

/// Reduce a client-supplied name to a bare filename. Path components are
/// dropped so an upload can never land outside the uploads area.
fn sanitize_filename(name: &str) -> Result<String, StorageError> {
    let candidate = Path::new(name)
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .next_back();

    match candidate {
        Some(part) if !part.is_empty() => Ok(part),
        _ => Err(StorageError::InvalidFilename(name.to_string())),
    }
}
