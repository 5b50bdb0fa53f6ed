// LanceDB persistence for document vector indexes
// One index subtree per filename stem; rebuilt wholesale, never patched

pub mod vector_store;

use serde::{Deserialize, Serialize};

/// One embedded chunk as persisted in an index table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// Unique identifier for this embedding
    pub id: String,
    /// The vector embedding
    pub vector: Vec<f32>,
    /// Index key of the document this chunk came from
    pub document: String,
    /// The chunk's text content
    pub content: String,
    /// Estimated token count of the chunk
    pub token_count: u32,
    /// Position of this chunk within the document
    pub chunk_index: u32,
    /// Timestamp when this embedding was created
    pub created_at: String,
}
