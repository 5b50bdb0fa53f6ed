
use super::EmbeddingRecord;
use crate::IngestError;
use arrow::array::{Array, FixedSizeListArray, Float32Array, RecordBatchIterator, StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use lancedb::Connection;
use lancedb::connection::CreateTableMode;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub const EMBEDDINGS_TABLE: &str = "embeddings";

/// Persistence for one document's vector index. A store maps to a single
/// LanceDB directory; writing replaces whatever table was there before, so
/// re-ingesting a document leaves exactly one index at its key.
pub struct VectorStore {
    connection: Connection,
}

impl VectorStore {
    #[inline]
    pub async fn open(path: &Path) -> Result<Self, IngestError> {
        debug!("Opening vector store at {}", path.display());

        std::fs::create_dir_all(path).map_err(|e| {
            IngestError::Indexing(format!("Failed to create index directory: {}", e))
        })?;

        let uri = format!("file://{}", path.display());
        let connection = lancedb::connect(&uri)
            .execute()
            .await
            .map_err(|e| IngestError::Indexing(format!("Failed to open vector store: {}", e)))?;

        Ok(Self { connection })
    }

    /// Persist a document's full set of embeddings, replacing any previous
    /// table at this location.
    #[inline]
    pub async fn replace_embeddings(
        &self,
        records: &[EmbeddingRecord],
    ) -> Result<(), IngestError> {
        if records.is_empty() {
            return Err(IngestError::Indexing(
                "no embeddings to persist".to_string(),
            ));
        }

        let batch = create_record_batch(records)?;
        let schema = batch.schema();
        let reader = RecordBatchIterator::new(std::iter::once(Ok(batch)), schema);

        self.connection
            .create_table(EMBEDDINGS_TABLE, reader)
            .mode(CreateTableMode::Overwrite)
            .execute()
            .await
            .map_err(|e| {
                IngestError::Indexing(format!("Failed to write embeddings table: {}", e))
            })?;

        info!("Persisted {} embeddings", records.len());
        Ok(())
    }

    /// Number of embeddings currently persisted, or zero when no table has
    /// been written yet.
    #[inline]
    pub async fn count_embeddings(&self) -> Result<usize, IngestError> {
        let table_names = self
            .connection
            .table_names()
            .execute()
            .await
            .map_err(|e| IngestError::Indexing(format!("Failed to list tables: {}", e)))?;

        if !table_names.iter().any(|name| name == EMBEDDINGS_TABLE) {
            return Ok(0);
        }

        let table = self
            .connection
            .open_table(EMBEDDINGS_TABLE)
            .execute()
            .await
            .map_err(|e| IngestError::Indexing(format!("Failed to open table: {}", e)))?;

        table
            .count_rows(None)
            .await
            .map_err(|e| IngestError::Indexing(format!("Failed to count embeddings: {}", e)))
    }
}

fn embeddings_schema(vector_dim: i32) -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new(
            "vector",
            DataType::FixedSizeList(
                Arc::new(Field::new("item", DataType::Float32, false)),
                vector_dim,
            ),
            false,
        ),
        Field::new("document", DataType::Utf8, false),
        Field::new("content", DataType::Utf8, false),
        Field::new("token_count", DataType::UInt32, false),
        Field::new("chunk_index", DataType::UInt32, false),
        Field::new("created_at", DataType::Utf8, false),
    ]))
}

fn create_record_batch(records: &[EmbeddingRecord]) -> Result<RecordBatch, IngestError> {
    let len = records.len();
    let vector_dim = records[0].vector.len();

    if records.iter().any(|r| r.vector.len() != vector_dim) {
        return Err(IngestError::Indexing(
            "embedding dimensions are not uniform".to_string(),
        ));
    }

    let mut ids = Vec::with_capacity(len);
    let mut documents = Vec::with_capacity(len);
    let mut contents = Vec::with_capacity(len);
    let mut token_counts = Vec::with_capacity(len);
    let mut chunk_indices = Vec::with_capacity(len);
    let mut created_ats = Vec::with_capacity(len);

    for record in records {
        ids.push(record.id.as_str());
        documents.push(record.document.as_str());
        contents.push(record.content.as_str());
        token_counts.push(record.token_count);
        chunk_indices.push(record.chunk_index);
        created_ats.push(record.created_at.as_str());
    }

    let mut flat_values = Vec::with_capacity(len * vector_dim);
    for record in records {
        flat_values.extend_from_slice(&record.vector);
    }

    let values_array = Float32Array::from(flat_values);
    let item_field = Arc::new(Field::new("item", DataType::Float32, false));
    let vector_array =
        FixedSizeListArray::try_new(item_field, vector_dim as i32, Arc::new(values_array), None)
            .map_err(|e| IngestError::Indexing(format!("Failed to build vector array: {}", e)))?;

    let schema = embeddings_schema(vector_dim as i32);
    let arrays: Vec<Arc<dyn Array>> = vec![
        Arc::new(StringArray::from(ids)),
        Arc::new(vector_array),
        Arc::new(StringArray::from(documents)),
        Arc::new(StringArray::from(contents)),
        Arc::new(UInt32Array::from(token_counts)),
        Arc::new(UInt32Array::from(chunk_indices)),
        Arc::new(StringArray::from(created_ats)),
    ];

    RecordBatch::try_new(schema, arrays)
        .map_err(|e| IngestError::Indexing(format!("Failed to build record batch: {}", e)))
}
