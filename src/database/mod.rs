// Storage backends: SQLite for the document registry, LanceDB for the
// persisted vector indexes

pub mod lancedb;
pub mod sqlite;
