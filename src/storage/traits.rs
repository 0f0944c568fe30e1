//! Storage trait and error types
//!
//! This module defines the trait interface the indexer and search engine
//! use, plus the storage error type.

use crate::storage::{DocumentRecord, NewDocument, PreparedChunk, SearchRow, StoreStats, UpsertOutcome};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for vector store backends
///
/// The contract the indexer relies on: [`Store::upsert_document`] replaces
/// a document's chunks and embeddings as a single atomic unit, so readers
/// never observe a document with zero or duplicate chunks.
pub trait Store {
    /// Looks up a document by its stable file-path key
    fn get_document_by_path(&self, file_path: &str) -> StoreResult<Option<DocumentRecord>>;

    /// Inserts a document or replaces an existing one, atomically
    ///
    /// For an existing key, the document row is updated and all prior
    /// chunks (and, by cascade, their embeddings) are deleted before the
    /// new chunks are inserted. The whole sequence runs inside one
    /// transaction.
    fn upsert_document(
        &mut self,
        doc: &NewDocument,
        chunks: &[PreparedChunk],
    ) -> StoreResult<UpsertOutcome>;

    /// Number of chunks currently stored for a document
    fn chunk_count_for_document(&self, document_id: i64) -> StoreResult<u64>;

    /// Loads every (chunk, embedding) pair with its document context
    ///
    /// This is the read path for brute-force similarity search.
    fn load_search_rows(&self) -> StoreResult<Vec<SearchRow>>;

    /// Aggregate row counts and average tokens per chunk
    fn stats(&self) -> StoreResult<StoreStats>;
}
