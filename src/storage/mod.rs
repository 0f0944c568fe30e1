//! Storage module for the vector database
//!
//! This module handles the SQLite persistence layer for the indexer:
//! - Schema initialization (documents, chunks, embeddings)
//! - Hash-keyed document lookup
//! - Transactional replacement of a document's chunks and embeddings
//! - The full-scan read path used by brute-force search

mod schema;
mod sqlite;
mod traits;

pub use schema::initialize_schema;
pub use sqlite::SqliteStore;
pub use traits::{Store, StoreError, StoreResult};

/// A document row as stored in the database
#[derive(Debug, Clone)]
pub struct DocumentRecord {
    pub id: i64,
    pub file_path: String,
    pub title: Option<String>,
    pub url: Option<String>,
    pub content_hash: String,
    pub created_at: String,
    pub updated_at: String,
    pub metadata: Option<String>,
}

/// A document about to be inserted or updated
#[derive(Debug, Clone)]
pub struct NewDocument {
    /// Stable key: the source file path
    pub file_path: String,
    pub title: Option<String>,
    pub url: Option<String>,
    pub content_hash: String,
    /// JSON-encoded [`crate::index::DocMetadata`]
    pub metadata: Option<String>,
}

/// A chunk with its embedding, ready for insertion
///
/// The chunk index is its position in the slice passed to
/// [`Store::upsert_document`], which keeps indices dense by construction.
#[derive(Debug, Clone)]
pub struct PreparedChunk {
    pub content: String,
    pub content_hash: String,
    pub token_count: usize,
    pub embedding: Vec<f32>,
}

/// Whether an upsert created a new document or replaced an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// The document key was new; everything was inserted
    Inserted,
    /// The document existed; its chunks and embeddings were rebuilt
    Replaced,
}

/// One (chunk, embedding) pair with its document context, for search
#[derive(Debug, Clone)]
pub struct SearchRow {
    pub chunk_id: i64,
    pub content: String,
    pub title: Option<String>,
    pub url: Option<String>,
    pub file_path: String,
    pub embedding: Vec<f32>,
}

/// Aggregate row counts reported after an index run
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreStats {
    pub documents: u64,
    pub chunks: u64,
    pub embeddings: u64,
    pub avg_tokens_per_chunk: f64,
}
