//! SQLite storage implementation
//!
//! This module provides the SQLite-based implementation of the Store trait.

use crate::embed::{blob_to_vec, vec_to_blob};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Store, StoreResult};
use crate::storage::{
    DocumentRecord, NewDocument, PreparedChunk, SearchRow, StoreStats, UpsertOutcome,
};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite vector store backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a vector database at the given path
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(StoreError)` - Failed to open database
    pub fn new(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;

        // foreign_keys must be ON for the chunk/embedding cascades
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl Store for SqliteStore {
    fn get_document_by_path(&self, file_path: &str) -> StoreResult<Option<DocumentRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, file_path, title, url, content_hash, created_at, updated_at, metadata
             FROM documents WHERE file_path = ?1",
        )?;

        let doc = stmt
            .query_row(params![file_path], |row| {
                Ok(DocumentRecord {
                    id: row.get(0)?,
                    file_path: row.get(1)?,
                    title: row.get(2)?,
                    url: row.get(3)?,
                    content_hash: row.get(4)?,
                    created_at: row.get(5)?,
                    updated_at: row.get(6)?,
                    metadata: row.get(7)?,
                })
            })
            .optional()?;

        Ok(doc)
    }

    fn upsert_document(
        &mut self,
        doc: &NewDocument,
        chunks: &[PreparedChunk],
    ) -> StoreResult<UpsertOutcome> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM documents WHERE file_path = ?1",
                params![doc.file_path],
                |row| row.get(0),
            )
            .optional()?;

        let (document_id, outcome) = match existing {
            Some(id) => {
                tx.execute(
                    "UPDATE documents
                     SET title = ?1, url = ?2, content_hash = ?3, updated_at = ?4, metadata = ?5
                     WHERE id = ?6",
                    params![doc.title, doc.url, doc.content_hash, now, doc.metadata, id],
                )?;

                // Embeddings cascade-delete with their chunks
                tx.execute("DELETE FROM chunks WHERE document_id = ?1", params![id])?;

                (id, UpsertOutcome::Replaced)
            }
            None => {
                tx.execute(
                    "INSERT INTO documents
                         (file_path, title, url, content_hash, created_at, updated_at, metadata)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        doc.file_path,
                        doc.title,
                        doc.url,
                        doc.content_hash,
                        now,
                        now,
                        doc.metadata
                    ],
                )?;

                (tx.last_insert_rowid(), UpsertOutcome::Inserted)
            }
        };

        for (index, chunk) in chunks.iter().enumerate() {
            tx.execute(
                "INSERT INTO chunks
                     (document_id, chunk_index, content, content_hash, token_count, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    document_id,
                    index as i64,
                    chunk.content,
                    chunk.content_hash,
                    chunk.token_count as i64,
                    now
                ],
            )?;
            let chunk_id = tx.last_insert_rowid();

            tx.execute(
                "INSERT INTO embeddings (chunk_id, embedding, created_at) VALUES (?1, ?2, ?3)",
                params![chunk_id, vec_to_blob(&chunk.embedding), now],
            )?;
        }

        tx.commit()?;
        Ok(outcome)
    }

    fn chunk_count_for_document(&self, document_id: i64) -> StoreResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM chunks WHERE document_id = ?1",
            params![document_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn load_search_rows(&self) -> StoreResult<Vec<SearchRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.id, c.content, d.title, d.url, d.file_path, e.embedding
             FROM embeddings e
             JOIN chunks c ON e.chunk_id = c.id
             JOIN documents d ON c.document_id = d.id
             ORDER BY c.id",
        )?;

        let rows = stmt
            .query_map([], |row| {
                let blob: Vec<u8> = row.get(5)?;
                Ok(SearchRow {
                    chunk_id: row.get(0)?,
                    content: row.get(1)?,
                    title: row.get(2)?,
                    url: row.get(3)?,
                    file_path: row.get(4)?,
                    embedding: blob_to_vec(&blob),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn stats(&self) -> StoreResult<StoreStats> {
        let documents: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        let chunks: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get(0))?;
        let embeddings: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM embeddings", [], |row| row.get(0))?;
        let avg_tokens: Option<f64> = self
            .conn
            .query_row("SELECT AVG(token_count) FROM chunks", [], |row| row.get(0))?;

        Ok(StoreStats {
            documents: documents as u64,
            chunks: chunks as u64,
            embeddings: embeddings as u64,
            avg_tokens_per_chunk: avg_tokens.unwrap_or(0.0),
        })
    }
}
