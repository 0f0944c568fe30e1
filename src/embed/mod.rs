//! Embedding provider trait and vector serialization
//!
//! The indexer and search engine talk to the embedding model only through
//! the [`Embedder`] trait. Every vector an implementation returns must have
//! exactly `dimension()` elements; the dimension stays constant for the
//! lifetime of a vector database.

mod hashing;
mod http;

pub use hashing::HashingEmbedder;
pub use http::HttpEmbedder;

use thiserror::Error;

/// Errors that can occur while producing embeddings
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("Embedding request failed: {0}")]
    Request(String),

    #[error("Embedding service returned HTTP {0}")]
    HttpStatus(u16),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Malformed embedding response: {0}")]
    MalformedResponse(String),
}

/// Result type for embedding operations
pub type EmbedResult<T> = Result<T, EmbedError>;

/// Trait for embedding backends
///
/// Implementations turn text into a fixed-length float vector. The same
/// embedder must be used for indexing and for querying a given database.
pub trait Embedder {
    /// The vector dimensionality, constant across all calls
    fn dimension(&self) -> usize;

    /// Embeds one piece of text into a `dimension()`-length vector
    fn embed(&self, text: &str) -> EmbedResult<Vec<f32>>;
}

/// Encodes a float vector as a BLOB of little-endian f32 bytes
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vec.len() * 4);
    for &v in vec {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

/// Decodes a BLOB written by [`vec_to_blob`] back into a float vector
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}
