//! Brute-force cosine-similarity search
//!
//! Embeds the query, scans every stored (chunk, embedding) pair, and ranks
//! by cosine similarity. Exact, read-only, no index structure: correctness
//! over speed for local knowledge bases.

use crate::embed::Embedder;
use crate::storage::Store;

/// One ranked search hit
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Cosine similarity between the query and this chunk
    pub similarity: f32,

    /// The chunk text
    pub content: String,

    /// Owning document's title, if known
    pub title: Option<String>,

    /// Owning document's source URL, if known
    pub url: Option<String>,

    /// Owning document's file path (the stable key)
    pub file_path: String,

    /// Chunk row id (ties are broken by the lower id)
    pub chunk_id: i64,
}

/// Computes cosine similarity between two vectors
///
/// Defined as `dot(a, b) / (‖a‖ · ‖b‖)`, or `0.0` when either norm is zero
/// or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return 0.0;
    }

    dot / denom
}

/// Runs a similarity search over everything in the store
///
/// Results are sorted strictly descending by similarity, ties broken by
/// lower chunk id, and truncated to `top_k`.
///
/// # Arguments
///
/// * `store` - The vector store to scan
/// * `embedder` - The embedding backend (must match the one used to index)
/// * `query` - Free-text query
/// * `top_k` - Maximum number of results
pub fn search(
    store: &dyn Store,
    embedder: &dyn Embedder,
    query: &str,
    top_k: usize,
) -> crate::Result<Vec<SearchResult>> {
    let query_vec = embedder.embed(query)?;

    let mut results: Vec<SearchResult> = store
        .load_search_rows()?
        .into_iter()
        .map(|row| SearchResult {
            similarity: cosine_similarity(&query_vec, &row.embedding),
            content: row.content,
            title: row.title,
            url: row.url,
            file_path: row.file_path,
            chunk_id: row.chunk_id,
        })
        .collect();

    results.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.chunk_id.cmp(&b.chunk_id))
    });

    results.truncate(top_k);
    Ok(results)
}
