//! Deterministic feature-hashing embedder
//!
//! Maps each lowercased alphanumeric token to a vector bucket via FNV-1a
//! and accumulates signed counts, then L2-normalizes. Not a learned model:
//! two texts sharing vocabulary land near each other, which is enough for
//! offline use and for exercising the full index/search pipeline in tests.

use crate::embed::{EmbedResult, Embedder};

/// Default vector dimensionality (matches common MiniLM-class models)
pub const DEFAULT_DIMENSION: usize = 384;

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// A local, dependency-free embedding backend
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    /// Creates an embedder with the default dimension
    pub fn new() -> Self {
        Self::with_dimension(DEFAULT_DIMENSION)
    }

    /// Creates an embedder with an explicit dimension
    pub fn with_dimension(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl Embedder for HashingEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> EmbedResult<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = fnv1a(token.to_lowercase().as_bytes());
            let bucket = (hash % self.dimension as u64) as usize;
            // A second hash bit decides the sign, spreading mass around zero
            let sign = if (hash >> 32) & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        Ok(vector)
    }
}

/// FNV-1a hash over a byte slice
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_respected() {
        let embedder = HashingEmbedder::with_dimension(64);
        let v = embedder.embed("hello world").unwrap();
        assert_eq!(v.len(), 64);
        assert_eq!(embedder.dimension(), 64);
    }

    #[test]
    fn test_deterministic() {
        let embedder = HashingEmbedder::new();
        let a = embedder.embed("the quick brown fox").unwrap();
        let b = embedder.embed("the quick brown fox").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unit_norm_for_nonempty_text() {
        let embedder = HashingEmbedder::new();
        let v = embedder.embed("some meaningful sentence here").unwrap();
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let embedder = HashingEmbedder::new();
        let v = embedder.embed("").unwrap();
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_case_insensitive_tokens() {
        let embedder = HashingEmbedder::new();
        let a = embedder.embed("Rust Crawler").unwrap();
        let b = embedder.embed("rust crawler").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_shared_vocabulary_scores_higher() {
        use crate::search::cosine_similarity;

        let embedder = HashingEmbedder::new();
        let query = embedder.embed("smart contract vulnerability").unwrap();
        let near = embedder.embed("a known smart contract vulnerability class").unwrap();
        let far = embedder.embed("banana bread recipe with walnuts").unwrap();

        assert!(cosine_similarity(&query, &near) > cosine_similarity(&query, &far));
    }
}
