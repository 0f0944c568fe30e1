//! Incremental folder indexing
//!
//! Walks a crawl folder, computes a content hash per Markdown file, and
//! keeps the vector store in sync: unchanged files cost one hash
//! comparison, changed files have every chunk and embedding rebuilt, and
//! new files are inserted. Per-file failures are logged and skipped; the
//! folder run always continues.

use crate::config::{validate_index_config, IndexConfig};
use crate::embed::Embedder;
use crate::index::chunker::chunk_text;
use crate::index::text::count_tokens;
use crate::storage::{NewDocument, PreparedChunk, Store, StoreStats, UpsertOutcome};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Metadata parsed from a crawled Markdown document's header block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocMetadata {
    /// First `# ` heading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// The `**Source URL:**` line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// The `**Crawled on:**` line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crawled_on: Option<String>,
}

/// Parses the header metadata from a Markdown document
///
/// Absent fields stay `None`; there is no free-form key lookup.
pub fn extract_metadata(content: &str) -> DocMetadata {
    let mut meta = DocMetadata::default();

    for line in content.lines() {
        let trimmed = line.trim();

        if meta.title.is_none() {
            if let Some(rest) = trimmed.strip_prefix("# ") {
                meta.title = Some(rest.trim().to_string());
            }
        }

        if meta.url.is_none() {
            if let Some(rest) = trimmed.strip_prefix("**Source URL:**") {
                meta.url = Some(rest.trim().to_string());
            }
        }

        if meta.crawled_on.is_none() {
            if let Some(rest) = trimmed.strip_prefix("**Crawled on:**") {
                meta.crawled_on = Some(rest.trim().to_string());
            }
        }
    }

    meta
}

/// SHA-256 hex digest of a text, the change-detection key
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// What happened to one file during indexing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file was chunked, embedded, and written to the store
    Indexed(UpsertOutcome),

    /// The stored hash matched; nothing was touched
    Unchanged,

    /// The file was empty and skipped
    SkippedEmpty,
}

/// Summary of one folder indexing run
#[derive(Debug, Clone)]
pub struct IndexReport {
    pub files_found: usize,
    pub files_indexed: usize,
    pub files_unchanged: usize,
    pub files_failed: usize,
    pub store_stats: StoreStats,
}

/// Drives incremental indexing of a crawl folder into a vector store
pub struct Indexer<S: Store> {
    store: S,
    embedder: Box<dyn Embedder>,
    config: IndexConfig,
}

impl<S: Store> Indexer<S> {
    /// Creates an indexer over a store and an embedding backend
    pub fn new(config: IndexConfig, store: S, embedder: Box<dyn Embedder>) -> Self {
        Self {
            store,
            embedder,
            config,
        }
    }

    /// Borrows the underlying store (for running searches after indexing)
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Processes every Markdown file in the source folder, one at a time
    ///
    /// Files whose names start with `_` (the crawl sidecars) are skipped.
    /// A failing file is logged and does not stop the run.
    pub fn process_folder(&mut self) -> crate::Result<IndexReport> {
        validate_index_config(&self.config)?;

        let files = collect_markdown_files(&self.config.source_folder);
        tracing::info!(
            "Found {} markdown files in {}",
            files.len(),
            self.config.source_folder.display()
        );

        let mut report = IndexReport {
            files_found: files.len(),
            files_indexed: 0,
            files_unchanged: 0,
            files_failed: 0,
            store_stats: StoreStats::default(),
        };

        for path in &files {
            match self.process_file(path) {
                Ok(FileOutcome::Indexed(outcome)) => {
                    report.files_indexed += 1;
                    tracing::info!(
                        "{}: {}",
                        path.display(),
                        match outcome {
                            UpsertOutcome::Inserted => "indexed",
                            UpsertOutcome::Replaced => "re-indexed (content changed)",
                        }
                    );
                }
                Ok(FileOutcome::Unchanged) => {
                    report.files_unchanged += 1;
                    tracing::debug!("{}: unchanged, skipping", path.display());
                }
                Ok(FileOutcome::SkippedEmpty) => {
                    tracing::warn!("{}: empty file, skipping", path.display());
                }
                Err(e) => {
                    report.files_failed += 1;
                    tracing::error!("Failed to index {}: {}", path.display(), e);
                }
            }
        }

        report.store_stats = self.store.stats()?;

        tracing::info!(
            "Indexing completed: {} indexed, {} unchanged, {} failed",
            report.files_indexed,
            report.files_unchanged,
            report.files_failed
        );
        tracing::info!(
            "Store: {} documents, {} chunks, {} embeddings, {:.1} avg tokens/chunk",
            report.store_stats.documents,
            report.store_stats.chunks,
            report.store_stats.embeddings,
            report.store_stats.avg_tokens_per_chunk
        );

        Ok(report)
    }

    /// Indexes a single Markdown file
    ///
    /// The stored content hash decides the path taken: identical hash is a
    /// no-op, a different hash rebuilds every chunk and embedding, and an
    /// unknown file is inserted. Embeddings are computed before the store
    /// transaction opens, so the delete-and-insert sequence stays atomic.
    pub fn process_file(&mut self, path: &Path) -> crate::Result<FileOutcome> {
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(FileOutcome::SkippedEmpty);
        }

        let key = path.to_string_lossy().to_string();
        let hash = content_hash(&content);

        if let Some(existing) = self.store.get_document_by_path(&key)? {
            if existing.content_hash == hash {
                return Ok(FileOutcome::Unchanged);
            }
        }

        let metadata = extract_metadata(&content);
        let chunks = chunk_text(&content, &self.config.chunking);
        tracing::debug!("{}: {} chunks", path.display(), chunks.len());

        let mut prepared = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let embedding = self.embedder.embed(&chunk)?;
            prepared.push(PreparedChunk {
                content_hash: content_hash(&chunk),
                token_count: count_tokens(&chunk),
                embedding,
                content: chunk,
            });
        }

        let doc = NewDocument {
            file_path: key,
            title: metadata.title.clone(),
            url: metadata.url.clone(),
            content_hash: hash,
            metadata: Some(serde_json::to_string(&metadata)?),
        };

        let outcome = self.store.upsert_document(&doc, &prepared)?;
        Ok(FileOutcome::Indexed(outcome))
    }
}

/// Collects `*.md` files under a folder, recursively, in sorted order
///
/// Sidecar files (names starting with `_`) are excluded.
fn collect_markdown_files(folder: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(folder)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            name.ends_with(".md") && !name.starts_with('_')
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_metadata_full_header() {
        let content = "# My Page\n\n**Source URL:** https://ex.com/a\n**Crawled on:** 2024-05-01 12:00:00\n\n---\n\nbody";
        let meta = extract_metadata(content);
        assert_eq!(meta.title.as_deref(), Some("My Page"));
        assert_eq!(meta.url.as_deref(), Some("https://ex.com/a"));
        assert_eq!(meta.crawled_on.as_deref(), Some("2024-05-01 12:00:00"));
    }

    #[test]
    fn test_extract_metadata_absent_fields() {
        let meta = extract_metadata("plain text without any header");
        assert!(meta.title.is_none());
        assert!(meta.url.is_none());
        assert!(meta.crawled_on.is_none());
    }

    #[test]
    fn test_extract_metadata_first_heading_wins() {
        let meta = extract_metadata("# First\n\n# Second");
        assert_eq!(meta.title.as_deref(), Some("First"));
    }

    #[test]
    fn test_content_hash_is_stable_and_sensitive() {
        let a = content_hash("hello");
        let b = content_hash("hello");
        let c = content_hash("hello!");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_collect_skips_sidecars_and_non_markdown() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "x").unwrap();
        std::fs::write(dir.path().join("_site_info.json"), "{}").unwrap();
        std::fs::write(dir.path().join("_summary.md"), "x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let files = collect_markdown_files(dir.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("a.md"));
    }

    #[test]
    fn test_collect_recurses_into_subfolders() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("a.md"), "x").unwrap();
        std::fs::write(dir.path().join("sub/b.md"), "x").unwrap();

        let files = collect_markdown_files(dir.path());
        assert_eq!(files.len(), 2);
    }
}
