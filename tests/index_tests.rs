//! Integration tests for indexing and search
//!
//! These tests drive the full index pipeline over a temp folder of
//! crawler-style Markdown files: hash-based incremental upserts, chunk and
//! embedding row lifecycles, and ranked similarity search.

use inkdex::config::IndexConfig;
use inkdex::embed::HashingEmbedder;
use inkdex::index::{FileOutcome, Indexer};
use inkdex::search::search;
use inkdex::storage::{SqliteStore, Store, UpsertOutcome};
use std::path::{Path, PathBuf};

/// Writes a crawler-format Markdown file with enough body text to chunk
fn write_page(dir: &Path, name: &str, title: &str, body_sentences: &[String]) -> PathBuf {
    let mut content = format!("# {}\n\n", title);
    content.push_str(&format!("**Source URL:** https://ex.com/{}\n", name));
    content.push_str("**Crawled on:** 2024-05-01 12:00:00\n\n");
    content.push_str("---\n\n");
    for sentence in body_sentences {
        content.push_str(sentence);
        content.push('\n');
    }

    let path = dir.join(format!("{}.md", name));
    std::fs::write(&path, content).unwrap();
    path
}

/// Long, topic-flavored sentences so chunks clear the minimum size
fn rust_sentences() -> Vec<String> {
    (0..12)
        .map(|i| {
            format!(
                "Rust ownership and borrowing rules keep memory safe without a garbage \
                 collector, and lifetimes describe how long references stay valid in part {}.",
                i
            )
        })
        .collect()
}

fn cooking_sentences() -> Vec<String> {
    (0..12)
        .map(|i| {
            format!(
                "Slow roasted vegetables with olive oil and rosemary make a simple dinner, \
                 and fresh bread with butter completes the recipe in step {}.",
                i
            )
        })
        .collect()
}

fn new_indexer(folder: &Path, db: &Path) -> Indexer<SqliteStore> {
    let config = IndexConfig::new(folder, Some(db.to_path_buf()));
    let store = SqliteStore::new(db).unwrap();
    Indexer::new(config, store, Box::new(HashingEmbedder::new()))
}

#[test]
fn test_index_folder_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("vectors.db");

    let rust = rust_sentences();
    write_page(dir.path(), "rust", "Rust Guide", &rust);

    let mut indexer = new_indexer(dir.path(), &db);
    let report = indexer.process_folder().unwrap();

    assert_eq!(report.files_found, 1);
    assert_eq!(report.files_indexed, 1);
    assert_eq!(report.files_failed, 0);

    let stats = indexer.store().stats().unwrap();
    assert_eq!(stats.documents, 1);
    assert!(stats.chunks >= 2, "long body should produce several chunks");
    assert_eq!(stats.chunks, stats.embeddings);
    assert!(stats.avg_tokens_per_chunk > 0.0);
}

#[test]
fn test_reindex_unchanged_file_mutates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("vectors.db");

    let rust = rust_sentences();
    write_page(dir.path(), "rust", "Rust Guide", &rust);

    let mut first = new_indexer(dir.path(), &db);
    first.process_folder().unwrap();
    let before = first.store().stats().unwrap();
    drop(first);

    // Second run over the identical folder: every file is a hash-compare no-op
    let mut second = new_indexer(dir.path(), &db);
    let report = second.process_folder().unwrap();
    let after = second.store().stats().unwrap();

    assert_eq!(report.files_indexed, 0);
    assert_eq!(report.files_unchanged, 1);
    assert_eq!(before.documents, after.documents);
    assert_eq!(before.chunks, after.chunks);
    assert_eq!(before.embeddings, after.embeddings);
}

#[test]
fn test_changed_file_replaces_all_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("vectors.db");

    let rust = rust_sentences();
    let page = write_page(dir.path(), "rust", "Rust Guide", &rust);

    let mut indexer = new_indexer(dir.path(), &db);
    indexer.process_folder().unwrap();
    drop(indexer);

    // Shrink the document: the chunk set must be fully rebuilt, not merged
    let short = rust_sentences()[..3].to_vec();
    write_page(dir.path(), "rust", "Rust Guide v2", &short);

    let mut indexer = new_indexer(dir.path(), &db);
    let outcome = indexer.process_file(&page).unwrap();
    assert_eq!(outcome, FileOutcome::Indexed(UpsertOutcome::Replaced));

    let doc = indexer
        .store()
        .get_document_by_path(&page.to_string_lossy())
        .unwrap()
        .unwrap();
    assert_eq!(doc.title.as_deref(), Some("Rust Guide v2"));

    let stats = indexer.store().stats().unwrap();
    assert_eq!(stats.documents, 1);
    assert_eq!(
        stats.chunks,
        indexer.store().chunk_count_for_document(doc.id).unwrap(),
        "no orphan chunks from the old version may remain"
    );
    assert_eq!(stats.chunks, stats.embeddings);
}

#[test]
fn test_sidecar_files_are_not_indexed() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("vectors.db");

    let rust = rust_sentences();
    write_page(dir.path(), "rust", "Rust Guide", &rust);
    std::fs::write(dir.path().join("_site_info.json"), "{}").unwrap();
    std::fs::write(dir.path().join("_notes.md"), "# not content").unwrap();

    let mut indexer = new_indexer(dir.path(), &db);
    let report = indexer.process_folder().unwrap();

    assert_eq!(report.files_found, 1);
}

#[test]
fn test_search_ranks_matching_topic_first() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("vectors.db");

    let rust = rust_sentences();
    let cooking = cooking_sentences();
    write_page(dir.path(), "rust", "Rust Guide", &rust);
    write_page(dir.path(), "cooking", "Dinner Recipes", &cooking);

    let mut indexer = new_indexer(dir.path(), &db);
    indexer.process_folder().unwrap();

    let embedder = HashingEmbedder::new();
    let results = search(
        indexer.store(),
        &embedder,
        "rust ownership borrowing lifetimes",
        3,
    )
    .unwrap();

    assert!(!results.is_empty());
    assert!(results.len() <= 3);
    assert!(
        results[0].file_path.ends_with("rust.md"),
        "the Rust document should rank first, got {}",
        results[0].file_path
    );

    for pair in results.windows(2) {
        assert!(pair[0].similarity >= pair[1].similarity);
    }
}

#[test]
fn test_search_returns_exactly_top_k_when_enough_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("vectors.db");

    // Two long documents give comfortably more than three chunks
    let rust = rust_sentences();
    let cooking = cooking_sentences();
    write_page(dir.path(), "rust", "Rust Guide", &rust);
    write_page(dir.path(), "cooking", "Dinner Recipes", &cooking);

    let mut indexer = new_indexer(dir.path(), &db);
    indexer.process_folder().unwrap();

    let stats = indexer.store().stats().unwrap();
    assert!(stats.chunks > 3);

    let embedder = HashingEmbedder::new();
    let results = search(indexer.store(), &embedder, "vegetables and bread", 3).unwrap();

    assert_eq!(results.len(), 3);
    assert!(results[0].similarity >= results[1].similarity);
    assert!(results[1].similarity >= results[2].similarity);
}

#[test]
fn test_search_results_carry_metadata_from_header() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("vectors.db");

    let rust = rust_sentences();
    write_page(dir.path(), "rust", "Rust Guide", &rust);

    let mut indexer = new_indexer(dir.path(), &db);
    indexer.process_folder().unwrap();

    let embedder = HashingEmbedder::new();
    let results = search(indexer.store(), &embedder, "rust memory safety", 1).unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title.as_deref(), Some("Rust Guide"));
    assert_eq!(results[0].url.as_deref(), Some("https://ex.com/rust"));
}

#[test]
fn test_missing_folder_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("vectors.db");
    let missing = dir.path().join("nope");

    let config = IndexConfig::new(&missing, Some(db.clone()));
    let store = SqliteStore::new(&db).unwrap();
    let mut indexer = Indexer::new(config, store, Box::new(HashingEmbedder::new()));

    assert!(indexer.process_folder().is_err());
}
