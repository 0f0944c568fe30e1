//! Indexing module: cleaning, chunking, and incremental upserts
//!
//! This module turns crawled Markdown files into overlapping text chunks
//! with embeddings, driven by content-hash change detection so re-indexing
//! a folder is cheap and safe to repeat.

mod chunker;
mod indexer;
mod text;

pub use chunker::{chunk_text, chunk_windows, clean_markdown, ChunkWindows};
pub use indexer::{
    content_hash, extract_metadata, DocMetadata, FileOutcome, IndexReport, Indexer,
};
pub use text::{count_tokens, split_sentences};
