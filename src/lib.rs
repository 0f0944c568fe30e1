//! Inkdex: a site-to-knowledge-base ingester
//!
//! This crate crawls websites into normalized Markdown files and indexes
//! those files into an SQLite-backed vector store for similarity search.

pub mod config;
pub mod convert;
pub mod crawler;
pub mod embed;
pub mod index;
pub mod output;
pub mod search;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Inkdex operations
#[derive(Debug, Error)]
pub enum InkdexError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::StoreError),

    #[error("Embedding error: {0}")]
    Embed(#[from] embed::EmbedError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid seed URL '{url}': {reason}")]
    InvalidSeedUrl { url: String, reason: String },

    #[error("Invalid filter prefix '{url}': {reason}")]
    InvalidFilterUrl { url: String, reason: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Inkdex operations
pub type Result<T> = std::result::Result<T, InkdexError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{ChunkingConfig, CrawlConfig, IndexConfig};
pub use self::url::{canonicalize, CanonicalUrl};
