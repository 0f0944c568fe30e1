//! Configuration module for Inkdex
//!
//! Configuration is built from CLI arguments and passed explicitly into each
//! component's constructor; there is no ambient global state. This module
//! defines the configuration types, their defaults, and the fatal
//! precondition checks that run before any crawl or index work starts.

mod types;
mod validation;

// Re-export types
pub use types::{ChunkingConfig, CrawlConfig, IndexConfig};

// Re-export validation functions
pub use validation::{validate_crawl_config, validate_index_config};
