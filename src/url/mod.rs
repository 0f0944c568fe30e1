//! URL handling module for Inkdex
//!
//! This module provides URL canonicalization: resolving relative references,
//! stripping fragments, and producing the stable string keys used for
//! visited-tracking and prefix filtering.

mod canonical;

// Re-export main types and functions
pub use canonical::{canonicalize, site_name, CanonicalUrl};
