//! Crawler module for web page fetching and traversal
//!
//! This module contains the crawl-side core:
//! - The breadth-first frontier with its admission filter and budgets
//! - The HTTP fetcher with typed failure outcomes
//! - The coordinator that drives fetch → convert → save → enqueue

mod coordinator;
mod fetcher;
mod frontier;

pub use coordinator::{crawl, CrawlReport, Crawler};
pub use fetcher::{build_http_client, fetch_page, FetchOutcome};
pub use frontier::{AdmissionFilter, Frontier, FrontierEntry};
