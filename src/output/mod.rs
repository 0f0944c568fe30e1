//! Output module for crawled content
//!
//! This module handles everything the crawler writes to disk:
//! - One Markdown file per crawled page, named after the URL
//! - The `_site_info.json` sidecar written when a crawl starts
//! - The `_crawl_summary.json` sidecar written when a crawl ends

mod files;
mod sidecar;

pub use files::{filename_for_url, save_markdown};
pub use sidecar::{
    write_crawl_summary, write_site_info, CrawlSummary, SiteInfo, CRAWL_SUMMARY_FILE,
    SITE_INFO_FILE,
};
