//! JSON sidecar files written alongside the Markdown output
//!
//! Each crawl run produces two sidecars in its output directory: the site
//! info written when the run starts and the crawl summary written when it
//! ends. Both are typed structs rather than free-form maps, so absent
//! fields are explicit.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Filename of the site metadata sidecar
pub const SITE_INFO_FILE: &str = "_site_info.json";

/// Filename of the run summary sidecar
pub const CRAWL_SUMMARY_FILE: &str = "_crawl_summary.json";

/// Metadata about the crawled site, written when the run starts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteInfo {
    /// Site display name (host minus `www.`)
    pub website_name: String,

    /// The seed URL the crawl started from
    pub base_url: String,

    /// The URL prefix filter applied to discovered links
    pub filter_prefix: String,

    /// When the crawl started (RFC 3339)
    pub crawl_started: String,

    /// The output directory path
    pub output_folder: String,
}

/// Summary of a finished crawl run, written when the run ends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlSummary {
    /// When the crawl finished (RFC 3339)
    pub crawl_date: String,

    /// The seed URL the crawl started from
    pub base_url: String,

    /// The URL prefix filter applied to discovered links
    pub filter_prefix: String,

    /// Number of pages actually crawled
    pub pages_crawled: usize,

    /// Every canonical URL that was visited
    pub visited_urls: Vec<String>,

    /// The output directory path
    pub output_folder: String,
}

/// Writes the site info sidecar into the output directory
pub fn write_site_info(output_dir: &Path, info: &SiteInfo) -> crate::Result<()> {
    let json = serde_json::to_string_pretty(info)?;
    fs::write(output_dir.join(SITE_INFO_FILE), json)?;
    Ok(())
}

/// Writes the crawl summary sidecar into the output directory
pub fn write_crawl_summary(output_dir: &Path, summary: &CrawlSummary) -> crate::Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(output_dir.join(CRAWL_SUMMARY_FILE), json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_info_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let info = SiteInfo {
            website_name: "example.com".to_string(),
            base_url: "https://example.com/".to_string(),
            filter_prefix: "https://example.com/docs/".to_string(),
            crawl_started: "2024-05-01T12:00:00+00:00".to_string(),
            output_folder: "./crawl_result/docs".to_string(),
        };

        write_site_info(dir.path(), &info).unwrap();

        let raw = fs::read_to_string(dir.path().join(SITE_INFO_FILE)).unwrap();
        let parsed: SiteInfo = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.website_name, "example.com");
        assert_eq!(parsed.filter_prefix, "https://example.com/docs/");
    }

    #[test]
    fn test_crawl_summary_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let summary = CrawlSummary {
            crawl_date: "2024-05-01T12:30:00+00:00".to_string(),
            base_url: "https://example.com/".to_string(),
            filter_prefix: "https://example.com/".to_string(),
            pages_crawled: 2,
            visited_urls: vec![
                "https://example.com/".to_string(),
                "https://example.com/a".to_string(),
            ],
            output_folder: "./out".to_string(),
        };

        write_crawl_summary(dir.path(), &summary).unwrap();

        let raw = fs::read_to_string(dir.path().join(CRAWL_SUMMARY_FILE)).unwrap();
        let parsed: CrawlSummary = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.pages_crawled, 2);
        assert_eq!(parsed.visited_urls.len(), 2);
    }
}
