//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process:
//! - Seeding and draining the frontier
//! - Fetching pages and converting them to Markdown
//! - Writing Markdown files and the JSON sidecars
//! - Feeding discovered links back into the frontier
//! - Pacing requests with a fixed politeness delay

use crate::config::{validate_crawl_config, CrawlConfig};
use crate::convert::convert_page;
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchOutcome};
use crate::crawler::frontier::{AdmissionFilter, Frontier, FrontierEntry};
use crate::output::{
    save_markdown, write_crawl_summary, write_site_info, CrawlSummary, SiteInfo,
};
use crate::url::{site_name, CanonicalUrl};
use crate::InkdexError;
use chrono::Utc;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

/// Result of a finished crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Number of pages crawled (including pages whose fetch failed)
    pub pages_crawled: usize,

    /// Directory the Markdown files and sidecars were written to
    pub output_dir: PathBuf,

    /// Every canonical URL that was visited
    pub visited_urls: Vec<String>,
}

/// Main crawler structure tying the frontier, fetcher, and converter together
pub struct Crawler {
    config: CrawlConfig,
    client: Client,
    frontier: Frontier,
    output_dir: PathBuf,
}

impl Crawler {
    /// Creates a new crawler from a validated configuration
    ///
    /// Malformed seed or filter URLs fail here, before any network or
    /// filesystem activity.
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run
    /// * `Err(InkdexError)` - Invalid configuration or client build failure
    pub fn new(config: CrawlConfig) -> Result<Self, InkdexError> {
        validate_crawl_config(&config)?;

        let seed = CanonicalUrl::parse(&config.seed_url)?;
        let filter = AdmissionFilter::new(config.filter_prefix.clone());
        let frontier = Frontier::new(seed, filter, config.max_pages, config.max_depth);

        let client = build_http_client(config.timeout_secs)?;

        let output_dir = config.output_dir();
        std::fs::create_dir_all(&output_dir)?;

        Ok(Self {
            config,
            client,
            frontier,
            output_dir,
        })
    }

    /// Runs the crawl loop until the frontier drains or the budget is spent
    ///
    /// Per-page fetch and save errors are logged and the loop continues;
    /// the page still counts toward the budget. Between pages the loop
    /// sleeps for the configured politeness delay.
    pub async fn run(&mut self) -> Result<CrawlReport, InkdexError> {
        tracing::info!("Starting crawl from {}", self.config.seed_url);
        tracing::info!("Filter prefix: {}", self.config.filter_prefix);
        tracing::info!(
            "Limits: max {} pages, depth {}, {}ms delay",
            self.config.max_pages,
            self.config.max_depth,
            self.config.delay_ms
        );

        self.write_site_info_sidecar();

        let delay = Duration::from_millis(self.config.delay_ms);

        while let Some(entry) = self.frontier.next() {
            let links = self.process_page(&entry).await;
            self.frontier.extend(entry.depth, links);

            tracing::info!(
                "Progress: {}/{} pages, {} in queue",
                self.frontier.pages_crawled(),
                self.config.max_pages,
                self.frontier.queue_len()
            );

            tokio::time::sleep(delay).await;
        }

        let report = CrawlReport {
            pages_crawled: self.frontier.pages_crawled(),
            output_dir: self.output_dir.clone(),
            visited_urls: self.frontier.visited_urls(),
        };

        self.write_summary_sidecar(&report);

        tracing::info!(
            "Crawl completed: {} pages saved to {}",
            report.pages_crawled,
            report.output_dir.display()
        );

        Ok(report)
    }

    /// Crawls one page: fetch, convert, save, and return its outbound links
    ///
    /// Every failure mode is recovered locally; a page that cannot be
    /// fetched or saved simply contributes no links.
    async fn process_page(&self, entry: &FrontierEntry) -> Vec<CanonicalUrl> {
        tracing::info!("Crawling: {} (depth {})", entry.url, entry.depth);

        let body = match fetch_page(&self.client, entry.url.as_str()).await {
            FetchOutcome::Success { body, .. } => body,
            FetchOutcome::HttpStatus { status_code } => {
                tracing::warn!("Skipping {}: HTTP {}", entry.url, status_code);
                return Vec::new();
            }
            FetchOutcome::Timeout => {
                tracing::warn!("Skipping {}: request timed out", entry.url);
                return Vec::new();
            }
            FetchOutcome::Network { error } => {
                tracing::warn!("Skipping {}: {}", entry.url, error);
                return Vec::new();
            }
        };

        let page = convert_page(&body, &entry.url, self.frontier.filter(), Utc::now());

        match save_markdown(&self.output_dir, &entry.url, &page.markdown) {
            Ok(path) => tracing::debug!("Saved: {}", path.display()),
            Err(e) => tracing::error!("Failed to save {}: {}", entry.url, e),
        }

        page.links
    }

    /// Writes the site info sidecar; failures are logged, never fatal
    fn write_site_info_sidecar(&self) {
        let seed_url = match CanonicalUrl::parse(&self.config.seed_url) {
            Ok(u) => u,
            Err(_) => return,
        };

        let info = SiteInfo {
            website_name: site_name(seed_url.as_url()),
            base_url: self.config.seed_url.clone(),
            filter_prefix: self.config.filter_prefix.clone(),
            crawl_started: Utc::now().to_rfc3339(),
            output_folder: self.output_dir.display().to_string(),
        };

        if let Err(e) = write_site_info(&self.output_dir, &info) {
            tracing::error!("Failed to write site info sidecar: {}", e);
        }
    }

    /// Writes the crawl summary sidecar; failures are logged, never fatal
    fn write_summary_sidecar(&self, report: &CrawlReport) {
        let summary = CrawlSummary {
            crawl_date: Utc::now().to_rfc3339(),
            base_url: self.config.seed_url.clone(),
            filter_prefix: self.config.filter_prefix.clone(),
            pages_crawled: report.pages_crawled,
            visited_urls: report.visited_urls.clone(),
            output_folder: self.output_dir.display().to_string(),
        };

        if let Err(e) = write_crawl_summary(&self.output_dir, &summary) {
            tracing::error!("Failed to write crawl summary sidecar: {}", e);
        }
    }
}

/// Runs a complete crawl with the given configuration
///
/// # Example
///
/// ```no_run
/// use inkdex::config::CrawlConfig;
/// use inkdex::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CrawlConfig::new("https://example.com/", "https://example.com/docs/");
/// let report = crawl(config).await?;
/// println!("Crawled {} pages", report.pages_crawled);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: CrawlConfig) -> Result<CrawlReport, InkdexError> {
    let mut crawler = Crawler::new(config)?;
    crawler.run().await
}
