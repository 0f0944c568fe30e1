//! HTTP fetcher implementation
//!
//! This module handles the HTTP requests for the crawler: building the
//! client with a browser-like user agent, fetching page bodies, and
//! classifying failures into the typed outcomes the crawl loop inspects.

use reqwest::Client;
use std::time::Duration;

/// User agent presented to crawled sites (mimics a real browser)
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Result of fetching one page
///
/// Failures are values, not control flow: the crawl loop matches on the
/// outcome and decides what to log and whether to continue.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Successfully fetched an HTML body
    Success {
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// The server answered with a non-success status
    HttpStatus {
        /// The HTTP status code
        status_code: u16,
    },

    /// The request timed out
    Timeout,

    /// Network-level failure (DNS, connection refused, TLS, ...)
    Network {
        /// Error description
        error: String,
    },
}

/// Builds the HTTP client used for the whole crawl
///
/// # Arguments
///
/// * `timeout_secs` - Per-request timeout in seconds
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(timeout_secs: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a single page and classifies the result
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The canonical URL to fetch
///
/// # Returns
///
/// A [`FetchOutcome`] describing success or the kind of failure
pub async fn fetch_page(client: &Client, url: &str) -> FetchOutcome {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            if e.is_timeout() {
                return FetchOutcome::Timeout;
            }
            return FetchOutcome::Network {
                error: e.to_string(),
            };
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchOutcome::HttpStatus {
            status_code: status.as_u16(),
        };
    }

    match response.text().await {
        Ok(body) => FetchOutcome::Success {
            status_code: status.as_u16(),
            body,
        },
        Err(e) => {
            if e.is_timeout() {
                FetchOutcome::Timeout
            } else {
                FetchOutcome::Network {
                    error: e.to_string(),
                }
            }
        }
    }
}
