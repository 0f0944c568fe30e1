//! Markdown file output
//!
//! Derives a stable filename from each page's URL and writes the converted
//! Markdown, overwriting any previous crawl of the same page.

use crate::url::CanonicalUrl;
use std::fs;
use std::path::{Path, PathBuf};

/// Derives the Markdown filename for a crawled page
///
/// The name is the last path segment of the URL (or the host with dots
/// replaced by underscores when the path is empty), sanitized to word,
/// dash, and dot characters, with `.md` appended if missing. Two crawls of
/// the same canonical URL always produce the same filename.
pub fn filename_for_url(url: &CanonicalUrl) -> String {
    let last_segment = url
        .path()
        .trim_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let raw = last_segment.unwrap_or_else(|| {
        url.host_str().unwrap_or("page").replace('.', "_")
    });

    let mut name: String = raw
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if !name.ends_with(".md") {
        name.push_str(".md");
    }

    name
}

/// Writes a page's Markdown content into the output directory
///
/// Existing files are overwritten, so re-crawling a page replaces its
/// previous snapshot.
///
/// # Arguments
///
/// * `output_dir` - The crawl output directory
/// * `url` - The page's canonical URL (names the file)
/// * `content` - The full Markdown document
///
/// # Returns
///
/// * `Ok(PathBuf)` - The path the file was written to
/// * `Err(std::io::Error)` - The write failed
pub fn save_markdown(
    output_dir: &Path,
    url: &CanonicalUrl,
    content: &str,
) -> std::io::Result<PathBuf> {
    let path = output_dir.join(filename_for_url(url));
    fs::write(&path, content)?;
    Ok(path)
}
