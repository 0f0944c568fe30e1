use crate::{UrlError, UrlResult};
use std::fmt;
use url::Url;

/// Schemes that never lead to crawlable pages
const SKIP_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// A URL reduced to its canonical, comparable form
///
/// The canonical form is `scheme://host[:port]/path[?query]` with any
/// fragment removed. Two URLs that differ only by fragment canonicalize to
/// the same value. Equality and hashing operate on the canonical string, so
/// a `CanonicalUrl` can serve directly as a visited-set or queue key.
#[derive(Debug, Clone)]
pub struct CanonicalUrl {
    url: Url,
    key: String,
}

impl CanonicalUrl {
    /// Parses an absolute URL string into its canonical form
    ///
    /// # Arguments
    ///
    /// * `input` - An absolute http(s) URL
    ///
    /// # Returns
    ///
    /// * `Ok(CanonicalUrl)` - The canonical form
    /// * `Err(UrlError)` - The input is malformed, has an unsupported
    ///   scheme, or lacks a host
    pub fn parse(input: &str) -> UrlResult<Self> {
        let url = Url::parse(input.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
        Self::from_url(url)
    }

    /// Canonicalizes an already-parsed URL
    pub fn from_url(mut url: Url) -> UrlResult<Self> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::UnsupportedScheme(url.scheme().to_string()));
        }

        if url.host_str().is_none() {
            return Err(UrlError::MissingHost);
        }

        // Fragments never change the fetched resource
        url.set_fragment(None);

        let key = build_key(&url);
        Ok(Self { url, key })
    }

    /// Returns the canonical string key
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Returns the underlying parsed URL
    pub fn as_url(&self) -> &Url {
        &self.url
    }

    /// Returns the URL path component
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Returns the host, if any (always present after canonicalization)
    pub fn host_str(&self) -> Option<&str> {
        self.url.host_str()
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl PartialEq for CanonicalUrl {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for CanonicalUrl {}

impl std::hash::Hash for CanonicalUrl {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// Reconstructs the canonical key: `scheme://authority/path[?query]`
fn build_key(url: &Url) -> String {
    let mut key = format!("{}://{}", url.scheme(), url.authority());
    key.push_str(url.path());
    if let Some(query) = url.query() {
        key.push('?');
        key.push_str(query);
    }
    key
}

/// Resolves a (possibly relative) href against a base URL and canonicalizes it
///
/// Hrefs with non-web schemes (`javascript:`, `mailto:`, `tel:`, `data:`)
/// and empty or fragment-only hrefs are rejected, since they never lead to a
/// crawlable page.
///
/// # Arguments
///
/// * `href` - The link target, absolute or relative
/// * `base` - The URL of the page the link appeared on
///
/// # Returns
///
/// * `Ok(CanonicalUrl)` - The resolved canonical URL
/// * `Err(UrlError)` - The href cannot resolve to a canonical http(s) URL
pub fn canonicalize(href: &str, base: &Url) -> UrlResult<CanonicalUrl> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return Err(UrlError::Parse("empty or fragment-only href".to_string()));
    }

    for scheme in SKIP_SCHEMES {
        if href.starts_with(scheme) {
            return Err(UrlError::UnsupportedScheme(
                scheme.trim_end_matches(':').to_string(),
            ));
        }
    }

    let resolved = base
        .join(href)
        .map_err(|e| UrlError::Parse(e.to_string()))?;

    CanonicalUrl::from_url(resolved)
}

/// Derives a display name for a site from its URL (host minus `www.` prefix)
pub fn site_name(url: &Url) -> String {
    url.host_str()
        .map(|h| h.trim_start_matches("www.").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/docs/page").unwrap()
    }

    #[test]
    fn test_fragment_stripped() {
        let canon = CanonicalUrl::parse("https://example.com/page#section").unwrap();
        assert_eq!(canon.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_fragment_only_difference_collapses() {
        let a = CanonicalUrl::parse("https://example.com/page#a").unwrap();
        let b = CanonicalUrl::parse("https://example.com/page#b").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_query_preserved() {
        let canon = CanonicalUrl::parse("https://example.com/page?x=1&y=2#frag").unwrap();
        assert_eq!(canon.as_str(), "https://example.com/page?x=1&y=2");
    }

    #[test]
    fn test_idempotent() {
        let once = CanonicalUrl::parse("https://Example.com/a/b?q=1#frag").unwrap();
        let twice = CanonicalUrl::parse(once.as_str()).unwrap();
        assert_eq!(once.as_str(), twice.as_str());
    }

    #[test]
    fn test_port_preserved() {
        let canon = CanonicalUrl::parse("http://127.0.0.1:8080/page").unwrap();
        assert_eq!(canon.as_str(), "http://127.0.0.1:8080/page");
    }

    #[test]
    fn test_relative_resolution() {
        let canon = canonicalize("/other", &base()).unwrap();
        assert_eq!(canon.as_str(), "https://example.com/other");
    }

    #[test]
    fn test_relative_path_resolution() {
        let canon = canonicalize("child", &base()).unwrap();
        assert_eq!(canon.as_str(), "https://example.com/docs/child");
    }

    #[test]
    fn test_absolute_href() {
        let canon = canonicalize("https://other.com/x", &base()).unwrap();
        assert_eq!(canon.as_str(), "https://other.com/x");
    }

    #[test]
    fn test_skip_javascript() {
        assert!(canonicalize("javascript:void(0)", &base()).is_err());
    }

    #[test]
    fn test_skip_mailto() {
        assert!(canonicalize("mailto:a@example.com", &base()).is_err());
    }

    #[test]
    fn test_skip_tel() {
        assert!(canonicalize("tel:+123", &base()).is_err());
    }

    #[test]
    fn test_skip_data_uri() {
        assert!(canonicalize("data:text/html,<h1>x</h1>", &base()).is_err());
    }

    #[test]
    fn test_skip_fragment_only() {
        assert!(canonicalize("#section", &base()).is_err());
    }

    #[test]
    fn test_missing_scheme_rejected() {
        assert!(CanonicalUrl::parse("example.com/page").is_err());
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let err = CanonicalUrl::parse("ftp://example.com/file").unwrap_err();
        assert!(matches!(err, UrlError::UnsupportedScheme(_)));
    }

    #[test]
    fn test_site_name_strips_www() {
        let url = Url::parse("https://www.example.com/").unwrap();
        assert_eq!(site_name(&url), "example.com");
    }
}
