use crate::config::types::{CrawlConfig, IndexConfig};
use crate::url::CanonicalUrl;
use crate::ConfigError;

/// Validates a crawl configuration
///
/// Malformed seed or filter URLs are a fatal precondition failure: the
/// crawl loop must never start with them.
pub fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    CanonicalUrl::parse(&config.seed_url).map_err(|e| ConfigError::InvalidSeedUrl {
        url: config.seed_url.clone(),
        reason: e.to_string(),
    })?;

    CanonicalUrl::parse(&config.filter_prefix).map_err(|e| ConfigError::InvalidFilterUrl {
        url: config.filter_prefix.clone(),
        reason: e.to_string(),
    })?;

    if !config
        .filter_prefix
        .starts_with(config.seed_url.trim_end_matches('/'))
    {
        tracing::warn!(
            "Filter prefix {} does not start with the seed URL {}; the seed may be \
             the only page crawled",
            config.filter_prefix,
            config.seed_url
        );
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.output_folder.is_empty() {
        return Err(ConfigError::Validation(
            "output folder name cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates an index configuration
pub fn validate_index_config(config: &IndexConfig) -> Result<(), ConfigError> {
    let chunking = &config.chunking;

    if chunking.chunk_size == 0 {
        return Err(ConfigError::Validation(
            "chunk_size must be > 0".to_string(),
        ));
    }

    if chunking.chunk_overlap >= chunking.chunk_size {
        return Err(ConfigError::Validation(format!(
            "chunk_overlap ({}) must be smaller than chunk_size ({})",
            chunking.chunk_overlap, chunking.chunk_size
        )));
    }

    if chunking.min_chunk_size > chunking.chunk_size {
        return Err(ConfigError::Validation(format!(
            "min_chunk_size ({}) must not exceed chunk_size ({})",
            chunking.min_chunk_size, chunking.chunk_size
        )));
    }

    if !config.source_folder.exists() {
        return Err(ConfigError::Validation(format!(
            "source folder does not exist: {}",
            config.source_folder.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_crawl_config() {
        let config = CrawlConfig::new("https://example.com/", "https://example.com/docs/");
        assert!(validate_crawl_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_seed_url() {
        let config = CrawlConfig::new("not a url", "https://example.com/docs/");
        let err = validate_crawl_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSeedUrl { .. }));
    }

    #[test]
    fn test_invalid_filter_url() {
        let config = CrawlConfig::new("https://example.com/", "docs");
        let err = validate_crawl_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFilterUrl { .. }));
    }

    #[test]
    fn test_seed_without_host_rejected() {
        let config = CrawlConfig::new("https:///path", "https://example.com/");
        assert!(validate_crawl_config(&config).is_err());
    }

    #[test]
    fn test_zero_max_pages_rejected() {
        let mut config = CrawlConfig::new("https://example.com/", "https://example.com/");
        config.max_pages = 0;
        assert!(validate_crawl_config(&config).is_err());
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk_size() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = IndexConfig::new(dir.path(), None);
        config.chunking.chunk_overlap = config.chunking.chunk_size;
        assert!(validate_index_config(&config).is_err());
    }

    #[test]
    fn test_missing_source_folder_rejected() {
        let config = IndexConfig::new("/definitely/not/a/real/folder", None);
        assert!(validate_index_config(&config).is_err());
    }
}
