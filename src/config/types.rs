use std::path::{Path, PathBuf};

/// Default base directory for all crawled content
pub const DEFAULT_BASE_FOLDER: &str = "./crawl_result";

/// Default output subfolder name within the base folder
pub const DEFAULT_OUTPUT_FOLDER: &str = "default";

/// Default maximum crawling depth
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Default maximum number of pages to crawl
pub const DEFAULT_MAX_PAGES: usize = 100;

/// Default delay between page fetches (milliseconds)
pub const DEFAULT_DELAY_MS: u64 = 1000;

/// Default request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default vector database filename, placed next to the crawl folder
pub const DEFAULT_VECTOR_DB_NAME: &str = "crawl_vectors.db";

/// Crawl behavior configuration
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// The starting URL to crawl from
    pub seed_url: String,

    /// URL prefix filter: only canonical URLs starting with this are crawled
    pub filter_prefix: String,

    /// Base directory that holds all crawl output subfolders
    pub base_folder: PathBuf,

    /// Subfolder name within the base folder for this crawl
    pub output_folder: String,

    /// Maximum number of pages to crawl
    pub max_pages: usize,

    /// Maximum crawling depth from the seed URL
    pub max_depth: u32,

    /// Politeness delay between page fetches (milliseconds)
    pub delay_ms: u64,

    /// Request timeout (seconds)
    pub timeout_secs: u64,
}

impl CrawlConfig {
    /// Creates a crawl configuration with default limits
    pub fn new(seed_url: impl Into<String>, filter_prefix: impl Into<String>) -> Self {
        Self {
            seed_url: seed_url.into(),
            filter_prefix: filter_prefix.into(),
            base_folder: PathBuf::from(DEFAULT_BASE_FOLDER),
            output_folder: DEFAULT_OUTPUT_FOLDER.to_string(),
            max_pages: DEFAULT_MAX_PAGES,
            max_depth: DEFAULT_MAX_DEPTH,
            delay_ms: DEFAULT_DELAY_MS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Returns the full output directory path for this crawl
    pub fn output_dir(&self) -> PathBuf {
        self.base_folder.join(&self.output_folder)
    }
}

/// Chunking constants for the windowing algorithm (character counts)
#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    /// Maximum characters per chunk window
    pub chunk_size: usize,

    /// Characters of trailing context carried into the next window
    pub chunk_overlap: usize,

    /// Minimum characters required to emit a chunk
    pub min_chunk_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 512,
            chunk_overlap: 50,
            min_chunk_size: 100,
        }
    }
}

/// Indexing configuration
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Folder containing crawled Markdown files
    pub source_folder: PathBuf,

    /// Path to the SQLite vector database
    pub db_path: PathBuf,

    /// Chunking constants
    pub chunking: ChunkingConfig,
}

impl IndexConfig {
    /// Creates an index configuration for a crawl folder
    ///
    /// When `db_path` is `None`, the database is placed next to the source
    /// folder as `crawl_vectors.db`.
    pub fn new(source_folder: impl Into<PathBuf>, db_path: Option<PathBuf>) -> Self {
        let source_folder = source_folder.into();
        let db_path = db_path.unwrap_or_else(|| default_db_path(&source_folder));

        Self {
            source_folder,
            db_path,
            chunking: ChunkingConfig::default(),
        }
    }
}

/// Computes the default database path: `crawl_vectors.db` beside the folder
fn default_db_path(source_folder: &Path) -> PathBuf {
    source_folder
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(DEFAULT_VECTOR_DB_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawl_config_defaults() {
        let config = CrawlConfig::new("https://example.com/", "https://example.com/docs/");
        assert_eq!(config.max_pages, 100);
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.delay_ms, 1000);
        assert_eq!(
            config.output_dir(),
            PathBuf::from("./crawl_result/default")
        );
    }

    #[test]
    fn test_chunking_defaults() {
        let chunking = ChunkingConfig::default();
        assert_eq!(chunking.chunk_size, 512);
        assert_eq!(chunking.chunk_overlap, 50);
        assert_eq!(chunking.min_chunk_size, 100);
    }

    #[test]
    fn test_default_db_path_beside_folder() {
        let config = IndexConfig::new("/data/crawl_result/docs", None);
        assert_eq!(
            config.db_path,
            PathBuf::from("/data/crawl_result/crawl_vectors.db")
        );
    }

    #[test]
    fn test_explicit_db_path() {
        let config = IndexConfig::new("/data/docs", Some(PathBuf::from("/tmp/custom.db")));
        assert_eq!(config.db_path, PathBuf::from("/tmp/custom.db"));
    }
}
