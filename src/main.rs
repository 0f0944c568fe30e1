//! Inkdex main entry point
//!
//! This is the command-line interface for crawling a website into Markdown
//! files and indexing those files into a searchable vector store.

use clap::{Parser, Subcommand};
use inkdex::config::{CrawlConfig, IndexConfig};
use inkdex::crawler::crawl;
use inkdex::embed::{Embedder, HashingEmbedder, HttpEmbedder};
use inkdex::index::Indexer;
use inkdex::search::search;
use inkdex::storage::SqliteStore;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Inkdex: crawl a website into Markdown and search it by meaning
#[derive(Parser, Debug)]
#[command(name = "inkdex")]
#[command(version)]
#[command(about = "Crawl a website into Markdown and index it for vector search", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a website under a prefix filter into Markdown files
    Crawl {
        /// The starting URL to crawl from
        seed_url: String,

        /// URL prefix filter (only URLs starting with this are crawled)
        filter_prefix: String,

        /// Subfolder name within the base folder
        #[arg(short, long, default_value = "default")]
        output: String,

        /// Base directory for all crawled content
        #[arg(long, default_value = "./crawl_result")]
        base_folder: PathBuf,

        /// Maximum number of pages to crawl
        #[arg(long, default_value_t = 100)]
        max_pages: usize,

        /// Maximum crawling depth
        #[arg(long, default_value_t = 3)]
        max_depth: u32,

        /// Delay between requests in milliseconds
        #[arg(long, default_value_t = 1000)]
        delay: u64,
    },

    /// Index crawled Markdown files and optionally search them
    Index {
        /// Path to the crawled content folder
        folder: PathBuf,

        /// Path to the SQLite database file (default: next to the folder)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Search query to run instead of indexing
        #[arg(long)]
        search: Option<String>,

        /// Number of top results to return for a search
        #[arg(long, default_value_t = 5)]
        top_k: usize,

        /// Base URL of an OpenAI-compatible embedding service
        #[arg(long)]
        embed_url: Option<String>,

        /// Embedding model name sent to the service
        #[arg(long, default_value = "all-MiniLM-L6-v2")]
        embed_model: String,

        /// Embedding vector dimension
        #[arg(long, default_value_t = 384)]
        embed_dim: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Crawl {
            seed_url,
            filter_prefix,
            output,
            base_folder,
            max_pages,
            max_depth,
            delay,
        } => {
            let mut config = CrawlConfig::new(seed_url, filter_prefix);
            config.output_folder = output;
            config.base_folder = base_folder;
            config.max_pages = max_pages;
            config.max_depth = max_depth;
            config.delay_ms = delay;

            handle_crawl(config).await?;
        }

        Command::Index {
            folder,
            db,
            search,
            top_k,
            embed_url,
            embed_model,
            embed_dim,
        } => {
            let config = IndexConfig::new(folder, db);
            // The index path is synchronous (rusqlite + blocking HTTP)
            tokio::task::spawn_blocking(move || {
                handle_index(config, search, top_k, embed_url, embed_model, embed_dim)
            })
            .await??;
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("inkdex=info,warn"),
            1 => EnvFilter::new("inkdex=debug,info"),
            2 => EnvFilter::new("inkdex=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the crawl subcommand
async fn handle_crawl(config: CrawlConfig) -> anyhow::Result<()> {
    let report = crawl(config).await?;

    println!("Crawling completed!");
    println!("Pages crawled: {}", report.pages_crawled);
    println!("Files saved to: {}", report.output_dir.display());

    Ok(())
}

/// Handles the index subcommand: index the folder, or run a search
fn handle_index(
    config: IndexConfig,
    query: Option<String>,
    top_k: usize,
    embed_url: Option<String>,
    embed_model: String,
    embed_dim: usize,
) -> anyhow::Result<()> {
    let embedder = build_embedder(embed_url, embed_model, embed_dim)?;
    let store = SqliteStore::new(&config.db_path)?;

    match query {
        Some(query) => {
            println!("Searching for: '{}'", query);
            println!("{}", "-".repeat(60));

            let results = search(&store, embedder.as_ref(), &query, top_k)?;

            if results.is_empty() {
                println!("No results found. Make sure to index files first.");
                return Ok(());
            }

            for (rank, result) in results.iter().enumerate() {
                println!("\n{}. Similarity: {:.4}", rank + 1, result.similarity);
                println!(
                    "   Title: {}",
                    result.title.as_deref().unwrap_or("No title")
                );
                let preview: String = result.content.chars().take(200).collect();
                println!("   Content preview: {}...", preview);
                if let Some(url) = &result.url {
                    println!("   URL: {}", url);
                }
                println!("   File: {}", result.file_path);
            }
        }
        None => {
            let mut indexer = Indexer::new(config, store, embedder);
            let report = indexer.process_folder()?;

            println!("Processing completed: {} files indexed", report.files_indexed);
            println!("\nDatabase Statistics:");
            println!("Documents: {}", report.store_stats.documents);
            println!("Chunks: {}", report.store_stats.chunks);
            println!("Embeddings: {}", report.store_stats.embeddings);
            println!(
                "Average tokens per chunk: {:.1}",
                report.store_stats.avg_tokens_per_chunk
            );
        }
    }

    Ok(())
}

/// Picks the embedding backend: HTTP service when configured, local hashing
/// embedder otherwise
fn build_embedder(
    embed_url: Option<String>,
    embed_model: String,
    embed_dim: usize,
) -> anyhow::Result<Box<dyn Embedder>> {
    match embed_url {
        Some(url) => {
            let api_key = std::env::var("INKDEX_EMBED_API_KEY").ok();
            let embedder = HttpEmbedder::new(
                &url,
                embed_model,
                embed_dim,
                api_key.as_deref(),
                Duration::from_secs(60),
            )?;
            Ok(Box::new(embedder))
        }
        None => Ok(Box::new(HashingEmbedder::with_dimension(embed_dim))),
    }
}
