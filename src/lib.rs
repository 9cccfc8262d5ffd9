// src/lib.rs
// =============================================================================
// webcrawler: a concurrent, depth-bounded web crawler.
//
// Start at one URL, fetch it, follow its links, fetch those, and so on up to
// a maximum depth. Every page is fetched at most once and produces exactly
// one CrawlResult on the stream returned by `crawl`.
//
// - crawl: The concurrent crawl engine
// - fetcher: How a single page is retrieved (HTTP + HTML link extraction)
// =============================================================================

pub mod crawl;
pub mod fetcher;

pub use crawl::{crawl, CrawlResult, ResultStream};
pub use fetcher::{FetchError, Fetched, Fetcher, HttpFetcher};

// Re-exported so callers don't need a direct tokio-util dependency
pub use tokio_util::sync::CancellationToken;
