// src/fetcher/mod.rs
// =============================================================================
// This module defines how a single page is retrieved.
//
// The crawl engine (src/crawl/) never talks to the network itself. It only
// knows about the `Fetcher` trait below: give it a URL, get back a status,
// the links found on the page, and maybe an error.
//
// Submodules:
// - http: The real implementation, backed by reqwest
// - html: Extracts and normalizes links from HTML pages
//
// Rust concepts:
// - Traits: Shared behaviour that different types can implement
// - async-trait: Lets trait methods be async and still work with dyn Trait
// - thiserror: Derives std::error::Error for our error enum
// =============================================================================

mod html;
mod http;

use async_trait::async_trait;
use thiserror::Error;

pub use html::{extract_links, resolve_link};
pub use http::HttpFetcher;

/// Everything that can go wrong while retrieving one page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or no response came back
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The URL we were asked to fetch is not a valid absolute URL
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// A response arrived but its body could not be read
    #[error("failed to read body: {0}")]
    Body(String),
    /// The fetcher has no resource for this URL
    #[error("not found: {0}")]
    NotFound(String),
}

// The outcome of fetching one URL
//
// `status` can be set even when `error` is too (e.g. the response arrived
// but its body could not be read). `urls` is ignored by the crawler
// whenever `error` is set.
#[derive(Debug, Default)]
pub struct Fetched {
    pub status: String,
    pub urls: Vec<String>,
    pub error: Option<FetchError>,
}

impl Fetched {
    /// A successful fetch with the given status and discovered links
    pub fn ok(status: impl Into<String>, urls: Vec<String>) -> Self {
        Self {
            status: status.into(),
            urls,
            error: None,
        }
    }

    /// A failed fetch; the status may be empty if no response arrived
    pub fn failed(status: impl Into<String>, error: FetchError) -> Self {
        Self {
            status: status.into(),
            urls: Vec::new(),
            error: Some(error),
        }
    }
}

/// Retrieves a page and reports the links found on it.
///
/// Implementations are called from many tasks at once, so they must be
/// `Send + Sync`. Any URL normalization (resolving relative links, dropping
/// fragments) happens here: the crawler treats every returned URL as final.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Fetched;
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait instead of calling reqwest directly?
//    - The crawler only needs "URL in, links out"
//    - Tests can plug in a fake fetcher backed by a HashMap
//    - No network needed to test the concurrency logic
//
// 2. Why #[async_trait]?
//    - We store the fetcher as Arc<dyn Fetcher> and call it from spawned tasks
//    - async_trait boxes the returned future and makes it Send, which is
//      what tokio::spawn requires
//
// 3. What does #[from] do?
//    - It generates From<reqwest::Error> for FetchError
//    - So the ? operator converts the error automatically
// -----------------------------------------------------------------------------
