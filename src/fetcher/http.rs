// src/fetcher/http.rs
// =============================================================================
// The real fetcher: downloads a page over HTTP and pulls the links out of it.
//
// Key functionality:
// - One shared reqwest Client (connection pooling across all crawl tasks)
// - Reports the HTTP status line text, e.g. "200 OK" or "404 Not Found"
// - Non-2xx responses are NOT errors: the status is the answer, and the body
//   is still scanned for links
// - Only transport failures, bad URLs and unreadable bodies are errors
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::html::extract_links;
use super::{FetchError, Fetched, Fetcher};

/// Fetches pages with reqwest and extracts their `<a href>` links.
///
/// Cloning is cheap: the underlying client is reference counted.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Creates a fetcher with a per-request timeout and user agent
    //
    // Redirects are followed (up to 10, reqwest's default) and links on the
    // final page are resolved against the final URL.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Fetched {
        let page = match Url::parse(url) {
            Ok(page) => page,
            Err(e) => return Fetched::failed("", e.into()),
        };

        let response = match self.client.get(page).send().await {
            Ok(response) => response,
            Err(e) => return Fetched::failed("", e.into()),
        };

        // StatusCode's Display gives "<code> <reason>", e.g. "200 OK"
        let status = response.status().to_string();
        let base = response.url().clone();

        tracing::debug!(url, %status, "fetched page");

        match response.text().await {
            Ok(body) => Fetched::ok(status, extract_links(&body, &base)),
            Err(e) => Fetched::failed(status, FetchError::Body(e.to_string())),
        }
    }
}
