// src/crawl/stream.rs
// =============================================================================
// The channel that carries crawl results from all tasks to the caller.
//
// - Many crawl tasks publish, one caller consumes
// - The channel holds at most one result, so a slow consumer slows the
//   crawl down instead of letting results pile up in memory
// - Publishing races against the cancellation token: whichever happens
//   first wins
// - The stream ends (recv returns None) once every crawl task has finished
// =============================================================================

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use serde::{Serialize, Serializer};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::fetcher::FetchError;

/// The outcome of crawling one URL. Exactly one is produced per URL that the
/// crawl admitted and fetched.
#[derive(Debug, Serialize)]
pub struct CrawlResult {
    /// The URL that was crawled
    pub url: String,
    /// Status reported by the fetcher, e.g. "200 OK"
    pub status: String,
    /// The error produced while crawling the URL, if any
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_error"
    )]
    pub error: Option<FetchError>,
}

impl CrawlResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

fn serialize_error<S: Serializer>(error: &Option<FetchError>, s: S) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => s.serialize_some(&e.to_string()),
        None => s.serialize_none(),
    }
}

// Creates a connected publisher/stream pair
//
// Capacity 1 is the smallest tokio's mpsc allows; it still makes every
// publisher wait for the consumer once one result is pending.
pub(crate) fn channel(cancel: CancellationToken) -> (Publisher, ResultStream) {
    let (tx, rx) = mpsc::channel(1);
    (Publisher { tx, cancel }, ResultStream { rx })
}

// The sending half, shared by every crawl task
#[derive(Debug)]
pub(crate) struct Publisher {
    tx: mpsc::Sender<CrawlResult>,
    cancel: CancellationToken,
}

impl Publisher {
    // Hands a result to the consumer
    //
    // Returns false if the result was NOT delivered, either because the
    // crawl was cancelled first or because the consumer dropped the stream.
    // In both cases the caller must stop working on this branch.
    pub async fn publish(&self, result: CrawlResult) -> bool {
        tokio::select! {
            // Check cancellation first so an already-cancelled crawl never
            // delivers another result
            biased;
            _ = self.cancel.cancelled() => false,
            sent = self.tx.send(result) => sent.is_ok(),
        }
    }
}

/// Results of a running crawl.
///
/// Drain it with `recv()` (or as a `futures::Stream`) until it returns
/// `None`. To stop early, cancel the token passed to
/// [`crawl`](crate::crawl::crawl), or simply drop the stream.
#[derive(Debug)]
pub struct ResultStream {
    rx: mpsc::Receiver<CrawlResult>,
}

impl ResultStream {
    /// Waits for the next result. `None` means the crawl is over.
    pub async fn recv(&mut self) -> Option<CrawlResult> {
        self.rx.recv().await
    }
}

impl Stream for ResultStream {
    type Item = CrawlResult;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
