// src/crawl/orchestrator.rs
// =============================================================================
// This module implements the concurrent crawl itself.
//
// How it works:
// 1. The seed URL is marked as seen and a task is spawned for it
// 2. Each task fetches its URL and publishes exactly one result
// 3. If that worked, every link on the page that nobody has claimed yet
//    gets its own task, one level shallower
// 4. A supervisor task waits until no crawl task is left running and then
//    lets go of the channel, which ends the caller's stream
//
// There is no queue and no worker pool: one tokio task per URL, and the
// depth limit plus the dedup filter keep the number of tasks finite.
//
// Cancellation is only checked while publishing. A task that is already
// fetching finishes its fetch, then notices the token and stops without
// following any links.
// =============================================================================

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use super::dedup::DedupFilter;
use super::stream::{self, CrawlResult, Publisher, ResultStream};
use super::tasks::{InFlight, TaskGuard};
use crate::fetcher::{Fetched, Fetcher};

// State shared by every task of one crawl
//
// Field order matters: `fetcher` is dropped before `publisher`, so by the
// time the caller sees the stream end, the crawl holds no fetcher handle.
struct Shared {
    fetcher: Option<Arc<dyn Fetcher>>,
    seen: DedupFilter,
    in_flight: Arc<InFlight>,
    publisher: Publisher,
}

// What one task is asked to do
#[derive(Debug)]
struct Visit {
    url: String,
    depth: usize,
}

// Crawls pages starting at `seed`, to a maximum of `depth` levels
//
// Parameters:
//   cancel:  cancel it to stop the crawl early
//   seed:    the first URL to fetch
//   depth:   1 = just the seed, 2 = the seed + the pages it links to, ...
//            0 fetches nothing
//   fetcher: retrieves pages; None turns the crawl into a no-op
//
// Returns immediately. All fetching happens on spawned tokio tasks, so this
// must be called from inside a tokio runtime.
//
// Example:
//   let mut results = crawl(CancellationToken::new(), "https://example.com/", 2, Some(fetcher));
//   while let Some(result) = results.recv().await { ... }
pub fn crawl(
    cancel: CancellationToken,
    seed: impl Into<String>,
    depth: usize,
    fetcher: Option<Arc<dyn Fetcher>>,
) -> ResultStream {
    let seed = seed.into();
    let (publisher, results) = stream::channel(cancel);
    let in_flight = InFlight::new();

    let shared = Arc::new(Shared {
        fetcher,
        seen: DedupFilter::new(),
        in_flight: Arc::clone(&in_flight),
        publisher,
    });

    tracing::info!(seed = %seed, depth, "starting crawl");

    // The seed cannot have been seen yet; it is admitted unconditionally
    shared.seen.ensure(&seed);
    let guard = in_flight.enter();
    spawn_visit(Arc::clone(&shared), Visit { url: seed, depth }, guard);

    // Supervisor: once every task is done, release the last handle to the
    // sender so the consumer's stream ends
    tokio::spawn(async move {
        in_flight.wait_idle().await;
        tracing::info!(admitted = shared.seen.len(), "crawl finished");
        drop(shared);
    });

    results
}

// Spawns the task for one visit
//
// Boxing the future gives the recursion (visit -> spawn_visit -> visit) a
// concrete type.
fn spawn_visit(shared: Arc<Shared>, visit: Visit, guard: TaskGuard) {
    let task: BoxFuture<'static, ()> = Box::pin(run_visit(shared, visit, guard));
    tokio::spawn(task);
}

// The body of one crawl task
//
// `_guard` is held until this function returns, on every path, which is
// what keeps the supervisor waiting.
async fn run_visit(shared: Arc<Shared>, visit: Visit, _guard: TaskGuard) {
    let fetcher = match &shared.fetcher {
        Some(fetcher) if visit.depth > 0 => fetcher,
        _ => return,
    };

    let Fetched {
        status,
        urls,
        error,
    } = fetcher.fetch(&visit.url).await;

    let failed = error.is_some();
    if let Some(e) = &error {
        tracing::debug!(url = %visit.url, error = %e, "fetch failed");
    }

    let result = CrawlResult {
        url: visit.url.clone(),
        status,
        error,
    };
    if !shared.publisher.publish(result).await {
        tracing::debug!(url = %visit.url, "result not delivered, abandoning branch");
        return;
    }

    // A failed fetch ends this branch; whatever links came with it are ignored
    if failed {
        return;
    }

    for url in urls {
        if shared.seen.ensure(&url) {
            continue;
        }

        tracing::debug!(url = %url, depth = visit.depth - 1, parent = %visit.url, "admitted");

        // Enter before spawning, while our own guard is still alive
        let guard = shared.in_flight.enter();
        let child = Visit {
            url,
            depth: visit.depth - 1,
        };
        spawn_visit(Arc::clone(&shared), child, guard);
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why does depth track first discovery, not the shortest path?
//    - A URL is claimed by whichever task finds it first
//    - If that task was deep in the tree, the URL gets a small remaining
//      depth even if a shallower page also links to it
//    - When every path to a page has the same length, the set of results
//      is fixed and only the order changes from run to run. When paths of
//      different lengths lead to a page that sits right at the depth
//      limit, whether it gets fetched depends on which task gets there first
//
// 2. Why can't the stream close too early?
//    - A child's guard is created before the parent's guard is dropped
//    - So the counter only reaches zero when no task can spawn anything
//
// 3. Why does a dropped stream stop the crawl?
//    - Sending into a channel with no receiver fails immediately
//    - publish() reports that like a cancellation, and the task returns
// -----------------------------------------------------------------------------
