// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - One concurrent task per discovered page, no worker pool
// - Every URL is fetched at most once per crawl
// - Configurable depth limit
// - Results stream back to the caller as soon as they are ready
// - Can be cancelled at any time with a CancellationToken
//
// Submodules:
// - dedup: The "already scheduled" set shared by all tasks
// - tasks: Counts running tasks so we know when the crawl is over
// - stream: The result channel and the cancellation-aware publisher
// - orchestrator: The crawl itself
// =============================================================================

mod dedup;
mod orchestrator;
mod stream;
mod tasks;

// Re-export the public crawling API
pub use dedup::DedupFilter;
pub use orchestrator::crawl;
pub use stream::{CrawlResult, ResultStream};
pub use tasks::{InFlight, TaskGuard};
