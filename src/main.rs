// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (stderr, filtered by RUST_LOG)
// 2. Parse command-line arguments using clap
// 3. Start the crawl and print one line per page as results arrive
// 4. Stop early on Ctrl-C or when --deadline expires
// 5. Exit with proper code (0 = all pages ok, 1 = some pages failed, 2 = error)
// =============================================================================

mod cli;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;
use webcrawler::{crawl, CancellationToken, CrawlResult, Fetcher, HttpFetcher};

#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so stdout only carries results
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("webcrawler=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Returns:
//   Ok(0) = every crawled page was fetched without error
//   Ok(1) = at least one page failed
//   Err = could not start crawling
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let fetcher = HttpFetcher::new(Duration::from_secs(cli.timeout), &cli.user_agent)
        .context("failed to build HTTP client")?;

    let cancel = CancellationToken::new();
    cancel_on_shutdown(cancel.clone(), cli.deadline.map(Duration::from_secs));

    let fetcher: Arc<dyn Fetcher> = Arc::new(fetcher);
    let mut results = crawl(cancel.clone(), cli.url.as_str(), cli.depth, Some(fetcher));

    let mut ok = 0;
    let mut failed = 0;
    while let Some(result) = results.recv().await {
        if result.is_ok() {
            ok += 1;
        } else {
            failed += 1;
        }
        println!("{}", format_result(&result, cli.json)?);
    }

    if cancel.is_cancelled() {
        tracing::warn!("crawl stopped early; results are incomplete");
    }
    tracing::info!(ok, failed, total = ok + failed, "done");

    Ok(if failed > 0 { 1 } else { 0 })
}

// Cancels the crawl on Ctrl-C, or once the deadline passes
fn cancel_on_shutdown(cancel: CancellationToken, deadline: Option<Duration>) {
    tokio::spawn(async move {
        let expired = async {
            match deadline {
                Some(deadline) => tokio::time::sleep(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => tracing::info!("interrupted, stopping crawl"),
            _ = expired => tracing::info!(?deadline, "deadline reached, stopping crawl"),
            _ = cancel.cancelled() => return,
        }
        cancel.cancel();
    });
}

// Formats one result either as JSON or as "<status>\t<url>[\t<error>]"
fn format_result(result: &CrawlResult, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string(result)?);
    }

    Ok(match &result.error {
        Some(e) => format!("{}\t{}\t{}", result.status, result.url, e),
        None => format!("{}\t{}", result.status, result.url),
    })
}
