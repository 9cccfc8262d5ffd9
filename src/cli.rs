// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Usage:
//   webcrawler [OPTIONS] <URL>
//
// Example:
//   webcrawler --depth 3 --json https://example.com
// =============================================================================

use clap::Parser;
use url::Url;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
#[derive(Parser, Debug)]
#[command(
    name = "webcrawler",
    version,
    about = "Crawl a website and report the HTTP status of every page reached",
    long_about = "webcrawler starts at a URL, downloads and parses the page for links, and \
                  repeats the process for each link it finds, up to a maximum depth. Pages \
                  are fetched concurrently and no page is fetched more than once.\n\n\
                  One line is printed per page: the status, the URL, and the error if \
                  there was one. Logging goes to stderr and is controlled with RUST_LOG."
)]
pub struct Cli {
    /// The URL to start crawling from
    ///
    /// Parsed as a URL up front, so an invalid start URL is rejected before
    /// any crawling happens
    pub url: Url,

    /// Maximum crawl depth
    ///
    /// Depth 1 = just the starting page
    /// Depth 2 = starting page + all pages it links to
    /// etc.
    #[arg(long, default_value_t = 2)]
    pub depth: usize,

    /// Output one JSON object per page instead of tab-separated text
    #[arg(long)]
    pub json: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10, value_name = "SECS")]
    pub timeout: u64,

    /// Stop the crawl after this many seconds
    ///
    /// Pages already being fetched are allowed to finish, but their results
    /// are dropped and their links are not followed
    #[arg(long, value_name = "SECS")]
    pub deadline: Option<u64>,

    /// User-Agent header sent with every request
    #[arg(long, default_value = concat!("webcrawler/", env!("CARGO_PKG_VERSION")))]
    pub user_agent: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["webcrawler", "http://golang.org"]).unwrap();
        assert_eq!(cli.url.as_str(), "http://golang.org/");
        assert_eq!(cli.depth, 2);
        assert!(!cli.json);
        assert_eq!(cli.timeout, 10);
        assert_eq!(cli.deadline, None);
        assert!(cli.user_agent.starts_with("webcrawler/"));
    }

    #[test]
    fn test_all_options() {
        let cli = Cli::try_parse_from([
            "webcrawler",
            "--depth",
            "4",
            "--json",
            "--timeout",
            "3",
            "--deadline",
            "60",
            "--user-agent",
            "bot/1.0",
            "https://example.com/docs",
        ])
        .unwrap();

        assert_eq!(cli.depth, 4);
        assert!(cli.json);
        assert_eq!(cli.timeout, 3);
        assert_eq!(cli.deadline, Some(60));
        assert_eq!(cli.user_agent, "bot/1.0");
        assert_eq!(cli.url.as_str(), "https://example.com/docs");
    }

    #[test]
    fn test_url_is_required() {
        assert!(Cli::try_parse_from(["webcrawler"]).is_err());
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(Cli::try_parse_from(["webcrawler", "not a url"]).is_err());
    }
}
