// src/fetcher/html.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// We also use the `url` crate to:
// - Resolve relative URLs to absolute URLs
// - Drop the fragment (the part after '#') so that `page#a` and `page#b`
//   count as the same page
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

// Extracts all links from HTML content
//
// Parameters:
//   html: the HTML content to parse
//   base: the URL of the page (for resolving relative links)
//
// Returns: absolute http(s) URLs in the order they appear in the page.
// Duplicates are kept; the crawler decides what has been seen before.
//
// Example:
//   html = "<a href='/docs#intro'>Docs</a>"
//   base = "https://example.com/page"
//   result = ["https://example.com/docs"]
pub fn extract_links(html: &str, base: &Url) -> Vec<String> {
    let mut links = Vec::new();
    if html.is_empty() {
        return links;
    }

    let document = Html::parse_document(html);

    // "a[href]" is a constant, valid selector
    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return links,
    };

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            match resolve_link(base, href) {
                Some(url) => links.push(url),
                None => tracing::debug!(href, base = %base, "skipping unresolvable link"),
            }
        }
    }

    tracing::debug!(count = links.len(), page = %base, "extracted links");
    links
}

// Resolves a possibly-relative href against the page it was found on
//
// Returns None when the href does not resolve, or resolves to something
// other than http/https (mailto:, javascript:, tel:, ...).
//
// Examples (base = "http://golang.org/about/someone"):
//   "/blog/"       -> "http://golang.org/blog/"
//   "me/"          -> "http://golang.org/about/me/"
//   " \t/~user/\n" -> "http://golang.org/~user/"
//   "you#top"      -> "http://golang.org/about/you"
pub fn resolve_link(base: &Url, href: &str) -> Option<String> {
    let mut url = base.join(href.trim()).ok()?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);
    Some(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn with_links(hrefs: &[&str]) -> String {
        let mut body = String::from("<html><body>");
        for href in hrefs {
            body.push_str(&format!("<a href=\"{}\">link</a>", href));
        }
        body.push_str("</body></html>");
        body
    }

    #[rstest]
    #[case("http://golang.org/pkg/", Some("http://golang.org/pkg/"))]
    #[case("/blog/", Some("http://golang.org/blog/"))]
    #[case("me/", Some("http://golang.org/about/me/"))]
    #[case(" \t/~user/\n", Some("http://golang.org/~user/"))]
    #[case("you#top", Some("http://golang.org/about/you"))]
    #[case("#section", Some("http://golang.org/about/someone"))]
    #[case("mailto:gopher@golang.org", None)]
    #[case("javascript:void(0)", None)]
    #[case("http://[::1]:namedport", None)]
    fn test_resolve_link(#[case] href: &str, #[case] expected: Option<&str>) {
        let base = Url::parse("http://golang.org/about/someone").unwrap();
        assert_eq!(resolve_link(&base, href).as_deref(), expected);
    }

    #[test]
    fn test_extract_links_keeps_page_order() {
        let base = Url::parse("http://golang.org/about/someone").unwrap();
        let html = with_links(&[
            "http://golang.org/pkg/",
            "http://golang.org/cmd/",
            "/blog/",
            "me/",
            " \t/~user/\n",
            "you#top",
        ]);

        assert_eq!(
            extract_links(&html, &base),
            vec![
                "http://golang.org/pkg/",
                "http://golang.org/cmd/",
                "http://golang.org/blog/",
                "http://golang.org/about/me/",
                "http://golang.org/~user/",
                "http://golang.org/about/you",
            ]
        );
    }

    #[test]
    fn test_extract_links_keeps_duplicates() {
        let base = Url::parse("https://example.com/").unwrap();
        let html = with_links(&["/a", "/a#one", "/a#two"]);
        assert_eq!(extract_links(&html, &base).len(), 3);
    }

    #[test]
    fn test_extract_links_empty_page() {
        let base = Url::parse("https://example.com/").unwrap();
        assert!(extract_links("", &base).is_empty());
        assert!(extract_links(&with_links(&[]), &base).is_empty());
    }

    #[test]
    fn test_anchor_without_href_is_ignored() {
        let base = Url::parse("https://example.com/").unwrap();
        let html = r#"<a name="top">Top</a><a href="/docs">Docs</a>"#;
        assert_eq!(extract_links(html, &base), vec!["https://example.com/docs"]);
    }
}
