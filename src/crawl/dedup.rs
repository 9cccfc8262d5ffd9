// src/crawl/dedup.rs
// =============================================================================
// Tracks which URLs have already been scheduled during one crawl.
//
// Every crawl task shares one DedupFilter. The only way in is `ensure`,
// which checks and inserts under a single lock, so two tasks that discover
// the same link at the same moment can never both schedule it.
// =============================================================================

use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct DedupFilter {
    seen: Mutex<HashSet<String>>,
}

impl DedupFilter {
    pub fn new() -> Self {
        Self::default()
    }

    // Inserts `url` if it is not already present
    //
    // Returns true if the url was ALREADY present before this call.
    // Exactly one of any number of concurrent calls for the same url
    // returns false.
    pub fn ensure(&self, url: &str) -> bool {
        // A panic while holding the lock cannot leave the set half-updated,
        // so a poisoned lock is still safe to use
        let mut seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());
        if seen.contains(url) {
            return true;
        }
        seen.insert(url.to_string());
        false
    }

    /// Number of URLs admitted so far
    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_ensure_reports_previous_presence() {
        let filter = DedupFilter::new();
        assert!(filter.is_empty());

        assert!(!filter.ensure("http://golang.org/"));
        assert!(filter.ensure("http://golang.org/"));
        assert!(!filter.ensure("http://golang.org/pkg/"));
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn test_identifiers_are_opaque() {
        // Normalization is the fetcher's job; these are three different keys
        let filter = DedupFilter::new();
        assert!(!filter.ensure("http://golang.org/pkg/"));
        assert!(!filter.ensure("http://golang.org/pkg/#header"));
        assert!(!filter.ensure("/pkg/"));
        assert_eq!(filter.len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_ensure_admits_exactly_once() {
        let filter = Arc::new(DedupFilter::new());
        let mut handles = Vec::new();

        for _ in 0..64 {
            let filter = Arc::clone(&filter);
            handles.push(tokio::spawn(async move {
                (0..100)
                    .filter(|i| !filter.ensure(&format!("http://example.com/{}", i)))
                    .count()
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            admitted += handle.await.unwrap();
        }

        assert_eq!(admitted, 100);
        assert_eq!(filter.len(), 100);
    }
}
