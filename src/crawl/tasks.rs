// src/crawl/tasks.rs
// =============================================================================
// Counts crawl tasks that have been spawned but have not finished yet.
//
// How it works:
// 1. The parent calls `enter()` BEFORE spawning a child; this bumps the count
//    and returns a TaskGuard
// 2. The guard is moved into the child task
// 3. When the child finishes (on ANY path: success, error, early return,
//    panic) the guard is dropped and the count goes down
// 4. `wait_idle()` resolves once the count reaches zero
//
// Because a parent's own guard is still alive while it spawns children,
// the count cannot touch zero while a parent is part-way through expanding
// its links.
//
// Rust concepts:
// - Drop: Code that runs automatically when a value goes out of scope
// - Atomics: Lock-free counters shared between threads
// - Notify: A tokio primitive for "wake up whoever is waiting"
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
pub struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

impl InFlight {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers one more outstanding task. Call before spawning it.
    pub fn enter(self: &Arc<Self>) -> TaskGuard {
        self.count.fetch_add(1, Ordering::SeqCst);
        TaskGuard {
            in_flight: Arc::clone(self),
        }
    }

    pub fn outstanding(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    // Waits until every task that ever entered has finished
    pub async fn wait_idle(&self) {
        loop {
            // Register interest before checking the count, otherwise a
            // notification sent in between would be missed
            let notified = self.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }
}

// Held by a running crawl task; dropping it marks the task finished
#[derive(Debug)]
pub struct TaskGuard {
    in_flight: Arc<InFlight>,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        if self.in_flight.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.in_flight.idle.notify_waiters();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_idle_when_nothing_entered() {
        let in_flight = InFlight::new();
        assert_eq!(in_flight.outstanding(), 0);
        timeout(Duration::from_secs(1), in_flight.wait_idle())
            .await
            .expect("wait_idle should resolve immediately");
    }

    #[tokio::test]
    async fn test_guards_count_up_and_down() {
        let in_flight = InFlight::new();
        let first = in_flight.enter();
        let second = in_flight.enter();
        assert_eq!(in_flight.outstanding(), 2);

        drop(first);
        assert_eq!(in_flight.outstanding(), 1);
        drop(second);
        assert_eq!(in_flight.outstanding(), 0);
    }

    #[tokio::test]
    async fn test_wait_idle_blocks_until_last_guard_drops() {
        let in_flight = InFlight::new();
        let guard = in_flight.enter();

        let waiter = {
            let in_flight = Arc::clone(&in_flight);
            tokio::spawn(async move { in_flight.wait_idle().await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake up")
            .unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_nested_spawns_never_reach_zero_early() {
        // Each task spawns two children before its own guard drops
        fn spawn_tree(in_flight: &Arc<InFlight>, level: u32, guard: TaskGuard) {
            let in_flight = Arc::clone(in_flight);
            tokio::spawn(async move {
                let _guard = guard;
                tokio::task::yield_now().await;
                if level > 0 {
                    for _ in 0..2 {
                        let child = in_flight.enter();
                        spawn_tree(&in_flight, level - 1, child);
                    }
                }
            });
        }

        let in_flight = InFlight::new();
        let root = in_flight.enter();
        spawn_tree(&in_flight, 8, root);

        timeout(Duration::from_secs(5), in_flight.wait_idle())
            .await
            .expect("tree should finish");
        assert_eq!(in_flight.outstanding(), 0);
    }
}
