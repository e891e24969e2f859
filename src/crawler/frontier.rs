//! Crawl frontier
//!
//! The frontier owns the FIFO queue of pending targets and the visited
//! set, guarded together by one mutex so a membership test and insert are
//! a single atomic step. It also tracks how many dequeued targets are
//! still being processed, which is what lets `next()` distinguish
//! "momentarily empty" from "the crawl is over".

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::Notify;
use url::Url;

/// A URL admitted to the frontier, tagged with its link distance from
/// the seed
#[derive(Debug, Clone)]
pub struct CrawlTarget {
    pub url: Url,
    pub depth: u32,
}

#[derive(Debug, Default)]
struct FrontierState {
    queue: VecDeque<CrawlTarget>,
    visited: HashSet<String>,
    /// URLs ever admitted; bounded by max_pages
    enqueued: usize,
    /// Targets handed out by next() and not yet marked done
    in_flight: usize,
    closed: bool,
}

/// Shared breadth-first frontier with dedup and bounds
pub struct Frontier {
    state: Mutex<FrontierState>,
    notify: Notify,
    max_pages: usize,
    max_depth: Option<u32>,
}

impl Frontier {
    pub fn new(max_pages: usize, max_depth: Option<u32>) -> Self {
        Self {
            state: Mutex::new(FrontierState::default()),
            notify: Notify::new(),
            max_pages,
            max_depth,
        }
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Offers a URL to the frontier
    ///
    /// Returns true if the target was admitted. Refused when the frontier
    /// is closed, the URL was already seen, the depth bound is exceeded,
    /// or `max_pages` URLs have already been admitted. The visited-set
    /// insert happens here, at enqueue time, so two workers discovering
    /// the same URL cannot both admit it.
    pub fn try_enqueue(&self, url: Url, depth: u32) -> bool {
        let mut state = self.lock();

        if state.closed {
            return false;
        }
        if let Some(max_depth) = self.max_depth {
            if depth > max_depth {
                return false;
            }
        }
        if state.enqueued >= self.max_pages {
            return false;
        }
        if !state.visited.insert(url.as_str().to_string()) {
            return false;
        }

        state.enqueued += 1;
        state.queue.push_back(CrawlTarget { url, depth });
        drop(state);

        self.notify.notify_one();
        true
    }

    /// Takes the next target, waiting while the queue is empty but work
    /// is still in flight
    ///
    /// Returns `None` exactly when the queue is empty and nothing is in
    /// flight (the crawl is complete), or the frontier has been closed.
    pub async fn next(&self) -> Option<CrawlTarget> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);

            {
                let mut state = self.lock();
                if let Some(target) = state.queue.pop_front() {
                    state.in_flight += 1;
                    return Some(target);
                }
                if state.closed || state.in_flight == 0 {
                    // Wake any sibling workers parked on the same condition
                    self.notify.notify_waiters();
                    return None;
                }
                // Arm the notification while still holding the lock, so a
                // task_done/try_enqueue between unlock and await cannot be
                // missed.
                notified.as_mut().enable();
            }

            notified.as_mut().await;
        }
    }

    /// Marks one previously dequeued target as fully processed
    pub fn task_done(&self) {
        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        let drained = state.queue.is_empty() && state.in_flight == 0;
        drop(state);

        if drained {
            self.notify.notify_waiters();
        }
    }

    /// Closes the frontier: pending and future targets are discarded and
    /// all waiting workers wake up with `None`
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.queue.clear();
        drop(state);

        self.notify.notify_waiters();
    }

    /// Number of URLs ever admitted to the frontier
    pub fn enqueued(&self) -> usize {
        self.lock().enqueued
    }
}
