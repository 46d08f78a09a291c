// src/crawl/frontier.rs
// =============================================================================
// This module holds the crawl's shared to-do list.
//
// Three pieces of state live behind ONE lock:
// - queue: URLs waiting to be crawled (FIFO, so roughly breadth-first)
// - visited: every URL a worker has claimed, never shrinks
// - in_flight: how many workers are currently fetching/processing a page
//
// Keeping them under the same lock is what makes termination safe: a worker
// can look at "queue empty AND nobody in flight" as a single snapshot.
//
// Duplicates are allowed INTO the queue (two pages can link the same URL
// before either is crawled). They are weeded out when a worker dequeues,
// because marking a URL visited is an atomic check-and-insert.
//
// Rust concepts:
// - Mutex: only one worker touches the state at a time
// - Notify: lets idle workers sleep until there's something new to look at
// =============================================================================

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};

use tokio::sync::Notify;

/// What a worker should do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next {
    /// Crawl this URL (it's already marked visited)
    Page(String),
    /// Nothing queued, but another worker may still find links
    Wait,
    /// Crawl is over: page cap reached or no work left anywhere
    Done,
}

#[derive(Debug, Default)]
struct FrontierState {
    queue: VecDeque<String>,
    visited: HashSet<String>,
    in_flight: usize,
}

impl FrontierState {
    fn cap_reached(&self, max_pages: usize) -> bool {
        self.visited.len() >= max_pages
    }

    fn mark_visited_if_new(&mut self, url: &str, max_pages: usize) -> bool {
        if self.cap_reached(max_pages) || self.visited.contains(url) {
            return false;
        }
        self.visited.insert(url.to_string())
    }

    fn enqueue_if_unvisited(&mut self, url: String) -> bool {
        if self.visited.contains(&url) {
            return false;
        }
        self.queue.push_back(url);
        true
    }
}

/// The URL queue plus the visited-set
#[derive(Debug)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    changed: Notify,
    max_pages: usize,
}

impl Frontier {
    pub fn new(max_pages: usize) -> Self {
        Frontier {
            state: Mutex::new(FrontierState::default()),
            changed: Notify::new(),
            max_pages,
        }
    }

    // The lock is never held across an .await, and nothing inside it can
    // panic halfway through an update, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Pops the oldest queued URL, if any
    pub fn try_dequeue(&self) -> Option<String> {
        self.lock().queue.pop_front()
    }

    /// Atomically marks `url` visited
    ///
    /// Returns true only for the one call that actually added it. Once the
    /// page cap is reached nothing more is added and this returns false.
    pub fn mark_visited_if_new(&self, url: &str) -> bool {
        self.lock().mark_visited_if_new(url, self.max_pages)
    }

    /// Queues `url` unless it has already been visited
    pub fn enqueue_if_unvisited(&self, url: String) -> bool {
        let added = self.lock().enqueue_if_unvisited(url);
        if added {
            self.changed.notify_waiters();
        }
        added
    }

    /// Queues a batch of URLs, returns how many went in
    pub fn enqueue_all<I>(&self, urls: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let mut added = 0;
        {
            let mut state = self.lock();
            for url in urls {
                if state.enqueue_if_unvisited(url) {
                    added += 1;
                }
            }
        }
        if added > 0 {
            self.changed.notify_waiters();
        }
        added
    }

    /// Decides what the calling worker does next
    ///
    /// On `Next::Page` the URL is already in the visited-set and the caller
    /// counts as in flight until it calls `release()`.
    pub fn claim(&self) -> Next {
        let mut state = self.lock();

        while !state.cap_reached(self.max_pages) {
            let Some(url) = state.queue.pop_front() else {
                break;
            };
            if state.mark_visited_if_new(&url, self.max_pages) {
                state.in_flight += 1;
                return Next::Page(url);
            }
        }

        if state.cap_reached(self.max_pages) || state.in_flight == 0 {
            Next::Done
        } else {
            Next::Wait
        }
    }

    /// Marks the caller's current page as finished
    pub fn release(&self) {
        {
            let mut state = self.lock();
            state.in_flight = state.in_flight.saturating_sub(1);
        }
        self.changed.notify_waiters();
    }

    /// Waits until there is a page to crawl, or returns None when the crawl is over
    pub async fn next_page(&self) -> Option<String> {
        loop {
            // Created before looking at the state, so a notify_waiters() that
            // lands between claim() and .await is not lost
            let notified = self.changed.notified();

            match self.claim() {
                Next::Page(url) => return Some(url),
                Next::Done => return None,
                Next::Wait => notified.await,
            }
        }
    }

    pub fn visited_count(&self) -> usize {
        self.lock().visited.len()
    }

    pub fn queue_len(&self) -> usize {
        self.lock().queue.len()
    }

    #[cfg(test)]
    fn in_flight(&self) -> usize {
        self.lock().in_flight
    }
}
