//! The page queue: a deduplicating work list of discovered URLs.
//!
//! This is the single source of truth for "what remains to build". URLs enter
//! either from the route-table seed scan or from discovery during rendering;
//! once a URL is known — in any state — adding it again is a no-op.
//!
//! ## States
//!
//! ```text
//! add(url) ──▶ Pending ──next()──▶ Reserved ──mark_done()──▶ Done
//! ```
//!
//! `Reserved` is the at-most-once-render reservation taken by [`PageQueue::next`]:
//! a reserved URL is never handed out a second time, even if the caller asks
//! for the next entry again before marking the first done. `Done` is terminal;
//! there is no path back to `Pending` (no re-render within a run).
//!
//! ## Sharing
//!
//! The queue is mutated by two collaborators: the build orchestrator (seeding
//! and draining) and the URL resolver (enqueueing as a side effect of link
//! generation deep inside render code). Both hold a cloned [`QueueHandle`]
//! passed in at construction time — no ambient state, so tests can inject a
//! queue and inspect it afterwards.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("url is not in the page queue: {0}")]
    Unknown(String),
    #[error("url was already marked done: {0}")]
    AlreadyDone(String),
}

/// Lifecycle state of a queued page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// Discovered, not yet handed out for rendering.
    Pending,
    /// Handed out by `next()`, render in flight.
    Reserved,
    /// Rendered and written. Terminal.
    Done,
}

/// Insertion-ordered, deduplicating page list.
///
/// Most callers want the shared [`QueueHandle`] rather than this struct
/// directly; the plain struct exists so unit tests can drive the state
/// machine without locking.
#[derive(Debug, Default)]
pub struct PageQueue {
    entries: Vec<(String, PageState)>,
    index: HashMap<String, usize>,
}

impl PageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a URL. Idempotent: a URL already present in any state is
    /// left untouched and `false` is returned.
    pub fn add(&mut self, url: &str) -> bool {
        if self.index.contains_key(url) {
            return false;
        }
        self.index.insert(url.to_string(), self.entries.len());
        self.entries.push((url.to_string(), PageState::Pending));
        true
    }

    /// Hand out the first pending URL in insertion order, reserving it so it
    /// cannot be handed out twice. Returns `None` when nothing is pending.
    pub fn next(&mut self) -> Option<String> {
        for (url, state) in &mut self.entries {
            if *state == PageState::Pending {
                *state = PageState::Reserved;
                return Some(url.clone());
            }
        }
        None
    }

    /// Transition a URL to `Done`. Erroring on unknown or already-done URLs
    /// keeps the "every added URL reaches Done exactly once" invariant loud.
    pub fn mark_done(&mut self, url: &str) -> Result<(), QueueError> {
        let idx = *self
            .index
            .get(url)
            .ok_or_else(|| QueueError::Unknown(url.to_string()))?;
        let state = &mut self.entries[idx].1;
        if *state == PageState::Done {
            return Err(QueueError::AlreadyDone(url.to_string()));
        }
        *state = PageState::Done;
        Ok(())
    }

    pub fn state_of(&self, url: &str) -> Option<PageState> {
        self.index.get(url).map(|&i| self.entries[i].1)
    }

    /// Total number of known URLs, whatever their state.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// URLs not yet done (pending or reserved).
    pub fn remaining(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, s)| *s != PageState::Done)
            .count()
    }

    /// Snapshot of all known URLs in insertion order.
    pub fn urls(&self) -> Vec<String> {
        self.entries.iter().map(|(u, _)| u.clone()).collect()
    }
}

/// Clonable shared handle over a [`PageQueue`].
///
/// Injected into both the [`Builder`](crate::Builder) and the
/// [`UrlResolver`](crate::UrlResolver). The mutex keeps add/next/mark_done
/// individually atomic, which is all a sequential drain needs; `next()`'s
/// reservation is what a future concurrent drain would lean on.
#[derive(Debug, Clone, Default)]
pub struct QueueHandle(Arc<Mutex<PageQueue>>);

impl QueueHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, url: &str) -> bool {
        self.0.lock().add(url)
    }

    pub fn next(&self) -> Option<String> {
        self.0.lock().next()
    }

    pub fn mark_done(&self, url: &str) -> Result<(), QueueError> {
        self.0.lock().mark_done(url)
    }

    pub fn state_of(&self, url: &str) -> Option<PageState> {
        self.0.lock().state_of(url)
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.0.lock().remaining()
    }

    pub fn urls(&self) -> Vec<String> {
        self.0.lock().urls()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent_across_states() {
        let mut queue = PageQueue::new();
        assert!(queue.add("https://example.com/"));
        assert!(!queue.add("https://example.com/"));

        // Re-adding while reserved
        let url = queue.next().unwrap();
        assert!(!queue.add(&url));

        // Re-adding while done
        queue.mark_done(&url).unwrap();
        assert!(!queue.add(&url));

        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn next_returns_insertion_order() {
        let mut queue = PageQueue::new();
        queue.add("https://example.com/");
        queue.add("https://example.com/blog");
        queue.add("https://example.com/about");

        assert_eq!(queue.next().as_deref(), Some("https://example.com/"));
        assert_eq!(queue.next().as_deref(), Some("https://example.com/blog"));
        assert_eq!(queue.next().as_deref(), Some("https://example.com/about"));
        assert_eq!(queue.next(), None);
    }

    #[test]
    fn next_never_hands_out_a_url_twice() {
        let mut queue = PageQueue::new();
        queue.add("https://example.com/");
        assert!(queue.next().is_some());
        // Not yet marked done, but reserved — must not come back.
        assert_eq!(queue.next(), None);
    }

    #[test]
    fn mark_done_is_terminal() {
        let mut queue = PageQueue::new();
        queue.add("https://example.com/");
        let url = queue.next().unwrap();
        queue.mark_done(&url).unwrap();

        assert_eq!(queue.state_of(&url), Some(PageState::Done));
        assert!(matches!(
            queue.mark_done(&url),
            Err(QueueError::AlreadyDone(_))
        ));
    }

    #[test]
    fn mark_done_unknown_url_errors() {
        let mut queue = PageQueue::new();
        assert!(matches!(
            queue.mark_done("https://example.com/never-added"),
            Err(QueueError::Unknown(_))
        ));
    }

    #[test]
    fn urls_added_during_drain_are_picked_up() {
        let mut queue = PageQueue::new();
        queue.add("https://example.com/");
        let first = queue.next().unwrap();
        // Discovery while the first page renders
        queue.add("https://example.com/post/42");
        queue.mark_done(&first).unwrap();

        assert_eq!(
            queue.next().as_deref(),
            Some("https://example.com/post/42")
        );
    }

    #[test]
    fn remaining_counts_pending_and_reserved() {
        let mut queue = PageQueue::new();
        queue.add("https://example.com/a");
        queue.add("https://example.com/b");
        assert_eq!(queue.remaining(), 2);

        let a = queue.next().unwrap();
        assert_eq!(queue.remaining(), 2);

        queue.mark_done(&a).unwrap();
        assert_eq!(queue.remaining(), 1);
    }

    #[test]
    fn handle_clones_share_state() {
        let handle = QueueHandle::new();
        let other = handle.clone();

        handle.add("https://example.com/");
        assert_eq!(other.len(), 1);

        let url = other.next().unwrap();
        other.mark_done(&url).unwrap();
        assert_eq!(handle.state_of(&url), Some(PageState::Done));
        assert_eq!(handle.remaining(), 0);
    }
}
