//! Page controllers.
//!
//! Each page is an explicit `idle -> loading -> {loaded, error}` state machine.
//! A load is split in two so a frontend can run the network half on a spawned
//! task:
//!
//! 1. `begin_load(force_refresh)` moves to `Loading` and either finishes from
//!    cache (`LoadStep::FromCache`) or hands back a `LoadTicket`.
//! 2. `complete_load(ticket, result)` applies the fetch outcome, unless the
//!    ticket belongs to a view that has since been reset.
//!
//! `load(backend, force_refresh)` runs both halves inline.

pub mod lightbox;
pub mod person_detail;
pub mod persons;

use std::sync::atomic::{AtomicU64, Ordering};

pub use lightbox::Lightbox;
pub use person_detail::PersonDetailController;
pub use persons::PersonsController;

static NEXT_VIEW_TOKEN: AtomicU64 = AtomicU64::new(1);

fn fresh_view_token() -> u64 {
    NEXT_VIEW_TOKEN.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

/// Proof that a fetch was started by a particular view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    view: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStep {
    /// Served from cache; the page is already `Loaded`.
    FromCache,
    /// Cache miss or forced refresh; fetch and pass the result to `complete_load`.
    Fetch(LoadTicket),
}

/// State shared by both pages.
///
/// A failed load keeps whatever was loaded before, so the frontend can show
/// the error banner over the last good data.
#[derive(Debug)]
struct PageState<T> {
    status: LoadStatus,
    items: Vec<T>,
    has_loaded: bool,
    error: Option<String>,
    view: u64,
}

impl<T> PageState<T> {
    fn new() -> Self {
        Self {
            status: LoadStatus::Idle,
            items: Vec::new(),
            has_loaded: false,
            error: None,
            view: fresh_view_token(),
        }
    }

    fn start_loading(&mut self) {
        self.status = LoadStatus::Loading;
        self.error = None;
    }

    fn loaded(&mut self, items: Vec<T>) {
        self.items = items;
        self.has_loaded = true;
        self.status = LoadStatus::Loaded;
        self.error = None;
    }

    fn failed(&mut self, message: String) {
        self.status = LoadStatus::Error;
        self.error = Some(message);
    }

    /// Back to the initial unloaded state. In-flight loads are orphaned.
    fn reset(&mut self) {
        *self = Self::new();
    }

    fn ticket(&self) -> LoadTicket {
        LoadTicket { view: self.view }
    }

    fn accepts(&self, ticket: LoadTicket) -> bool {
        ticket.view == self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_keeps_previous_items() {
        let mut page: PageState<u32> = PageState::new();
        page.start_loading();
        page.loaded(vec![1, 2]);
        page.start_loading();
        page.failed("boom".to_string());

        assert_eq!(page.status, LoadStatus::Error);
        assert_eq!(page.items, vec![1, 2]);
        assert!(page.has_loaded);
        assert_eq!(page.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_reset_orphans_old_tickets() {
        let mut page: PageState<u32> = PageState::new();
        let ticket = page.ticket();
        assert!(page.accepts(ticket));

        page.reset();
        assert!(!page.accepts(ticket));
        assert!(page.accepts(page.ticket()));
    }

    #[test]
    fn test_tokens_are_unique_across_pages() {
        let a: PageState<u32> = PageState::new();
        let b: PageState<u32> = PageState::new();
        assert!(!a.accepts(b.ticket()));
    }
}
