use tracing::{debug, error, info};

use crate::api::{ApiError, PhotoBackend};
use crate::cache::store::now_millis;
use crate::cache::{keys, CacheStore};
use crate::models::person::filter_and_sort;
use crate::models::{Person, PersonsResponse, SortOrder};
use crate::utils::format_age_millis;

use super::{LoadStatus, LoadStep, LoadTicket, PageState};

/// State for the persons listing page.
pub struct PersonsController {
    store: CacheStore,
    page: PageState<Person>,
    /// Write time (epoch ms) of the cache entry backing `persons()`.
    cached_at: Option<i64>,
    pub search_query: String,
    pub sort_order: SortOrder,
}

impl PersonsController {
    pub fn new(store: CacheStore) -> Self {
        Self {
            store,
            page: PageState::new(),
            cached_at: None,
            search_query: String::new(),
            sort_order: SortOrder::default(),
        }
    }

    /// Fill the page from cache without touching the network.
    pub fn hydrate(&mut self) -> bool {
        match self.store.get_entry::<Vec<Person>>(keys::PERSONS) {
            Some(entry) => {
                debug!(count = entry.data.len(), "Persons hydrated from cache");
                self.cached_at = Some(entry.timestamp);
                self.page.loaded(entry.data);
                true
            }
            None => false,
        }
    }

    pub fn begin_load(&mut self, force_refresh: bool) -> LoadStep {
        self.page.start_loading();

        if !force_refresh && self.hydrate() {
            return LoadStep::FromCache;
        }

        info!(force_refresh, "Fetching persons");
        LoadStep::Fetch(self.page.ticket())
    }

    /// Apply a fetch outcome. Returns false when the ticket is stale and the
    /// result was dropped.
    pub fn complete_load(&mut self, ticket: LoadTicket, result: Result<PersonsResponse, ApiError>) -> bool {
        if !self.page.accepts(ticket) {
            debug!("Dropping persons result for a reset page");
            return false;
        }

        match result {
            Ok(response) => {
                info!(count = response.persons.len(), "Persons loaded");
                self.store.set(keys::PERSONS, &response.persons);
                self.cached_at = Some(now_millis());
                self.page.loaded(response.persons);
            }
            Err(e) => {
                error!(error = %e, "Failed to load persons");
                self.page.failed(e.to_string());
            }
        }
        true
    }

    pub async fn load<B: PhotoBackend>(&mut self, backend: &B, force_refresh: bool) {
        if let LoadStep::Fetch(ticket) = self.begin_load(force_refresh) {
            let result = backend.fetch_persons().await;
            self.complete_load(ticket, result);
        }
    }

    /// Wipe the whole cache namespace and return to the unloaded state.
    pub fn clear_cache(&mut self) {
        info!("Clearing all cached data");
        self.store.clear_all();
        self.page.reset();
        self.cached_at = None;
    }

    pub fn toggle_sort(&mut self) {
        self.sort_order = self.sort_order.toggle();
    }

    /// The loaded list, filtered by `search_query` and sorted by `sort_order`.
    pub fn visible_persons(&self) -> Vec<&Person> {
        filter_and_sort(&self.page.items, &self.search_query, self.sort_order)
    }

    pub fn persons(&self) -> &[Person] {
        &self.page.items
    }

    pub fn status(&self) -> LoadStatus {
        self.page.status
    }

    pub fn is_loading(&self) -> bool {
        self.page.status == LoadStatus::Loading
    }

    pub fn has_loaded(&self) -> bool {
        self.page.has_loaded
    }

    pub fn error(&self) -> Option<&str> {
        self.page.error.as_deref()
    }

    pub fn cache_age_display(&self) -> Option<String> {
        self.cached_at.map(|ts| format_age_millis(now_millis() - ts))
    }
}
