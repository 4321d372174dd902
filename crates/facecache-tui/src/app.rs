//! Application state for the facecache terminal browser.
//!
//! The `App` owns both page controllers and the shared cache store. Network
//! fetches run on spawned tasks and report back through an MPSC channel; the
//! results are applied to controller state only from `check_background_tasks`
//! on the UI loop.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use facecache_core::utils::is_presigned_url_expired;
use facecache_core::{
    ApiClient, ApiError, CacheStore, Config, FileStorage, LoadStep, LoadTicket, MemoryStorage,
    Person, PersonDetailController, PersonPhotosResponse, PersonsController, PersonsResponse, Storage,
};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background fetch channel.
/// At most a handful of fetches are ever in flight at once.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Number of rows to move on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Longest accepted search query.
const MAX_SEARCH_LENGTH: usize = 64;

// ============================================================================
// UI State Types
// ============================================================================

/// Which page is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Persons,
    Person,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    ConfirmingClear,
    ConfirmingQuit,
    Quitting,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Outcome of a spawned fetch, tagged with the ticket of the view that asked.
enum FetchResult {
    Persons(LoadTicket, Result<PersonsResponse, ApiError>),
    PersonPhotos(LoadTicket, Result<PersonPhotosResponse, ApiError>),
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub config: Config,
    api: Option<ApiClient>,
    /// Why `api` is missing, when the base URL is set but unusable.
    pub api_error: Option<String>,

    pub persons: PersonsController,
    pub person: Option<PersonDetailController>,
    store: CacheStore,

    // UI State
    pub page: Page,
    pub state: AppState,
    pub persons_selection: usize,
    pub photo_selection: usize,

    // Background task channel
    fetch_rx: mpsc::Receiver<FetchResult>,
    fetch_tx: mpsc::Sender<FetchResult>,

    pub status_message: Option<String>,
}

impl App {
    /// Create the app over the on-disk cache, falling back to an in-memory
    /// store when the cache directory is unusable.
    pub fn new(config: Config) -> Self {
        let storage: Arc<dyn Storage> = match config.cache_dir().and_then(FileStorage::new) {
            Ok(storage) => {
                debug!(dir = %storage.dir().display(), "Using file cache");
                Arc::new(storage)
            }
            Err(e) => {
                warn!(error = %e, "Cache directory unavailable, caching in memory only");
                Arc::new(MemoryStorage::new())
            }
        };
        Self::with_store(config, CacheStore::new(storage))
    }

    pub fn with_store(config: Config, store: CacheStore) -> Self {
        let (api, api_error) = match ApiClient::from_config(&config) {
            Ok(api) => (Some(api), None),
            Err(ApiError::NotConfigured) => (None, None),
            Err(e) => {
                error!(error = %e, "Unusable API base URL");
                (None, Some(e.to_string()))
            }
        };

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        let mut persons = PersonsController::new(store.clone());
        if api.is_some() {
            persons.hydrate();
        }

        Self {
            config,
            api,
            api_error,
            persons,
            person: None,
            store,
            page: Page::Persons,
            state: AppState::Normal,
            persons_selection: 0,
            photo_selection: 0,
            fetch_rx: rx,
            fetch_tx: tx,
            status_message: None,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api.is_some()
    }

    // =========================================================================
    // Persons page
    // =========================================================================

    pub fn load_persons(&mut self, force_refresh: bool) {
        let Some(api) = self.api.clone() else {
            self.status_message = Some("API base URL not configured".to_string());
            return;
        };

        match self.persons.begin_load(force_refresh) {
            LoadStep::FromCache => {
                self.status_message = Some("Loaded persons from cache".to_string());
                self.clamp_persons_selection();
            }
            LoadStep::Fetch(ticket) => {
                self.status_message = Some("Fetching persons...".to_string());
                let tx = self.fetch_tx.clone();
                tokio::spawn(async move {
                    let result = api.get_persons().await;
                    Self::send_result(&tx, FetchResult::Persons(ticket, result)).await;
                });
            }
        }
    }

    pub fn clear_cache(&mut self) {
        self.persons.clear_cache();
        self.persons_selection = 0;
        self.status_message = Some("Cache cleared".to_string());
    }

    pub fn toggle_sort(&mut self) {
        self.persons.toggle_sort();
        self.persons_selection = 0;
    }

    pub fn selected_person(&self) -> Option<&Person> {
        self.persons.visible_persons().get(self.persons_selection).copied()
    }

    fn clamp_persons_selection(&mut self) {
        let len = self.persons.visible_persons().len();
        self.persons_selection = self.persons_selection.min(len.saturating_sub(1));
    }

    pub fn push_search_char(&mut self, c: char) {
        if can_add_search_char(self.persons.search_query.chars().count(), c) {
            self.persons.search_query.push(c);
            self.persons_selection = 0;
        }
    }

    pub fn pop_search_char(&mut self) {
        self.persons.search_query.pop();
        self.persons_selection = 0;
    }

    pub fn clear_search(&mut self) {
        self.persons.search_query.clear();
        self.persons_selection = 0;
    }

    // =========================================================================
    // Person page
    // =========================================================================

    /// Open the detail page for the highlighted person. Fetches only when the
    /// cache has nothing for them.
    pub fn open_selected_person(&mut self) {
        let Some(person_id) = self.selected_person().map(|p| p.person_id.clone()) else {
            return;
        };

        info!(%person_id, "Opening person");
        let detail = PersonDetailController::activate(self.store.clone(), person_id);
        let needs_fetch = !detail.has_loaded();
        self.person = Some(detail);
        self.page = Page::Person;
        self.photo_selection = 0;
        self.status_message = None;

        if needs_fetch {
            self.load_person(false);
        }
    }

    pub fn close_person(&mut self) {
        self.person = None;
        self.page = Page::Persons;
        self.status_message = None;
    }

    pub fn load_person(&mut self, force_refresh: bool) {
        let Some(api) = self.api.clone() else {
            return;
        };
        let Some(detail) = self.person.as_mut() else {
            return;
        };

        match detail.begin_load(force_refresh) {
            LoadStep::FromCache => {
                self.status_message = Some("Loaded photos from cache".to_string());
                self.clamp_photo_selection();
            }
            LoadStep::Fetch(ticket) => {
                self.status_message = Some("Fetching photos...".to_string());
                let person_id = detail.person_id().to_string();
                let tx = self.fetch_tx.clone();
                tokio::spawn(async move {
                    let result = api.get_person_photos(&person_id).await;
                    Self::send_result(&tx, FetchResult::PersonPhotos(ticket, result)).await;
                });
            }
        }
    }

    pub fn clear_global_photo_cache(&mut self) {
        if let Some(detail) = self.person.as_mut() {
            detail.clear_global_photo_cache();
            self.status_message = Some("Photo URL and seen caches cleared".to_string());
        }
    }

    fn clamp_photo_selection(&mut self) {
        let len = self.person.as_ref().map_or(0, |d| d.photos().len());
        self.photo_selection = self.photo_selection.min(len.saturating_sub(1));
    }

    // =========================================================================
    // Lightbox
    // =========================================================================

    pub fn lightbox_open(&self) -> bool {
        self.person.as_ref().is_some_and(|d| d.lightbox().is_open())
    }

    pub fn open_lightbox(&mut self) {
        let index = self.photo_selection;
        if let Some(detail) = self.person.as_mut() {
            if detail.open_photo(index) {
                self.check_current_image();
            }
        }
    }

    pub fn close_lightbox(&mut self) {
        if let Some(detail) = self.person.as_mut() {
            self.photo_selection = detail.lightbox().index();
            detail.close_lightbox();
        }
    }

    pub fn lightbox_next(&mut self) {
        if self.person.as_mut().is_some_and(|d| d.next_photo()) {
            self.check_current_image();
        }
    }

    pub fn lightbox_prev(&mut self) {
        if self.person.as_mut().is_some_and(|d| d.prev_photo()) {
            self.check_current_image();
        }
    }

    /// Flag the shown photo when its presigned URL has already lapsed.
    fn check_current_image(&mut self) {
        let Some(detail) = self.person.as_mut() else {
            return;
        };
        let expired = detail
            .current_photo()
            .is_some_and(|p| is_presigned_url_expired(&p.photo_url, Utc::now()));
        if expired {
            debug!(person_id = detail.person_id(), "Current photo URL expired");
            detail.mark_image_error();
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    fn current_list_len(&self) -> usize {
        match self.page {
            Page::Persons => self.persons.visible_persons().len(),
            Page::Person => self.person.as_ref().map_or(0, |d| d.photos().len()),
        }
    }

    fn selection_mut(&mut self) -> &mut usize {
        match self.page {
            Page::Persons => &mut self.persons_selection,
            Page::Person => &mut self.photo_selection,
        }
    }

    /// Move the current page's selection by `delta` rows, clamped to the list.
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.current_list_len();
        let selection = self.selection_mut();
        if len == 0 {
            *selection = 0;
            return;
        }
        *selection = selection.saturating_add_signed(delta).min(len - 1);
    }

    pub fn select_first(&mut self) {
        *self.selection_mut() = 0;
    }

    pub fn select_last(&mut self) {
        let last = self.current_list_len().saturating_sub(1);
        *self.selection_mut() = last;
    }

    // =========================================================================
    // Background tasks
    // =========================================================================

    async fn send_result(tx: &mpsc::Sender<FetchResult>, result: FetchResult) {
        if tx.send(result).await.is_err() {
            error!("Failed to send fetch result - channel closed");
        }
    }

    /// Apply every fetch result that has arrived since the last tick.
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.fetch_rx.try_recv() {
            self.process_fetch_result(result);
        }
    }

    fn process_fetch_result(&mut self, result: FetchResult) {
        match result {
            FetchResult::Persons(ticket, result) => {
                let failed = result.is_err();
                if self.persons.complete_load(ticket, result) {
                    self.status_message = Some(if failed {
                        "Failed to load persons".to_string()
                    } else {
                        format!("Loaded {} persons", self.persons.persons().len())
                    });
                    self.clamp_persons_selection();
                }
            }
            FetchResult::PersonPhotos(ticket, result) => {
                let failed = result.is_err();
                let Some(detail) = self.person.as_mut() else {
                    debug!("Dropping photos result, person page closed");
                    return;
                };
                if detail.complete_load(ticket, result) {
                    self.status_message = Some(if failed {
                        "Failed to load photos".to_string()
                    } else {
                        format!("Loaded {} photos", detail.photos().len())
                    });
                    self.clamp_photo_selection();
                }
            }
        }
    }
}

// ============================================================================
// Input validation helpers
// ============================================================================

/// Check if a search character should be accepted
pub fn can_add_search_char(current_len: usize, c: char) -> bool {
    current_len < MAX_SEARCH_LENGTH && !c.is_control()
}

// ============================================================================
// Tests
// ============================================================================
