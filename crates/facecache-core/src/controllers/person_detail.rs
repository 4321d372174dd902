//! Person detail page: one person's photos, seen badges and the lightbox.
//!
//! Ordering matters for the seen badges. The seen-photo snapshot shown on the
//! page is taken before this person's photos are added to the tracker, so a
//! person's own photos are never "seen" because of the current visit; only
//! photos that also appeared under another person light up.

use tracing::{debug, error, info};

use crate::api::{ApiError, PhotoBackend};
use crate::cache::{keys, CacheStore, PhotoUrlRegistry, SeenPhotoIds, SeenPhotoTracker};
use crate::models::{PersonPhotosResponse, Photo};

use super::{Lightbox, LoadStatus, LoadStep, LoadTicket, PageState};

pub struct PersonDetailController {
    person_id: String,
    store: CacheStore,
    urls: PhotoUrlRegistry,
    seen: SeenPhotoTracker,
    page: PageState<Photo>,
    previously_seen: SeenPhotoIds,
    lightbox: Lightbox,
}

impl PersonDetailController {
    /// Open the page for `person_id`: snapshot the seen set, then show the
    /// cached photo list (URLs patched from the registry) if there is one.
    pub fn activate(store: CacheStore, person_id: impl Into<String>) -> Self {
        let mut controller = Self {
            person_id: person_id.into(),
            urls: PhotoUrlRegistry::new(store.clone()),
            seen: SeenPhotoTracker::new(store.clone()),
            store,
            page: PageState::new(),
            previously_seen: SeenPhotoIds::new(),
            lightbox: Lightbox::default(),
        };
        controller.previously_seen = controller.seen.get_all();
        controller.load_from_cache();
        controller
    }

    fn cache_key(&self) -> String {
        keys::person_photos(&self.person_id)
    }

    fn load_from_cache(&mut self) -> bool {
        match self.store.get::<Vec<Photo>>(&self.cache_key()) {
            Some(mut photos) => {
                self.urls.rehydrate(&mut photos);
                debug!(person_id = %self.person_id, count = photos.len(), "Photos served from cache");
                self.page.loaded(photos);
                true
            }
            None => false,
        }
    }

    pub fn begin_load(&mut self, force_refresh: bool) -> LoadStep {
        self.page.start_loading();
        self.previously_seen = self.seen.get_all();

        if !force_refresh && self.load_from_cache() {
            return LoadStep::FromCache;
        }

        info!(person_id = %self.person_id, force_refresh, "Fetching photos");
        LoadStep::Fetch(self.page.ticket())
    }

    /// Apply a fetch outcome: prefer already-known URLs, register new ones,
    /// persist the merged list and mark every photo as seen.
    pub fn complete_load(&mut self, ticket: LoadTicket, result: Result<PersonPhotosResponse, ApiError>) -> bool {
        if !self.page.accepts(ticket) {
            debug!(person_id = %self.person_id, "Dropping photos result for a reset page");
            return false;
        }

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                error!(person_id = %self.person_id, error = %e, "Failed to load photos");
                self.page.failed(e.to_string());
                return true;
            }
        };

        let known = self.urls.snapshot();
        let mut new_urls = Vec::new();
        let mut photos = response.photos;
        for photo in photos.iter_mut() {
            match known.get(&photo.photo_id).filter(|u| !u.is_empty()) {
                Some(url) => photo.photo_url.clone_from(url),
                None if photo.photo_url.is_empty() => {}
                None => new_urls.push((photo.photo_id.clone(), photo.photo_url.clone())),
            }
        }
        if !new_urls.is_empty() {
            self.urls.update_many(new_urls);
        }

        self.store.set(&self.cache_key(), &photos);
        self.seen.add_many(photos.iter().map(|p| p.photo_id.clone()));

        info!(person_id = %self.person_id, count = photos.len(), "Photos loaded");
        self.page.loaded(photos);
        true
    }

    pub async fn load<B: PhotoBackend>(&mut self, backend: &B, force_refresh: bool) {
        if let LoadStep::Fetch(ticket) = self.begin_load(force_refresh) {
            let result = backend.fetch_person_photos(&self.person_id).await;
            self.complete_load(ticket, result);
        }
    }

    /// Forget every known photo URL and every seen id. Per-person photo lists
    /// stay cached.
    pub fn clear_global_photo_cache(&mut self) {
        info!("Clearing photo URL registry and seen photos");
        self.urls.clear();
        self.seen.clear();
        self.previously_seen.clear();
    }

    /// Whether `photo_id` had been seen under some person before this page's
    /// latest load.
    pub fn is_seen(&self, photo_id: &str) -> bool {
        self.previously_seen.contains(photo_id)
    }

    pub fn person_id(&self) -> &str {
        &self.person_id
    }

    pub fn photos(&self) -> &[Photo] {
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

    // ===== Lightbox =====

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    pub fn open_photo(&mut self, index: usize) -> bool {
        self.lightbox.open(index, self.page.items.len())
    }

    pub fn close_lightbox(&mut self) {
        self.lightbox.close();
    }

    pub fn next_photo(&mut self) -> bool {
        self.lightbox.next(self.page.items.len())
    }

    pub fn prev_photo(&mut self) -> bool {
        self.lightbox.prev()
    }

    pub fn navigate_to(&mut self, index: usize) -> bool {
        self.lightbox.navigate(index, self.page.items.len())
    }

    pub fn mark_image_error(&mut self) {
        self.lightbox.mark_image_error();
    }

    pub fn current_photo(&self) -> Option<&Photo> {
        self.lightbox.current(&self.page.items)
    }
}
