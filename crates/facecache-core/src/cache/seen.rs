//! Global record of photo ids that have appeared in any loaded person's list.
//!
//! The set only grows (by union) until cleared, so concurrent additions are
//! commutative and the stored result does not depend on their order.

use std::collections::BTreeSet;

use super::store::keys;
use super::CacheStore;

pub type SeenPhotoIds = BTreeSet<String>;

#[derive(Clone)]
pub struct SeenPhotoTracker {
    store: CacheStore,
}

impl SeenPhotoTracker {
    pub fn new(store: CacheStore) -> Self {
        Self { store }
    }

    pub fn get_all(&self) -> SeenPhotoIds {
        self.store.get(keys::SEEN_PHOTO_IDS).unwrap_or_default()
    }

    pub fn has(&self, photo_id: &str) -> bool {
        self.get_all().contains(photo_id)
    }

    pub fn add_many<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = self.get_all();
        seen.extend(ids.into_iter().map(Into::into));
        self.store.set(keys::SEEN_PHOTO_IDS, &seen);
    }

    pub fn clear(&self) {
        self.store.remove(keys::SEEN_PHOTO_IDS);
    }
}
