//! Registry of the most recently observed live URL for each photo.
//!
//! Presigned URLs expire on the server independently of the cache TTL. When a
//! fresh URL is seen for a photo it is recorded here, and any cached photo list
//! that mentions the same `photo_id` is patched from this map on read.
//!
//! The whole map is one cache entry, so it expires as a unit. Entries are only
//! ever upserted (last write wins per id) until the map is cleared, which makes
//! racing updates from overlapping loads converge.

use std::collections::HashMap;

use tracing::debug;

use crate::models::Photo;

use super::store::keys;
use super::CacheStore;

pub type PhotoUrlMap = HashMap<String, String>;

#[derive(Clone)]
pub struct PhotoUrlRegistry {
    store: CacheStore,
}

impl PhotoUrlRegistry {
    pub fn new(store: CacheStore) -> Self {
        Self { store }
    }

    pub fn snapshot(&self) -> PhotoUrlMap {
        self.store.get(keys::PHOTO_URL_BY_ID).unwrap_or_default()
    }

    pub fn get(&self, photo_id: &str) -> Option<String> {
        self.snapshot().remove(photo_id)
    }

    pub fn update(&self, photo_id: &str, url: &str) {
        self.update_many([(photo_id.to_string(), url.to_string())]);
    }

    /// Upsert a batch of `(photo_id, url)` pairs with a single store write.
    /// Empty URLs are not live and are skipped.
    pub fn update_many<I>(&self, pairs: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map = self.snapshot();
        let before = map.len();
        map.extend(pairs.into_iter().filter(|(_, url)| !url.is_empty()));
        debug!(added = map.len() - before, total = map.len(), "Updating photo URL registry");
        self.store.set(keys::PHOTO_URL_BY_ID, &map);
    }

    /// Replace each photo's URL with the registry's, where one is known.
    pub fn rehydrate(&self, photos: &mut [Photo]) {
        let map = self.snapshot();
        if map.is_empty() {
            return;
        }
        for photo in photos.iter_mut() {
            if let Some(url) = map.get(&photo.photo_id).filter(|u| !u.is_empty()) {
                photo.photo_url.clone_from(url);
            }
        }
    }

    pub fn clear(&self) {
        self.store.remove(keys::PHOTO_URL_BY_ID);
    }
}
