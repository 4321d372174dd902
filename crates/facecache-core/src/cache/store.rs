use std::sync::Arc;

use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::utils::format_age_millis;

use super::Storage;

/// Entries expire 50 minutes after they were written.
/// Presigned URLs from the backend live for an hour; expiring the cache first
/// keeps cached URLs from outliving their signatures by much.
pub const CACHE_TTL_MINUTES: i64 = 50;

const CACHE_TTL_MS: i64 = CACHE_TTL_MINUTES * 60 * 1000;

/// Reserved storage keys. Everything this crate writes starts with `PREFIX`.
pub mod keys {
    pub const PREFIX: &str = "cache:";
    pub const PERSONS: &str = "cache:persons";
    pub const PERSON_PHOTOS_PREFIX: &str = "cache:personPhotos:";
    pub const PHOTO_URL_BY_ID: &str = "cache:photoUrlById";
    pub const SEEN_PHOTO_IDS: &str = "cache:seenPhotoIds";

    pub fn person_photos(person_id: &str) -> String {
        format!("{}{}", PERSON_PHOTOS_PREFIX, person_id)
    }
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Stored form of every cached value: `{ "data": ..., "timestamp": <epoch ms> }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: i64,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T) -> Self {
        Self::with_timestamp(data, now_millis())
    }

    pub fn with_timestamp(data: T, timestamp: i64) -> Self {
        Self { data, timestamp }
    }

    pub fn age_millis(&self, now: i64) -> i64 {
        now - self.timestamp
    }

    /// An entry exactly `CACHE_TTL_MINUTES` old is still valid.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.age_millis(now) > CACHE_TTL_MS
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_millis())
    }

    pub fn age_display(&self) -> String {
        format_age_millis(self.age_millis(now_millis()))
    }
}

/// TTL-aware JSON cache over a shared `Storage`.
///
/// Every failure degrades: unreadable, corrupt or expired entries read as
/// misses (and are deleted), failed writes are logged and dropped.
/// Clone is cheap and all clones see the same storage.
#[derive(Clone)]
pub struct CacheStore {
    storage: Arc<dyn Storage>,
}

impl CacheStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Cached value for `key`, or `None` on miss, corruption or expiry.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_entry(key).map(|entry| entry.data)
    }

    /// Like `get`, but keeps the write timestamp for age display.
    pub fn get_entry<T: DeserializeOwned>(&self, key: &str) -> Option<CacheEntry<T>> {
        let raw = match self.storage.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "Cache miss");
                return None;
            }
            Err(e) => {
                debug!(key, error = %e, "Cache read failed, treating as miss");
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                debug!(key, error = %e, "Corrupt cache entry, discarding");
                self.remove(key);
                return None;
            }
        };

        if entry.is_expired() {
            debug!(key, age_ms = entry.age_millis(now_millis()), "Cache entry expired, discarding");
            self.remove(key);
            return None;
        }

        debug!(key, "Cache hit");
        Some(entry)
    }

    /// Stamp `data` with the current time and persist it. Never fails.
    pub fn set<T: Serialize>(&self, key: &str, data: &T) {
        let entry = CacheEntry::new(data);
        let contents = match serde_json::to_string(&entry) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(key, error = %e, "Failed to serialize cache entry");
                return;
            }
        };
        if let Err(e) = self.storage.write(key, &contents) {
            warn!(key, error = %e, "Failed to cache data");
        }
    }

    pub fn remove(&self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            warn!(key, error = %e, "Failed to remove cache entry");
        }
    }

    /// Delete a named subset of keys.
    pub fn clear_keys(&self, keys: &[&str]) {
        for key in keys {
            self.remove(key);
        }
    }

    /// Delete every key in the `cache:` namespace, leaving other keys alone.
    pub fn clear_all(&self) {
        let all = match self.storage.keys() {
            Ok(all) => all,
            Err(e) => {
                warn!(error = %e, "Failed to list cache keys");
                return;
            }
        };
        let ours: Vec<&str> = all
            .iter()
            .map(String::as_str)
            .filter(|k| k.starts_with(keys::PREFIX))
            .collect();
        debug!(count = ours.len(), "Clearing cache namespace");
        self.clear_keys(&ours);
    }

    #[cfg(test)]
    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStorage;

    fn store() -> CacheStore {
        CacheStore::new(Arc::new(MemoryStorage::new()))
    }

    fn write_raw<T: Serialize>(store: &CacheStore, key: &str, data: T, timestamp: i64) {
        let raw = serde_json::to_string(&CacheEntry::with_timestamp(data, timestamp)).expect("serialize");
        store.storage().write(key, &raw).expect("raw write");
    }

    #[test]
    fn test_round_trip_within_ttl() {
        let store = store();
        store.set(keys::PERSONS, &vec!["a".to_string(), "b".to_string()]);
        let read: Option<Vec<String>> = store.get(keys::PERSONS);
        assert_eq!(read, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_stored_format_is_data_plus_timestamp() {
        let store = store();
        store.set(keys::SEEN_PHOTO_IDS, &vec!["x"]);
        let raw = store.storage().read(keys::SEEN_PHOTO_IDS).expect("read").expect("present");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value["data"], serde_json::json!(["x"]));
        assert!(value["timestamp"].as_i64().is_some());
    }

    #[test]
    fn test_expired_entry_is_removed_and_stays_absent() {
        let store = store();
        let stale = now_millis() - CACHE_TTL_MS - 1_000;
        write_raw(&store, keys::PERSONS, vec![1, 2, 3], stale);

        assert_eq!(store.get::<Vec<i32>>(keys::PERSONS), None);
        assert_eq!(store.storage().read(keys::PERSONS).expect("read"), None);
        // Second read is also a quiet miss
        assert_eq!(store.get::<Vec<i32>>(keys::PERSONS), None);
    }

    #[test]
    fn test_entry_just_inside_ttl_is_valid() {
        let store = store();
        let fresh = now_millis() - CACHE_TTL_MS + 60_000;
        write_raw(&store, keys::PERSONS, vec![7], fresh);
        assert_eq!(store.get::<Vec<i32>>(keys::PERSONS), Some(vec![7]));
    }

    #[test]
    fn test_ttl_boundary() {
        let entry = CacheEntry::with_timestamp((), 0);
        assert!(!entry.is_expired_at(CACHE_TTL_MS));
        assert!(entry.is_expired_at(CACHE_TTL_MS + 1));
    }

    #[test]
    fn test_corrupt_entry_is_removed() {
        let store = store();
        store.storage().write(keys::PERSONS, "{not json").expect("raw write");
        assert_eq!(store.get::<Vec<i32>>(keys::PERSONS), None);
        assert_eq!(store.storage().read(keys::PERSONS).expect("read"), None);
    }

    #[test]
    fn test_wrong_shape_counts_as_corrupt() {
        let store = store();
        store.set(keys::PERSONS, &"a string");
        assert_eq!(store.get::<Vec<i32>>(keys::PERSONS), None);
        assert_eq!(store.storage().read(keys::PERSONS).expect("read"), None);
    }

    #[test]
    fn test_quota_failure_is_swallowed() {
        let store = CacheStore::new(Arc::new(MemoryStorage::with_quota(64)));
        store.set(keys::PERSONS, &"x".repeat(1_000));
        assert_eq!(store.get::<String>(keys::PERSONS), None);
    }

    #[test]
    fn test_clear_all_only_touches_namespace() {
        let store = store();
        store.set(keys::PERSONS, &1);
        store.set(&keys::person_photos("p-1"), &2);
        store.set(keys::PHOTO_URL_BY_ID, &3);
        store.storage().write("theme", "dark").expect("raw write");

        store.clear_all();

        assert_eq!(store.get::<i32>(keys::PERSONS), None);
        assert_eq!(store.get::<i32>(&keys::person_photos("p-1")), None);
        assert_eq!(store.get::<i32>(keys::PHOTO_URL_BY_ID), None);
        assert_eq!(store.storage().read("theme").expect("read").as_deref(), Some("dark"));
    }

    #[test]
    fn test_clear_keys_is_selective() {
        let store = store();
        store.set(keys::PHOTO_URL_BY_ID, &1);
        store.set(keys::SEEN_PHOTO_IDS, &2);
        store.set(&keys::person_photos("p-1"), &3);

        store.clear_keys(&[keys::PHOTO_URL_BY_ID, keys::SEEN_PHOTO_IDS]);

        assert_eq!(store.get::<i32>(keys::PHOTO_URL_BY_ID), None);
        assert_eq!(store.get::<i32>(keys::SEEN_PHOTO_IDS), None);
        assert_eq!(store.get::<i32>(&keys::person_photos("p-1")), Some(3));
    }

    #[test]
    fn test_age_display_for_fresh_entry() {
        assert_eq!(CacheEntry::new(()).age_display(), "just now");
    }
}
