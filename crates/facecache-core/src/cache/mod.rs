//! Local caching module.
//!
//! Everything is stored as JSON `CacheEntry` values in a flat key/value
//! `Storage` and considered expired 50 minutes after it was written.
//!
//! - `CacheStore`: TTL-aware get/set/clear over any `Storage`
//! - `PhotoUrlRegistry`: last-known live URL per photo id
//! - `SeenPhotoTracker`: photo ids shown in any person's list so far

pub mod photo_urls;
pub mod seen;
pub mod storage;
pub mod store;

pub use photo_urls::{PhotoUrlMap, PhotoUrlRegistry};
pub use seen::{SeenPhotoIds, SeenPhotoTracker};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{keys, CacheEntry, CacheStore, CACHE_TTL_MINUTES};
