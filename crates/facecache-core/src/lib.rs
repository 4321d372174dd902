//! facecache core library.
//!
//! Everything a frontend needs to browse clustered face photos:
//!
//! - `models`: `Person`, `Photo` and the backend response wrappers
//! - `api`: the REST client and the `PhotoBackend` seam
//! - `cache`: TTL-bound persistent store, photo URL registry, seen-photo tracker
//! - `controllers`: page state machines for the persons listing and person detail
//! - `config`: base URL and directory resolution

pub mod api;
pub mod cache;
pub mod config;
pub mod controllers;
pub mod models;
pub mod utils;

pub use api::{ApiClient, ApiError, PhotoBackend};
pub use cache::{CacheStore, FileStorage, MemoryStorage, PhotoUrlRegistry, SeenPhotoTracker, Storage};
pub use config::Config;
pub use controllers::{LoadStatus, LoadStep, LoadTicket, PersonDetailController, PersonsController};
pub use models::{Person, PersonPhotosResponse, PersonsResponse, Photo, SortOrder};
