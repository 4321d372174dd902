//! REST API client module for the face-clustering backend.
//!
//! This module provides the `ApiClient` for the two read endpoints
//! (`/persons` and `/persons/{personId}/photos`) and the `PhotoBackend`
//! trait the page controllers depend on, so tests can swap in a fake.

pub mod client;
pub mod error;

pub use client::{ApiClient, PhotoBackend};
pub use error::ApiError;
