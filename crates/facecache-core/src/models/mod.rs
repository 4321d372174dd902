//! Data models for the face-clustering backend.
//!
//! - `Person`, `PersonsResponse`, `SortOrder`: the clustered persons listing
//! - `Photo`, `PersonPhotosResponse`: a single person's photos

pub mod person;
pub mod photo;

pub use person::{Person, PersonsResponse, SortOrder};
pub use photo::{PersonPhotosResponse, Photo};

use serde::{Deserialize, Deserializer};

/// Decode a JSON `null` as the type's default. The backend emits `null` for
/// URLs and keys whose object is missing.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
