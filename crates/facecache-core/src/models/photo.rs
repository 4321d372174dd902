use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A photo containing a person's face, as reported by
/// `GET /persons/{personId}/photos`.
///
/// `photo_id` is unique within one person's list but the same photo can
/// appear under several persons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    #[serde(rename = "photoId")]
    pub photo_id: String,
    #[serde(rename = "photoBucket", default, deserialize_with = "null_as_default")]
    pub photo_bucket: String,
    #[serde(rename = "photoKey", default, deserialize_with = "null_as_default")]
    pub photo_key: String,
    #[serde(rename = "thumbKey", default, deserialize_with = "null_as_default")]
    pub thumb_key: String,
    #[serde(rename = "thumbURL", default, skip_serializing_if = "Option::is_none")]
    pub thumb_url: Option<String>,
    #[serde(rename = "photoURL", default, deserialize_with = "null_as_default")]
    pub photo_url: String,
}

impl Photo {
    /// Best URL for a small preview: the thumbnail when present, else the full photo.
    pub fn preview_url(&self) -> &str {
        self.thumb_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(&self.photo_url)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonPhotosResponse {
    #[serde(rename = "personId", default)]
    pub person_id: String,
    #[serde(default)]
    pub photos: Vec<Photo>,
}
