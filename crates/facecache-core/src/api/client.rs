//! API client for the face-clustering REST backend.
//!
//! Both endpoints are unauthenticated reads. Photo and thumbnail URLs in the
//! responses are presigned object-storage links that expire server-side.

use std::future::Future;
use std::time::Duration;

use reqwest::{header, Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::{PersonPhotosResponse, PersonsResponse};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// Listing scans can be slow on a cold backend; 30s still fails fast enough for a UI.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Source of persons and per-person photo lists.
///
/// The page controllers depend on this rather than on `ApiClient` so they can
/// be driven by an in-memory fake.
pub trait PhotoBackend {
    fn fetch_persons(&self) -> impl Future<Output = Result<PersonsResponse, ApiError>> + Send;

    fn fetch_person_photos(
        &self,
        person_id: &str,
    ) -> impl Future<Output = Result<PersonPhotosResponse, ApiError>> + Send;
}

/// API client for the backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client rooted at `base_url`, which may carry a path prefix
    /// such as `/prod` and an optional trailing slash.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Create a client from configuration, failing with `NotConfigured` when
    /// no base URL is set.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        match config.api_base_url() {
            Some(url) => Self::new(&url),
            None => Err(ApiError::NotConfigured),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL by appending path segments to the base URL.
    /// Each segment is percent-encoded on its own.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, resource: &'static str, url: Url) -> Result<T, ApiError> {
        debug!(%url, "GET");

        let response = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "Request failed");
            return Err(ApiError::from_status(resource, status));
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("{} response: {}", resource, e)))
    }

    // ===== Data Fetching Methods =====

    /// Fetch every person cluster.
    pub async fn get_persons(&self) -> Result<PersonsResponse, ApiError> {
        let url = self.endpoint(&["persons"])?;
        self.get("persons", url).await
    }

    /// Fetch the photos in which `person_id` appears.
    pub async fn get_person_photos(&self, person_id: &str) -> Result<PersonPhotosResponse, ApiError> {
        let url = self.endpoint(&["persons", person_id, "photos"])?;
        self.get("photos", url).await
    }
}

impl PhotoBackend for ApiClient {
    fn fetch_persons(&self) -> impl Future<Output = Result<PersonsResponse, ApiError>> + Send {
        self.get_persons()
    }

    fn fetch_person_photos(
        &self,
        person_id: &str,
    ) -> impl Future<Output = Result<PersonPhotosResponse, ApiError>> + Send {
        self.get_person_photos(person_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_appends_to_path_prefix() {
        let client = ApiClient::new("https://api.example.com/prod").expect("valid url");
        let url = client.endpoint(&["persons"]).expect("endpoint");
        assert_eq!(url.as_str(), "https://api.example.com/prod/persons");
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let client = ApiClient::new("https://api.example.com/prod/").expect("valid url");
        let url = client.endpoint(&["persons", "p-1", "photos"]).expect("endpoint");
        assert_eq!(url.as_str(), "https://api.example.com/prod/persons/p-1/photos");
    }

    #[test]
    fn test_endpoint_encodes_person_id_as_one_segment() {
        let client = ApiClient::new("https://api.example.com").expect("valid url");
        let url = client.endpoint(&["persons", "a/b c", "photos"]).expect("endpoint");
        assert_eq!(url.as_str(), "https://api.example.com/persons/a%2Fb%20c/photos");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(matches!(ApiClient::new("not a url"), Err(ApiError::InvalidBaseUrl(_))));
        assert!(matches!(ApiClient::new("mailto:someone@example.com"), Err(ApiError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_from_config_without_url_is_not_configured() {
        let config = Config::default();
        assert!(matches!(ApiClient::from_config(&config), Err(ApiError::NotConfigured)));
    }
}
