use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("API base URL not configured")]
    NotConfigured,

    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Failed to fetch {resource}: {status} {status_text}")]
    Http {
        resource: &'static str,
        status: u16,
        status_text: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub fn from_status(resource: &'static str, status: reqwest::StatusCode) -> Self {
        ApiError::Http {
            resource,
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
        }
    }

    /// HTTP status code, when the failure came from a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_message_carries_status_and_text() {
        let err = ApiError::from_status("persons", reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to fetch persons: 500 Internal Server Error");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_non_http_errors_have_no_status() {
        assert_eq!(ApiError::NotConfigured.status(), None);
        assert_eq!(ApiError::NotConfigured.to_string(), "API base URL not configured");
    }
}
