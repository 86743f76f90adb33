//! HTTP error types

use stampede_resilience::Retryable;

/// Error type for HTTP operations.
///
/// HTTP error statuses are not errors here: any response that arrives is an
/// `Ok(ApiResponse)`. These variants only describe requests that produced no
/// usable response.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HttpError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Failed to build request: {0}")]
    Build(String),
}

impl HttpError {
    /// Whether the fault happened on the wire (no response received)
    pub fn is_transport_fault(&self) -> bool {
        matches!(
            self,
            HttpError::Connect(_) | HttpError::Timeout(_) | HttpError::Network(_)
        )
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(error: reqwest::Error) -> Self {
        let message = error.to_string();
        if error.is_timeout() {
            HttpError::Timeout(message)
        } else if error.is_connect() {
            HttpError::Connect(message)
        } else if error.is_builder() {
            HttpError::Build(message)
        } else {
            HttpError::Network(message)
        }
    }
}

impl Retryable for HttpError {
    fn is_retryable(&self) -> bool {
        self.is_transport_fault()
    }
}
