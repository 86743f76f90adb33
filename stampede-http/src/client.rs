//! HTTP client implementation

use crate::config::HttpConfig;
use crate::errors::HttpError;
use crate::types::{ApiRequest, ApiResponse};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde_json::Value as JsonValue;
use tracing::{debug, trace};

/// HTTP client trait for making requests against the target API
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    /// Send one request.
    ///
    /// Any response that arrives is `Ok`, including 4xx/5xx statuses.
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, HttpError>;
}

/// reqwest-backed client rooted at the target's API prefix.
///
/// One instance is shared by every agent so that connections are pooled.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
    api_root: String,
}

impl ReqwestClient {
    /// Create a client with configured settings
    pub fn new(api_root: impl Into<String>, config: &HttpConfig) -> Result<Self, HttpError> {
        let api_root = api_root.into().trim_end_matches('/').to_string();
        reqwest::Url::parse(&api_root).map_err(|e| HttpError::InvalidUrl(format!("{}: {}", api_root, e)))?;

        debug!(
            "Creating HTTP client for {} with {}s timeout",
            api_root,
            config.timeout.as_secs()
        );
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .pool_max_idle_per_host(config.max_idle_per_host)
            .build()?;

        Ok(Self { client, api_root })
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_root, path)
        } else {
            format!("{}/{}", self.api_root, path)
        }
    }
}

#[async_trait::async_trait]
impl HttpClient for ReqwestClient {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, HttpError> {
        let url = self.url_for(&request.path);
        trace!("Sending {} {}", request.method, url);

        let mut builder = self.client.request(request.method.into(), &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(token) = &request.bearer {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| HttpError::InvalidHeader(e.to_string()))?;
            builder = builder.header(AUTHORIZATION, value);
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;

        // Fall back to text for non-JSON bodies
        let body = if bytes.is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| JsonValue::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        trace!("{} {} -> {}", request.method, url, status);
        Ok(ApiResponse { status, body })
    }
}
