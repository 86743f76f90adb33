//! Authentication calls and the re-login capability

use crate::error::{AuthError, TransportError};
use crate::session::Session;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use stampede_http::{ApiRequest, ApiResponse, HttpClient};
use stampede_resilience::RetryExecutor;
use std::sync::Arc;
use tracing::{debug, warn};

/// Access/refresh token pair returned by login and refresh
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    fn from_response(response: &ApiResponse) -> Result<Self, AuthError> {
        // Some targets wrap payloads in `data`
        let body = match response.body.get("data") {
            Some(inner) if inner.get("accessToken").is_some() => inner,
            _ => &response.body,
        };
        serde_json::from_value(body.clone()).map_err(|e| AuthError::MalformedResponse(e.to_string()))
    }
}

/// Client for the target's `/auth` endpoints
#[derive(Clone)]
pub struct AuthClient {
    http: Arc<dyn HttpClient>,
    retry: RetryExecutor,
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient").field("retry", &self.retry).finish()
    }
}

impl AuthClient {
    pub fn new(http: Arc<dyn HttpClient>, retry: RetryExecutor) -> Self {
        Self { http, retry }
    }

    async fn post(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let http = &self.http;
        let request = &request;
        Ok(self.retry.execute(|| http.send(request)).await?)
    }

    /// Log in with username and password
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        let response = self
            .post(ApiRequest::post("/auth/login").json(json!({
                "username": username,
                "password": password,
            })))
            .await?;

        if !response.is_success() {
            return Err(AuthError::Rejected {
                status: response.status,
                message: response.error_message(),
            });
        }
        TokenPair::from_response(&response)
    }

    /// Exchange a refresh token for a new pair
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let response = self
            .post(ApiRequest::post("/auth/refresh").json(json!({ "refreshToken": refresh_token })))
            .await?;

        if !response.is_success() {
            return Err(AuthError::Rejected {
                status: response.status,
                message: response.error_message(),
            });
        }
        TokenPair::from_response(&response)
    }

    /// Invalidate the session server-side
    pub async fn logout(&self, access_token: &str, refresh_token: Option<&str>) -> Result<(), AuthError> {
        let body = match refresh_token {
            Some(token) => json!({ "refreshToken": token }),
            None => JsonValue::Null,
        };
        let mut request = ApiRequest::post("/auth/logout").bearer(access_token);
        if !body.is_null() {
            request = request.json(body);
        }

        let response = self.post(request).await?;
        if !response.is_success() {
            return Err(AuthError::Rejected {
                status: response.status,
                message: response.error_message(),
            });
        }
        Ok(())
    }
}

/// Capability to restore a session after authorization is lost.
///
/// The transport holds one of these for its whole lifetime and calls it
/// when a token refresh cannot rescue a 401.
#[async_trait]
pub trait Reauthenticator: Send + Sync {
    /// Log in again and store fresh tokens in `session`
    async fn reauthenticate(&self, session: &mut Session) -> bool;
}

/// Re-login with a persona's fixed credentials
#[derive(Debug, Clone)]
pub struct PersonaLogin {
    auth: AuthClient,
    username: String,
    password: String,
}

impl PersonaLogin {
    pub fn new(auth: AuthClient, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            auth,
            username: username.into(),
            password: password.into(),
        }
    }

    /// Log in and populate the session, surfacing the failure cause
    pub async fn login(&self, session: &mut Session) -> Result<(), AuthError> {
        let pair = self.auth.login(&self.username, &self.password).await?;
        session.set_tokens(pair.access_token, pair.refresh_token);
        debug!(user = %self.username, "Logged in");
        Ok(())
    }
}

#[async_trait]
impl Reauthenticator for PersonaLogin {
    async fn reauthenticate(&self, session: &mut Session) -> bool {
        match self.login(session).await {
            Ok(()) => true,
            Err(e) => {
                warn!(user = %self.username, "Re-login failed: {}", e);
                false
            }
        }
    }
}
