//! Per-agent authentication state

use crate::auth::AuthClient;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::debug;

/// One agent's tokens. Never shared across agents.
///
/// `access_token` is `None` exactly when the agent is logged out, and
/// `issued_at` moves every time the access token changes.
#[derive(Debug, Clone)]
pub struct Session {
    access_token: Option<String>,
    refresh_token: Option<String>,
    issued_at: DateTime<Utc>,
    freshness: Duration,
}

impl Session {
    /// Empty session whose tokens are considered stale after `freshness`
    pub fn new(freshness: Duration) -> Self {
        Self {
            access_token: None,
            refresh_token: None,
            issued_at: Utc::now(),
            freshness,
        }
    }

    pub fn set_tokens(&mut self, access: impl Into<String>, refresh: impl Into<String>) {
        self.access_token = Some(access.into());
        self.refresh_token = Some(refresh.into());
        self.issued_at = Utc::now();
    }

    pub fn clear_tokens(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
        self.issued_at = Utc::now();
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn has_token(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Override the issue time, e.g. to age a session
    pub fn set_issued_at(&mut self, issued_at: DateTime<Utc>) {
        self.issued_at = issued_at;
    }

    pub fn freshness(&self) -> Duration {
        self.freshness
    }

    /// Whether the freshness window has passed since the last token change
    pub fn is_stale(&self) -> bool {
        self.is_stale_at(Utc::now())
    }

    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.issued_at);
        age.to_std().map(|age| age > self.freshness).unwrap_or(false)
    }

    /// Exchange the refresh token for a new pair.
    ///
    /// Returns `false` instead of an error so callers can fall back to a
    /// full login.
    pub async fn refresh(&mut self, auth: &AuthClient) -> bool {
        let Some(refresh_token) = self.refresh_token.clone() else {
            return false;
        };

        match auth.refresh(&refresh_token).await {
            Ok(pair) => {
                self.set_tokens(pair.access_token, pair.refresh_token);
                true
            }
            Err(e) => {
                debug!("Token refresh failed: {}", e);
                false
            }
        }
    }
}
