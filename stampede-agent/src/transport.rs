//! Transport wrapper: auth headers, retry and 401 recovery
//!
//! Transport faults are retried with the configured fixed delay whatever
//! the HTTP method, so a create or update whose response was lost may be
//! applied twice by the target. Idempotency is the caller's concern.

use crate::auth::{AuthClient, Reauthenticator};
use crate::error::TransportError;
use crate::session::Session;
use stampede_http::{ApiRequest, ApiResponse, HttpClient};
use stampede_resilience::RetryExecutor;
use std::sync::Arc;
use tracing::debug;

/// Sends one logical request on behalf of one agent
#[derive(Clone)]
pub struct Transport {
    http: Arc<dyn HttpClient>,
    retry: RetryExecutor,
    auth: AuthClient,
    reauth: Arc<dyn Reauthenticator>,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport").field("retry", &self.retry).finish()
    }
}

impl Transport {
    pub fn new(
        http: Arc<dyn HttpClient>,
        retry: RetryExecutor,
        auth: AuthClient,
        reauth: Arc<dyn Reauthenticator>,
    ) -> Self {
        Self {
            http,
            retry,
            auth,
            reauth,
        }
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    /// Execute `request` with the session's current token.
    ///
    /// HTTP error statuses come back as `Ok`. A first 401 triggers one
    /// recovery (refresh, then re-login) and, if that worked, exactly one
    /// resend; the second response is returned whatever its status. `Err`
    /// means no response arrived after the retry budget was spent.
    pub async fn execute(&self, session: &mut Session, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let response = self.send(session, &request).await?;
        if !response.is_unauthorized() {
            return Ok(response);
        }

        debug!("{} returned 401, recovering session", request);
        let recovered = session.refresh(&self.auth).await || self.reauth.reauthenticate(session).await;
        if !recovered {
            return Ok(response);
        }

        self.send(session, &request).await
    }

    async fn send(&self, session: &Session, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut request = request.clone();
        request.bearer = session.access_token().map(str::to_string);

        let http = &self.http;
        let request = &request;
        Ok(self.retry.execute(|| http.send(request)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::PersonaLogin;
    use crate::testing::FakeTarget;
    use stampede_http::HttpError;
    use stampede_resilience::RetryPolicy;
    use std::time::Duration;

    struct Fixture {
        target: Arc<FakeTarget>,
        transport: Transport,
        session: Session,
    }

    async fn fixture() -> Fixture {
        let target = Arc::new(FakeTarget::new());
        let retry = RetryExecutor::new(RetryPolicy::fixed(3, Duration::from_millis(1000)));
        let auth = AuthClient::new(target.clone(), retry.clone());
        let login = PersonaLogin::new(auth.clone(), "alice", "password");
        let mut session = Session::new(Duration::from_secs(720));
        login.login(&mut session).await.unwrap();

        Fixture {
            transport: Transport::new(target.clone(), retry, auth, Arc::new(login)),
            target,
            session,
        }
    }

    #[tokio::test]
    async fn test_bearer_attached() {
        let mut f = fixture().await;
        let response = f.transport.execute(&mut f.session, ApiRequest::get("/items")).await.unwrap();
        assert_eq!(response.status, 200);

        let sent = f.target.requests();
        let last = sent.last().unwrap();
        assert_eq!(last.bearer.as_deref(), f.session.access_token());
    }

    #[tokio::test]
    async fn test_error_status_is_returned_not_raised() {
        let mut f = fixture().await;
        f.target.push_status(409);
        let response = f.transport.execute(&mut f.session, ApiRequest::post("/items")).await.unwrap();
        assert_eq!(response.status, 409);
        assert_eq!(f.target.count("POST", "/items"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_fault_retried_then_succeeds() {
        let mut f = fixture().await;
        f.target.push_fault(HttpError::Connect("refused".into()));
        f.target.push_fault(HttpError::Timeout("slow".into()));

        let response = f.transport.execute(&mut f.session, ApiRequest::get("/items")).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(f.target.count("GET", "/items"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_fault_exhausts_retries() {
        let mut f = fixture().await;
        for _ in 0..3 {
            f.target.push_fault(HttpError::Network("reset".into()));
        }

        let err = f
            .transport
            .execute(&mut f.session, ApiRequest::put("/items/1"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Exhausted { attempts: 3, .. }));
        // Non-idempotent methods are retried too
        assert_eq!(f.target.count("PUT", "/items/1"), 3);
    }

    #[tokio::test]
    async fn test_401_recovered_by_refresh() {
        let mut f = fixture().await;
        let old = f.session.access_token().map(str::to_string);
        f.target.revoke_access();

        let response = f.transport.execute(&mut f.session, ApiRequest::get("/items")).await.unwrap();
        assert_eq!(response.status, 200);
        assert_ne!(f.session.access_token().map(str::to_string), old);
        assert_eq!(f.target.count("POST", "/auth/refresh"), 1);
        assert_eq!(f.target.count("POST", "/auth/login"), 1);
        assert_eq!(f.target.count("GET", "/items"), 2);
    }

    #[tokio::test]
    async fn test_401_falls_back_to_relogin() {
        let mut f = fixture().await;
        f.target.revoke_access();
        f.target.set_refresh_status(401);

        let response = f.transport.execute(&mut f.session, ApiRequest::get("/items")).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(f.target.count("POST", "/auth/login"), 2);
    }

    #[tokio::test]
    async fn test_second_401_returned_as_is() {
        let mut f = fixture().await;
        // Recovery succeeds but the resend is still refused
        f.target.push_status(401);
        f.target.push_status(401);

        let response = f.transport.execute(&mut f.session, ApiRequest::get("/auth/me")).await.unwrap();
        assert_eq!(response.status, 401);
        assert_eq!(f.target.count("GET", "/auth/me"), 2);
        assert_eq!(f.target.count("POST", "/auth/refresh"), 1);
    }

    #[tokio::test]
    async fn test_failed_recovery_returns_original_401() {
        let mut f = fixture().await;
        f.target.revoke_access();
        f.target.set_refresh_status(401);
        f.target.set_login_status(401);

        let response = f.transport.execute(&mut f.session, ApiRequest::get("/items")).await.unwrap();
        assert_eq!(response.status, 401);
        assert_eq!(f.target.count("GET", "/items"), 1);
    }
}
