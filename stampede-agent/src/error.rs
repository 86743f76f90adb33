//! Error types for the agent engine

use stampede_http::HttpError;
use stampede_resilience::RetryError;
use thiserror::Error;

/// A request produced no usable response
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("Gave up after {attempts} attempts: {source}")]
    Exhausted { attempts: u32, source: HttpError },

    #[error("Request failed: {0}")]
    Failed(HttpError),
}

impl From<RetryError<HttpError>> for TransportError {
    fn from(error: RetryError<HttpError>) -> Self {
        match error {
            RetryError::MaxAttemptsExceeded { attempts, last_error } => TransportError::Exhausted {
                attempts,
                source: last_error,
            },
            RetryError::NonRetryableError(source) => TransportError::Failed(source),
        }
    }
}

/// Authentication call failures
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Authentication rejected: {message}")]
    Rejected { status: u16, message: String },

    #[error("Malformed token response: {0}")]
    MalformedResponse(String),
}

/// Agent setup failures
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Agent '{agent}' failed to log in: {source}")]
    Login { agent: String, source: AuthError },

    #[error("Agent '{0}' has already stopped")]
    AlreadyStopped(String),
}

/// Fatal run setup failures. Nothing has been sent to the target under load
/// when one of these is returned.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Administrator login failed: {0}")]
    AdminLogin(AuthError),

    #[error("No agents could be initialized ({attempted} attempted)")]
    NoAgents { attempted: usize },

    #[error("Run stopped before load started")]
    StoppedBeforeStart,
}
