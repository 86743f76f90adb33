//! HTTP client configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP client and transport retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,

    /// Attempts per request on transport faults, including the first
    pub max_attempts: u32,

    /// Fixed delay between transport retries
    #[serde(with = "crate::domains::utils::serde_millis")]
    pub retry_delay: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: "Stampede/0.1".to_string(),
            max_attempts: 3,
            retry_delay: Duration::from_millis(1000),
        }
    }
}

impl Validatable for HttpConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.timeout.as_secs(), "timeout", self.domain_name())?;
        validate_required_string(&self.user_agent, "user_agent", self.domain_name())?;
        validate_positive(self.max_attempts, "max_attempts", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "http"
    }
}
