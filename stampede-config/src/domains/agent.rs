//! Per-agent behaviour configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Session freshness, back-off and circuit-breaker settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Age after which a session token is proactively refreshed
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub token_freshness: Duration,

    /// Consecutive errors before the extra back-off delay kicks in
    pub backoff_threshold: u32,

    /// Consecutive errors that permanently stop an agent
    pub circuit_threshold: u32,

    /// Extra delay inserted while backing off
    #[serde(with = "crate::domains::utils::serde_millis")]
    pub backoff_delay: Duration,

    /// Upper bound on item ids an agent remembers
    pub known_items_limit: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            token_freshness: Duration::from_secs(12 * 60),
            backoff_threshold: 5,
            circuit_threshold: 20,
            backoff_delay: Duration::from_millis(5000),
            known_items_limit: 100,
        }
    }
}

impl Validatable for AgentConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.token_freshness.as_secs(), "token_freshness", self.domain_name())?;
        validate_positive(self.backoff_threshold, "backoff_threshold", self.domain_name())?;
        validate_positive(self.known_items_limit, "known_items_limit", self.domain_name())?;
        if self.circuit_threshold <= self.backoff_threshold {
            return Err(self.validation_error(format!(
                "circuit_threshold ({}) must exceed backoff_threshold ({})",
                self.circuit_threshold, self.backoff_threshold
            )));
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "agent"
    }
}
