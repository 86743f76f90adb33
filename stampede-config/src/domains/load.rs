//! Load shape configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_range, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How many agents run, for how long, and how they are paced
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub agent_count: usize,

    /// Wall-clock length of the test window
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub duration: Duration,

    /// Delay between consecutive agent starts
    #[serde(with = "crate::domains::utils::serde_millis")]
    pub stagger: Duration,

    /// Inter-action delay bounds before the persona pace multiplier
    #[serde(with = "crate::domains::utils::serde_millis")]
    pub pacing_min: Duration,

    #[serde(with = "crate::domains::utils::serde_millis")]
    pub pacing_max: Duration,

    /// Cadence of the live console summary
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub live_interval: Duration,

    /// Seed for action selection; entropy-seeded when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            agent_count: 10,
            duration: Duration::from_secs(300),
            stagger: Duration::from_millis(500),
            pacing_min: Duration::from_millis(1000),
            pacing_max: Duration::from_millis(3000),
            live_interval: Duration::from_secs(5),
            seed: None,
        }
    }
}

impl Validatable for LoadConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.agent_count, "agent_count", self.domain_name())?;
        validate_positive(self.duration.as_secs(), "duration", self.domain_name())?;
        validate_positive(self.live_interval.as_secs(), "live_interval", self.domain_name())?;
        validate_range(self.pacing_min, self.pacing_max, "pacing", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "load"
    }
}
