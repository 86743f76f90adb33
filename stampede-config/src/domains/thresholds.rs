//! Pass/fail threshold configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, Validatable};
use serde::{Deserialize, Serialize};

/// Limits the final report is judged against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Highest tolerated error rate, in percent
    pub max_error_rate: f64,

    /// Highest tolerated p95 latency of successful actions
    pub max_p95_ms: u64,

    /// Highest tolerated p99 latency of successful actions
    pub max_p99_ms: u64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            max_error_rate: 5.0,
            max_p95_ms: 3000,
            max_p99_ms: 5000,
        }
    }
}

impl Validatable for ThresholdConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=100.0).contains(&self.max_error_rate) {
            return Err(self.validation_error(format!(
                "max_error_rate must be within 0..=100, got {}",
                self.max_error_rate
            )));
        }
        validate_positive(self.max_p95_ms, "max_p95_ms", self.domain_name())?;
        validate_positive(self.max_p99_ms, "max_p99_ms", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "thresholds"
    }
}
