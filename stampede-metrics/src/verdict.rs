//! Pass/fail verdict against configured thresholds

use serde::{Deserialize, Serialize};
use stampede_config::ThresholdConfig;
use std::fmt;

/// Outcome of a run. Every violated threshold contributes one reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub passed: bool,
    pub reasons: Vec<String>,
}

impl Verdict {
    /// Judge the observed error rate (percent) and latency percentiles
    pub fn evaluate(error_rate: f64, p95_ms: u64, p99_ms: u64, thresholds: &ThresholdConfig) -> Self {
        let mut reasons = Vec::new();

        if error_rate > thresholds.max_error_rate {
            reasons.push(format!(
                "Error rate {} exceeds threshold of {}",
                format_percent(error_rate),
                format_percent(thresholds.max_error_rate)
            ));
        }
        if p95_ms > thresholds.max_p95_ms {
            reasons.push(format!(
                "p95 latency {}ms exceeds threshold of {}ms",
                p95_ms, thresholds.max_p95_ms
            ));
        }
        if p99_ms > thresholds.max_p99_ms {
            reasons.push(format!(
                "p99 latency {}ms exceeds threshold of {}ms",
                p99_ms, thresholds.max_p99_ms
            ));
        }

        Self {
            passed: reasons.is_empty(),
            reasons,
        }
    }

    pub fn label(&self) -> &'static str {
        if self.passed {
            "PASS"
        } else {
            "FAIL"
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Whole percentages print without decimals
pub(crate) fn format_percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}%", value as i64)
    } else {
        format!("{:.2}%", value)
    }
}
