//! Latency statistics

use serde::{Deserialize, Serialize};

/// Nearest-rank percentile of an ascending slice.
///
/// The rank is `ceil(N * p) - 1`, clamped to `[0, N - 1]`. No interpolation
/// is done. An empty slice yields 0.
pub fn percentile(sorted: &[u64], p: f64) -> u64 {
    if sorted.is_empty() {
        return 0;
    }

    let n = sorted.len();
    let rank = (n as f64 * p).ceil() as i64 - 1;
    let index = rank.clamp(0, n as i64 - 1) as usize;
    sorted[index]
}

/// Failure share in percent, 0 when nothing was attempted
pub fn error_rate(failed: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        failed as f64 / total as f64 * 100.0
    }
}

/// Response time distribution over a set of durations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyStats {
    pub count: u64,
    pub min_ms: u64,
    pub max_ms: u64,
    pub mean_ms: f64,
    pub median_ms: u64,
    pub p95_ms: u64,
    pub p99_ms: u64,
}

impl LatencyStats {
    /// Compute statistics from unsorted durations
    pub fn from_durations(mut durations: Vec<u64>) -> Self {
        if durations.is_empty() {
            return Self::default();
        }
        durations.sort_unstable();

        let count = durations.len() as u64;
        let sum: u64 = durations.iter().sum();

        Self {
            count,
            min_ms: durations[0],
            max_ms: durations[durations.len() - 1],
            mean_ms: sum as f64 / count as f64,
            median_ms: percentile(&durations, 0.5),
            p95_ms: percentile(&durations, 0.95),
            p99_ms: percentile(&durations, 0.99),
        }
    }
}
