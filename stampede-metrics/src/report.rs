//! End-of-run aggregate report

use crate::stats::{error_rate, LatencyStats};
use crate::verdict::Verdict;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stampede_config::ThresholdConfig;
use stampede_core::{ActionEvent, ActionKind};
use std::collections::BTreeMap;

const BUCKET_MS: i64 = 60_000;

/// Run-wide counts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_actions: u64,
    pub successful_actions: u64,
    pub failed_actions: u64,
    /// Percent of failed actions
    pub error_rate: f64,
    /// Distinct agents that recorded at least one event
    pub agents: u64,
    pub elapsed_secs: f64,
    pub actions_per_sec: f64,
}

/// Counts and latency for one partition of the event log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub total: u64,
    pub successful: u64,
    pub failed: u64,
    pub error_rate: f64,
    /// Over successful events only
    pub latency: LatencyStats,
}

impl Breakdown {
    fn from_events<'a>(events: impl IntoIterator<Item = &'a ActionEvent>) -> Self {
        let mut total = 0;
        let mut failed = 0;
        let mut durations = Vec::new();
        for event in events {
            total += 1;
            if event.success {
                durations.push(event.duration_ms);
            } else {
                failed += 1;
            }
        }

        Self {
            total,
            successful: total - failed,
            failed,
            error_rate: error_rate(failed, total),
            latency: LatencyStats::from_durations(durations),
        }
    }
}

/// One fixed one-minute window of the run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineBucket {
    pub minute: u32,
    pub start: DateTime<Utc>,
    pub actions: u64,
    pub errors: u64,
    /// Mean duration of successful actions started in this window
    pub mean_latency_ms: f64,
}

/// One failed action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    pub agent: String,
    pub action: ActionKind,
    pub time: DateTime<Utc>,
    pub http_status: u16,
    pub message: String,
}

/// Everything derived from the event log at the end of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub summary: Summary,
    /// Over successful events only
    pub response_times: LatencyStats,
    pub by_action: BTreeMap<ActionKind, Breakdown>,
    pub by_agent: BTreeMap<String, Breakdown>,
    pub timeline: Vec<TimelineBucket>,
    pub errors: Vec<ErrorRecord>,
    pub thresholds: ThresholdConfig,
    pub verdict: Verdict,
}

impl AggregateReport {
    /// Build the report from an event log.
    ///
    /// A pure function of its arguments. When `finished_at` is `None` the
    /// run is taken to end with the latest event.
    pub fn from_events(
        events: &[ActionEvent],
        started_at: DateTime<Utc>,
        finished_at: Option<DateTime<Utc>>,
        thresholds: &ThresholdConfig,
    ) -> Self {
        let finished_at = finished_at
            .or_else(|| events.iter().map(ActionEvent::end_time).max())
            .unwrap_or(started_at)
            .max(started_at);
        let elapsed_ms = (finished_at - started_at).num_milliseconds().max(0);

        let overall = Breakdown::from_events(events);

        let mut action_groups: BTreeMap<ActionKind, Vec<&ActionEvent>> = BTreeMap::new();
        let mut agent_groups: BTreeMap<String, Vec<&ActionEvent>> = BTreeMap::new();
        for event in events {
            action_groups.entry(event.action).or_default().push(event);
            agent_groups.entry(event.agent.clone()).or_default().push(event);
        }
        let by_action = action_groups
            .into_iter()
            .map(|(action, group)| (action, Breakdown::from_events(group)))
            .collect();
        let by_agent: BTreeMap<String, Breakdown> = agent_groups
            .into_iter()
            .map(|(agent, group)| (agent, Breakdown::from_events(group)))
            .collect();

        let elapsed_secs = elapsed_ms as f64 / 1000.0;
        let summary = Summary {
            total_actions: overall.total,
            successful_actions: overall.successful,
            failed_actions: overall.failed,
            error_rate: overall.error_rate,
            agents: by_agent.len() as u64,
            elapsed_secs,
            actions_per_sec: if elapsed_secs > 0.0 {
                overall.total as f64 / elapsed_secs
            } else {
                0.0
            },
        };

        let errors = events
            .iter()
            .filter(|event| !event.success)
            .map(|event| ErrorRecord {
                agent: event.agent.clone(),
                action: event.action,
                time: event.start_time,
                http_status: event.http_status,
                message: event
                    .error_message
                    .clone()
                    .unwrap_or_else(|| format!("HTTP {}", event.http_status)),
            })
            .collect();

        let verdict = Verdict::evaluate(
            summary.error_rate,
            overall.latency.p95_ms,
            overall.latency.p99_ms,
            thresholds,
        );

        Self {
            started_at,
            finished_at,
            summary,
            response_times: overall.latency,
            by_action,
            by_agent,
            timeline: timeline(events, started_at, elapsed_ms),
            errors,
            thresholds: *thresholds,
            verdict,
        }
    }

    pub fn passed(&self) -> bool {
        self.verdict.passed
    }
}

fn timeline(events: &[ActionEvent], started_at: DateTime<Utc>, elapsed_ms: i64) -> Vec<TimelineBucket> {
    let mut count = ((elapsed_ms + BUCKET_MS - 1) / BUCKET_MS) as usize;
    if count == 0 && !events.is_empty() {
        count = 1;
    }

    let mut actions = vec![0u64; count];
    let mut errors = vec![0u64; count];
    let mut latency_sum = vec![0u64; count];
    let mut latency_count = vec![0u64; count];

    for event in events {
        let offset = (event.start_time - started_at).num_milliseconds().max(0);
        let index = ((offset / BUCKET_MS) as usize).min(count.saturating_sub(1));
        actions[index] += 1;
        if event.success {
            latency_sum[index] += event.duration_ms;
            latency_count[index] += 1;
        } else {
            errors[index] += 1;
        }
    }

    (0..count)
        .map(|index| TimelineBucket {
            minute: index as u32,
            start: started_at + chrono::Duration::milliseconds(index as i64 * BUCKET_MS),
            actions: actions[index],
            errors: errors[index],
            mean_latency_ms: if latency_count[index] > 0 {
                latency_sum[index] as f64 / latency_count[index] as f64
            } else {
                0.0
            },
        })
        .collect()
}
