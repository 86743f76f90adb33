//! Shared event sink

use crate::report::AggregateReport;
use crate::stats::error_rate;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use stampede_config::ThresholdConfig;
use stampede_core::ActionEvent;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Running tally for one agent, readable without touching the event log
#[derive(Debug, Default)]
struct AgentTally {
    actions: AtomicU64,
    failures: AtomicU64,
    active: AtomicBool,
}

/// Live view of one agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSnapshot {
    pub name: String,
    pub actions: u64,
    pub failures: u64,
    pub active: bool,
}

/// Point-in-time totals for periodic display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSnapshot {
    pub elapsed_secs: u64,
    pub total_actions: u64,
    pub successful_actions: u64,
    pub failed_actions: u64,
    pub error_rate: f64,
    pub active_agents: usize,
    pub agents: Vec<AgentSnapshot>,
}

/// Append-only event log shared by every agent.
///
/// `record` does constant-time work: one push under the log mutex and a few
/// atomic increments. Live snapshots read only the atomics, so they never
/// contend with writers on the log.
#[derive(Debug)]
pub struct MetricsCollector {
    events: Mutex<Vec<ActionEvent>>,
    total: AtomicU64,
    failures: AtomicU64,
    agents: RwLock<BTreeMap<String, Arc<AgentTally>>>,
    started_at: RwLock<DateTime<Utc>>,
    finished_at: RwLock<Option<DateTime<Utc>>>,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            total: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            agents: RwLock::new(BTreeMap::new()),
            started_at: RwLock::new(Utc::now()),
            finished_at: RwLock::new(None),
        }
    }

    /// Anchor the run (and its timeline) at now
    pub fn mark_started(&self) {
        *self.started_at.write() = Utc::now();
    }

    /// Close the run at now
    pub fn mark_finished(&self) {
        *self.finished_at.write() = Some(Utc::now());
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        *self.started_at.read()
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        *self.finished_at.read()
    }

    /// Append one event
    pub fn record(&self, event: ActionEvent) {
        self.total.fetch_add(1, Ordering::Relaxed);
        if !event.success {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }

        if let Some(tally) = self.agents.read().get(&event.agent) {
            tally.actions.fetch_add(1, Ordering::Relaxed);
            if !event.success {
                tally.failures.fetch_add(1, Ordering::Relaxed);
            }
        }

        self.events.lock().push(event);
    }

    /// Add an agent to the live set. Re-registering keeps its tally.
    pub fn register_agent(&self, name: &str) {
        let mut agents = self.agents.write();
        let tally = agents.entry(name.to_string()).or_default();
        tally.active.store(true, Ordering::Relaxed);
        debug!(agent = %name, "Agent registered");
    }

    /// Remove an agent from the live set. Its tally stays visible.
    pub fn deregister_agent(&self, name: &str) {
        if let Some(tally) = self.agents.read().get(name) {
            tally.active.store(false, Ordering::Relaxed);
            debug!(agent = %name, "Agent deregistered");
        }
    }

    pub fn active_agents(&self) -> usize {
        self.agents
            .read()
            .values()
            .filter(|tally| tally.active.load(Ordering::Relaxed))
            .count()
    }

    pub fn event_count(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// Read-only live summary
    pub fn snapshot(&self) -> LiveSnapshot {
        let total = self.total.load(Ordering::Relaxed);
        let failed = self.failures.load(Ordering::Relaxed).min(total);
        let elapsed = (Utc::now() - self.started_at()).num_seconds().max(0) as u64;

        let agents: Vec<AgentSnapshot> = self
            .agents
            .read()
            .iter()
            .map(|(name, tally)| AgentSnapshot {
                name: name.clone(),
                actions: tally.actions.load(Ordering::Relaxed),
                failures: tally.failures.load(Ordering::Relaxed),
                active: tally.active.load(Ordering::Relaxed),
            })
            .collect();

        LiveSnapshot {
            elapsed_secs: elapsed,
            total_actions: total,
            successful_actions: total - failed,
            failed_actions: failed,
            error_rate: error_rate(failed, total),
            active_agents: agents.iter().filter(|agent| agent.active).count(),
            agents,
        }
    }

    /// Copy of the event log in insertion order
    pub fn events(&self) -> Vec<ActionEvent> {
        self.events.lock().clone()
    }

    /// Derive the aggregate report from the current log.
    ///
    /// Run this only after every agent has stopped.
    pub fn generate_report(&self, thresholds: &ThresholdConfig) -> AggregateReport {
        let events = self.events();
        AggregateReport::from_events(&events, self.started_at(), self.finished_at(), thresholds)
    }
}
