//! Periodic live status output

use crate::collector::{LiveSnapshot, MetricsCollector};
use stampede_resilience::StopToken;
use std::fmt::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::info;

/// Log a snapshot every `interval` until `stop` fires.
///
/// The task only reads the collector's counters, never the event log.
pub fn spawn_live_display(collector: Arc<MetricsCollector>, interval: Duration, stop: StopToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let snapshot = collector.snapshot();
                    info!(
                        target: "stampede::live",
                        total = snapshot.total_actions,
                        failed = snapshot.failed_actions,
                        active = snapshot.active_agents,
                        "{}",
                        render_snapshot(&snapshot)
                    );
                }
                _ = stop.stopped() => break,
            }
        }
    })
}

/// One-line summary followed by the per-agent tallies
pub fn render_snapshot(snapshot: &LiveSnapshot) -> String {
    let mut line = format!(
        "[{}s] actions={} ok={} failed={} error_rate={:.1}% active_agents={}",
        snapshot.elapsed_secs,
        snapshot.total_actions,
        snapshot.successful_actions,
        snapshot.failed_actions,
        snapshot.error_rate,
        snapshot.active_agents
    );
    for agent in &snapshot.agents {
        let marker = if agent.active { "" } else { " (stopped)" };
        let _ = write!(line, " | {}: {}/{}{}", agent.name, agent.actions, agent.failures, marker);
    }
    line
}
