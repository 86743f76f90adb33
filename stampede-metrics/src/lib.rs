//! Metrics collection and reporting for Stampede
//!
//! Agents append one [`ActionEvent`](stampede_core::ActionEvent) per action
//! attempt to a shared [`MetricsCollector`]. At the end of a run the
//! collector derives an [`AggregateReport`] from the full event log; nothing
//! in the report is maintained incrementally.

pub mod collector;
pub mod live;
pub mod report;
pub mod stats;
pub mod verdict;

pub use collector::{AgentSnapshot, LiveSnapshot, MetricsCollector};
pub use live::{render_snapshot, spawn_live_display};
pub use report::{AggregateReport, Breakdown, ErrorRecord, Summary, TimelineBucket};
pub use stats::{error_rate, percentile, LatencyStats};
pub use verdict::Verdict;
