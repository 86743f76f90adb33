//! Console and file rendering of the aggregate report

use anyhow::{Context, Result};
use colored::Colorize;
use stampede_agent::RunOutcome;
use stampede_metrics::{AggregateReport, Breakdown};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

fn breakdown_row(label: &str, breakdown: &Breakdown) -> String {
    format!(
        "  {:<18} {:>7} {:>7.2}%  p95 {:>6}ms  p99 {:>6}ms",
        label,
        breakdown.total,
        breakdown.error_rate,
        breakdown.latency.p95_ms,
        breakdown.latency.p99_ms
    )
}

/// Human-readable run summary
pub fn render_summary(outcome: &RunOutcome) -> String {
    let report = &outcome.report;
    let summary = &report.summary;
    let latency = &report.response_times;
    let mut out = String::new();

    let _ = writeln!(out, "{}", format!("Stampede run {}", outcome.run_id).bold());
    let _ = writeln!(
        out,
        "Agents:       {} started / {} planned{}",
        outcome.started_agents,
        outcome.planned_agents,
        if outcome.crashed_agents > 0 {
            format!(" ({} crashed)", outcome.crashed_agents)
        } else {
            String::new()
        }
    );
    let _ = writeln!(out, "Elapsed:      {:.1}s", summary.elapsed_secs);
    let _ = writeln!(
        out,
        "Actions:      {} ({} ok, {} failed, {:.2}% errors)",
        summary.total_actions, summary.successful_actions, summary.failed_actions, summary.error_rate
    );
    let _ = writeln!(out, "Throughput:   {:.2} actions/s", summary.actions_per_sec);
    let _ = writeln!(
        out,
        "Latency (ms): min {}  mean {:.1}  median {}  p95 {}  p99 {}  max {}",
        latency.min_ms, latency.mean_ms, latency.median_ms, latency.p95_ms, latency.p99_ms, latency.max_ms
    );

    if !report.by_action.is_empty() {
        let _ = writeln!(out, "\nBy action:");
        for (action, breakdown) in &report.by_action {
            let _ = writeln!(out, "{}", breakdown_row(action.as_str(), breakdown));
        }
    }
    if !report.by_agent.is_empty() {
        let _ = writeln!(out, "\nBy agent:");
        for (agent, breakdown) in &report.by_agent {
            let _ = writeln!(out, "{}", breakdown_row(agent, breakdown));
        }
    }

    let verdict = if report.verdict.passed {
        "PASS".green().bold()
    } else {
        "FAIL".red().bold()
    };
    let _ = writeln!(out, "\nVerdict: {}", verdict);
    for reason in &report.verdict.reasons {
        let _ = writeln!(out, "  - {}", reason);
    }
    out
}

/// Write the report as pretty JSON, creating parent directories
pub fn write_report(path: &Path, report: &AggregateReport) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create report directory")?;
    }
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    fs::write(path, json).with_context(|| format!("Failed to write report to {}", path.display()))?;
    Ok(())
}
