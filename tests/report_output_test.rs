//! Shape of the machine-readable report consumers read

use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;
use stampede_config::ThresholdConfig;
use stampede_core::{ActionEvent, ActionKind};
use stampede_metrics::{AggregateReport, MetricsCollector};

fn sample_report() -> AggregateReport {
    let start = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let events = vec![
        ActionEvent::succeeded("alice", ActionKind::ListItems, start, 120, 200),
        ActionEvent::succeeded("bob", ActionKind::CreateItem, start + Duration::seconds(70), 300, 201),
        ActionEvent::failed("bob", ActionKind::UpdateItem, start + Duration::seconds(130), 45, 409, "HTTP 409: conflict"),
        ActionEvent::failed("alice", ActionKind::ViewItem, start + Duration::seconds(131), 5000, 0, "timed out"),
    ];
    AggregateReport::from_events(
        &events,
        start,
        Some(start + Duration::seconds(150)),
        &ThresholdConfig::default(),
    )
}

#[test]
fn test_report_json_keys() {
    let json = serde_json::to_value(sample_report()).unwrap();

    for key in [
        "startedAt",
        "finishedAt",
        "summary",
        "responseTimes",
        "byAction",
        "byAgent",
        "timeline",
        "errors",
        "thresholds",
        "verdict",
    ] {
        assert!(json.get(key).is_some(), "missing {}", key);
    }

    let summary = &json["summary"];
    assert_eq!(summary["totalActions"], 4);
    assert_eq!(summary["failedActions"], 2);
    assert_eq!(summary["errorRate"], 50.0);
    assert_eq!(summary["agents"], 2);

    assert_eq!(json["byAction"]["create_item"]["successful"], 1);
    assert_eq!(json["byAgent"]["bob"]["failed"], 1);
    assert_eq!(json["responseTimes"]["count"], 2);
}

#[test]
fn test_timeline_buckets_by_minute() {
    let report = sample_report();

    let counts: Vec<(u32, u64, u64)> = report.timeline.iter().map(|b| (b.minute, b.actions, b.errors)).collect();
    assert_eq!(counts, vec![(0, 1, 0), (1, 1, 0), (2, 2, 2)]);
    assert_eq!(report.timeline[1].start, report.started_at + Duration::seconds(60));
}

#[test]
fn test_errors_and_verdict_serialized() {
    let json = serde_json::to_value(sample_report()).unwrap();

    let errors = json["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["httpStatus"], 409);
    assert_eq!(errors[1]["httpStatus"], 0);
    assert_eq!(errors[1]["action"], "view_item");

    assert_eq!(json["verdict"]["passed"], Value::Bool(false));
    assert_eq!(json["verdict"]["reasons"][0], "Error rate 50% exceeds threshold of 5%");
}

#[test]
fn test_collector_report_matches_pure_report() {
    let collector = MetricsCollector::new();
    collector.mark_started();
    let start = Utc::now();
    collector.record(ActionEvent::succeeded("carol", ActionKind::SearchItems, start, 80, 200));
    collector.record(ActionEvent::failed("carol", ActionKind::ViewDashboard, start, 20, 503, "HTTP 503"));
    collector.mark_finished();

    let thresholds = ThresholdConfig::default();
    let report = collector.generate_report(&thresholds);
    let again = AggregateReport::from_events(
        &collector.events(),
        report.started_at,
        Some(report.finished_at),
        &thresholds,
    );
    assert_eq!(report, again);

    let parsed: AggregateReport = serde_json::from_str(&serde_json::to_string_pretty(&report).unwrap()).unwrap();
    assert_eq!(parsed, report);
}

#[test]
fn test_report_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stampede-report.json");
    let report = sample_report();

    std::fs::write(&path, serde_json::to_string_pretty(&report).unwrap()).unwrap();
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.starts_with("{\n  \"startedAt\""));

    let parsed: AggregateReport = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, report);
    assert!(!parsed.passed());
}
