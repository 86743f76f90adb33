//! Integration tests for stampede-config

use stampede_config::domains::logging::{LogFormat, LogLevel};
use stampede_config::*;
use stampede_core::{ActionKind, Pace, Role};
use std::io::Write;
use std::time::Duration;
use temp_env::with_vars;

#[test]
fn test_default_config_validation() {
    let config = StampedeConfig::default();
    assert!(config.validate_all().is_ok());
}

#[test]
fn test_config_loader_from_env() {
    let vars = vec![
        ("STAMPEDE_BASE_URL", Some("http://target.internal:8080")),
        ("STAMPEDE_AGENT_COUNT", Some("25")),
        ("STAMPEDE_DURATION", Some("60")),
        ("STAMPEDE_MAX_ERROR_RATE", Some("2.5")),
        ("STAMPEDE_LOG_LEVEL", Some("debug")),
        ("STAMPEDE_SEED", Some("42")),
    ];

    with_vars(vars, || {
        let config = ConfigLoader::new().from_env().unwrap();

        assert_eq!(config.target.base_url, "http://target.internal:8080");
        assert_eq!(config.load.agent_count, 25);
        assert_eq!(config.load.duration, Duration::from_secs(60));
        assert_eq!(config.load.seed, Some(42));
        assert_eq!(config.thresholds.max_error_rate, 2.5);
        assert_eq!(config.logging.level, LogLevel::Debug);
    });
}

#[test]
fn test_invalid_env_value_is_reported() {
    with_vars(vec![("STAMPEDE_AGENT_COUNT", Some("lots"))], || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        assert!(matches!(err, ConfigError::EnvError(ref msg) if msg.contains("STAMPEDE_AGENT_COUNT")));
    });
}

#[test]
fn test_custom_prefix() {
    with_vars(vec![("LOADTEST_AGENT_COUNT", Some("3"))], || {
        let config = ConfigLoader::with_prefix("LOADTEST").from_env().unwrap();
        assert_eq!(config.load.agent_count, 3);
    });
}

#[test]
fn test_yaml_config_serialization() {
    let yaml = StampedeConfig::generate_sample();
    let parsed: StampedeConfig = serde_yaml::from_str(&yaml).unwrap();
    assert!(parsed.validate_all().is_ok());
    assert_eq!(parsed.personas.len(), 10);
}

#[test]
fn test_comprehensive_config() {
    let yaml = r#"
target:
  base_url: "http://localhost:4000"
  admin_username: root
  admin_password: hunter2

load:
  agent_count: 4
  duration: 120
  stagger: 250
  pacing_min: 200
  pacing_max: 800
  seed: 7

http:
  timeout: 10
  max_attempts: 2
  retry_delay: 50

agent:
  backoff_threshold: 3
  circuit_threshold: 8

thresholds:
  max_error_rate: 1.0
  max_p95_ms: 800
  max_p99_ms: 1500

logging:
  level: warn
  format: json

personas:
  - name: ops
    role: elevated
    pace: fast
    bias: view_dashboard
  - name: clerk

weights:
  - action: list_items
    weight: 5
  - action: view_dashboard
    weight: 1
"#;

    with_vars(Vec::<(&str, Option<&str>)>::new(), || {
        let config = ConfigLoader::new().from_yaml(yaml).unwrap();

        assert_eq!(config.target.api_root(), "http://localhost:4000/api");
        assert_eq!(config.load.stagger, Duration::from_millis(250));
        assert_eq!(config.load.pacing_max, Duration::from_millis(800));
        assert_eq!(config.http.retry_delay, Duration::from_millis(50));
        assert_eq!(config.agent.circuit_threshold, 8);
        assert_eq!(config.agent.token_freshness, Duration::from_secs(720));
        assert_eq!(config.thresholds.max_p95_ms, 800);
        assert_eq!(config.logging.format, LogFormat::Json);

        assert_eq!(config.personas.len(), 2);
        assert_eq!(config.personas[0].role, Role::Elevated);
        assert_eq!(config.personas[0].pace, Pace::Fast);
        assert_eq!(config.personas[1].bias, ActionKind::ListItems);
        assert_eq!(config.weights.total(), 6);
    });
}

#[test]
fn test_duplicate_personas_rejected() {
    let yaml = "personas:\n  - name: a\n  - name: a\n";
    with_vars(Vec::<(&str, Option<&str>)>::new(), || {
        let err = ConfigLoader::new().from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::DomainError { ref domain, .. } if domain == "personas"));
    });
}

#[test]
fn test_all_zero_weights_rejected() {
    let yaml = "weights:\n  - action: list_items\n    weight: 0\n";
    with_vars(Vec::<(&str, Option<&str>)>::new(), || {
        let err = ConfigLoader::new().from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::DomainError { ref domain, .. } if domain == "weights"));
    });
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "load:\n  agent_count: 2\n  duration: 30").unwrap();

    with_vars(Vec::<(&str, Option<&str>)>::new(), || {
        let config = ConfigLoader::new().load(Some(file.path())).unwrap();
        assert_eq!(config.load.agent_count, 2);
        assert_eq!(config.load.duration, Duration::from_secs(30));
    });
}
