use stampede_config::domains::logging::{LogFormat, LogLevel};
use stampede_config::LoggingConfig;
use stampede_logging::{env_filter_for, init_logging, init_simple_tracing};

#[test]
fn test_logging_config_integration() {
    let config: LoggingConfig = serde_yaml::from_str("level: debug\nformat: json\n").unwrap();

    assert_eq!(config.level, LogLevel::Debug);
    assert_eq!(config.format, LogFormat::Json);
    assert!(init_logging(&config, None).is_ok());
}

#[test]
fn test_repeated_initialisation_is_harmless() {
    assert!(init_logging(&LoggingConfig::default(), None).is_ok());
    assert!(init_simple_tracing(Some("warn")).is_ok());
    assert!(init_logging(&LoggingConfig::default(), Some(LogLevel::Trace)).is_ok());
}

#[test]
fn test_filter_accepts_directives() {
    let filter = env_filter_for(Some("stampede_agent=debug,info"), "warn");
    assert!(filter.to_string().contains("stampede_agent=debug"));
}

#[test]
fn test_rust_log_overrides_configured_level() {
    temp_env::with_var("RUST_LOG", Some("stampede_metrics=trace"), || {
        let filter = env_filter_for(None, "info").to_string();
        assert!(filter.contains("stampede_metrics=trace"), "got {filter}");
    });
}

#[test]
fn test_explicit_level_beats_rust_log() {
    temp_env::with_var("RUST_LOG", Some("stampede_metrics=trace"), || {
        let filter = env_filter_for(Some("debug"), "info").to_string();
        assert!(!filter.contains("stampede_metrics"), "got {filter}");
        assert!(filter.contains("debug"));
    });
}

#[test]
fn test_configured_level_without_rust_log() {
    temp_env::with_var_unset("RUST_LOG", || {
        assert_eq!(env_filter_for(None, "error").to_string(), "error");
    });
}
