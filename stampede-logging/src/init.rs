use anyhow::Result;
use stampede_config::domains::logging::{LogFormat, LogLevel};
use stampede_config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Build the filter: an explicit level wins, then `RUST_LOG`, then
/// `default_level`. An unparsable level falls back to `default_level`.
pub fn env_filter_for(explicit: Option<&str>, default_level: &str) -> EnvFilter {
    match explicit {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| {
            eprintln!("Invalid log level '{}', falling back to '{}'", level, default_level);
            EnvFilter::new(default_level)
        }),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
    }
}

/// Initialize logging from configuration.
///
/// `explicit` is a level given on the command line. Without one, `RUST_LOG`
/// overrides the configured level.
pub fn init_logging(config: &LoggingConfig, explicit: Option<LogLevel>) -> Result<()> {
    let env_filter = env_filter_for(explicit.map(|level| level.as_str()), config.level.as_str());
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    // try_init so that tests and repeated calls don't panic
    let result = match config.format {
        LogFormat::Json => builder.json().with_current_span(false).try_init(),
        LogFormat::Compact => builder.compact().with_target(false).try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Text => builder.with_target(false).try_init(),
    };

    if result.is_err() {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(())
}

/// Initialize simple tracing for basic console output
pub fn init_simple_tracing(log_level: Option<&str>) -> Result<()> {
    if tracing_subscriber::fmt()
        .with_env_filter(env_filter_for(log_level, "warn"))
        .try_init()
        .is_err()
    {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(())
}
