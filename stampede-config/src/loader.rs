//! Configuration loading and environment variable handling

use crate::domains::StampedeConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "STAMPEDE".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<StampedeConfig> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        self.from_yaml(&content)
    }

    /// Load configuration from YAML text with environment overrides
    pub fn from_yaml(&self, content: &str) -> ConfigResult<StampedeConfig> {
        let mut config: StampedeConfig = serde_yaml::from_str(content)?;
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<StampedeConfig> {
        let mut config = StampedeConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<StampedeConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut StampedeConfig) -> ConfigResult<()> {
        self.apply_target_overrides(&mut config.target);
        self.apply_load_overrides(&mut config.load)?;
        self.apply_http_overrides(&mut config.http)?;
        self.apply_threshold_overrides(&mut config.thresholds)?;
        self.apply_logging_overrides(&mut config.logging)?;
        Ok(())
    }

    fn apply_target_overrides(&self, config: &mut crate::domains::target::TargetConfig) {
        if let Ok(base_url) = self.get_env_var("BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(username) = self.get_env_var("ADMIN_USERNAME") {
            config.admin_username = username;
        }
        if let Ok(password) = self.get_env_var("ADMIN_PASSWORD") {
            config.admin_password = password;
        }
        if let Ok(password) = self.get_env_var("AGENT_PASSWORD") {
            config.agent_password = password;
        }
    }

    fn apply_load_overrides(&self, config: &mut crate::domains::load::LoadConfig) -> ConfigResult<()> {
        if let Some(count) = self.parse_env_var("AGENT_COUNT")? {
            config.agent_count = count;
        }
        if let Some(seconds) = self.parse_env_var::<u64>("DURATION")? {
            config.duration = Duration::from_secs(seconds);
        }
        if let Some(seed) = self.parse_env_var("SEED")? {
            config.seed = Some(seed);
        }
        Ok(())
    }

    fn apply_http_overrides(&self, config: &mut crate::domains::http::HttpConfig) -> ConfigResult<()> {
        if let Some(seconds) = self.parse_env_var::<u64>("HTTP_TIMEOUT")? {
            config.timeout = Duration::from_secs(seconds);
        }
        if let Some(attempts) = self.parse_env_var("MAX_ATTEMPTS")? {
            config.max_attempts = attempts;
        }
        Ok(())
    }

    fn apply_threshold_overrides(
        &self,
        config: &mut crate::domains::thresholds::ThresholdConfig,
    ) -> ConfigResult<()> {
        if let Some(rate) = self.parse_env_var("MAX_ERROR_RATE")? {
            config.max_error_rate = rate;
        }
        if let Some(p95) = self.parse_env_var("MAX_P95_MS")? {
            config.max_p95_ms = p95;
        }
        if let Some(p99) = self.parse_env_var("MAX_P99_MS")? {
            config.max_p99_ms = p99;
        }
        Ok(())
    }

    fn apply_logging_overrides(
        &self,
        config: &mut crate::domains::logging::LoggingConfig,
    ) -> ConfigResult<()> {
        if let Some(level) = self.parse_env_var("LOG_LEVEL")? {
            config.level = level;
        }
        if let Some(format) = self.parse_env_var("LOG_FORMAT")? {
            config.format = format;
        }
        Ok(())
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }

    /// Parse a prefixed environment variable if it is set
    fn parse_env_var<T>(&self, name: &str) -> ConfigResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_env_var(name) {
            Ok(raw) => raw.trim().parse().map(Some).map_err(|e| {
                ConfigError::EnvError(format!("Invalid {}_{}: {}", self.prefix, name, e))
            }),
            Err(_) => Ok(None),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
