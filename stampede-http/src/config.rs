//! HTTP configuration

use stampede_config::HttpConfig as ConfigHttpConfig;
use std::time::Duration;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,

    /// Idle connections kept per host; agents share one pool
    pub max_idle_per_host: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: "Stampede/0.1".to_string(),
            max_idle_per_host: 64,
        }
    }
}

impl From<&ConfigHttpConfig> for HttpConfig {
    fn from(config: &ConfigHttpConfig) -> Self {
        Self {
            timeout: config.timeout,
            user_agent: config.user_agent.clone(),
            ..Self::default()
        }
    }
}
