//! Domain-driven configuration management for Stampede
//!
//! Configuration is split by functional domain, loaded from YAML with
//! environment variable overrides, and validated per domain.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use validation::Validatable;

// Re-export domain configurations
pub use domains::{
    agent::AgentConfig, http::HttpConfig, load::LoadConfig, logging::LoggingConfig,
    target::TargetConfig, thresholds::ThresholdConfig, StampedeConfig,
};

// Re-export utilities
pub use domains::utils::{serde_duration, serde_millis};
