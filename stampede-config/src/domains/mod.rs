//! Domain-specific configuration modules

pub mod agent;
pub mod http;
pub mod load;
pub mod logging;
pub mod target;
pub mod thresholds;
pub mod utils;

use crate::error::{ConfigError, ConfigResult};
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};
use stampede_core::{default_personas, Persona, WeightTable};
use std::collections::HashSet;

/// Main Stampede configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StampedeConfig {
    /// Service under test
    pub target: target::TargetConfig,

    /// Agent count, duration and pacing
    pub load: load::LoadConfig,

    /// HTTP client and transport retries
    pub http: http::HttpConfig,

    /// Per-agent recovery behaviour
    pub agent: agent::AgentConfig,

    /// Pass/fail limits
    pub thresholds: thresholds::ThresholdConfig,

    /// Logging configuration
    pub logging: logging::LoggingConfig,

    /// Persona roster, assigned to agents round-robin
    pub personas: Vec<Persona>,

    /// Base action weights, in selection order
    pub weights: WeightTable,
}

impl Default for StampedeConfig {
    fn default() -> Self {
        Self {
            target: Default::default(),
            load: Default::default(),
            http: Default::default(),
            agent: Default::default(),
            thresholds: Default::default(),
            logging: Default::default(),
            personas: default_personas(),
            weights: WeightTable::default(),
        }
    }
}

impl StampedeConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.target.validate()?;
        self.load.validate()?;
        self.http.validate()?;
        self.agent.validate()?;
        self.thresholds.validate()?;
        self.logging.validate()?;
        self.validate_personas()?;
        self.validate_weights()?;
        Ok(())
    }

    fn validate_personas(&self) -> ConfigResult<()> {
        if self.personas.is_empty() {
            return Err(domain_error("personas", "at least one persona is required"));
        }

        let mut seen = HashSet::new();
        for persona in &self.personas {
            if persona.name.trim().is_empty() {
                return Err(domain_error("personas", "persona name cannot be empty"));
            }
            if !seen.insert(persona.name.as_str()) {
                return Err(domain_error(
                    "personas",
                    format!("duplicate persona '{}'", persona.name),
                ));
            }
        }
        Ok(())
    }

    fn validate_weights(&self) -> ConfigResult<()> {
        self.weights
            .validate()
            .map_err(|e| domain_error("weights", e.to_string()))?;
        if self.weights.total() == 0 {
            return Err(domain_error("weights", "weight table must have a positive total"));
        }
        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = StampedeConfig::default();
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}

fn domain_error(domain: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::DomainError {
        domain: domain.to_string(),
        message: message.into(),
    }
}
