//! Target service configuration

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, validate_url, Validatable};
use serde::{Deserialize, Serialize};

/// Where the service under test lives and how to authenticate against it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Base address of the service, e.g. `http://localhost:3000`
    pub base_url: String,

    /// Path prefix for every API route
    pub api_prefix: String,

    /// Credentials of the driving administrator, checked before any load starts
    pub admin_username: String,
    pub admin_password: String,

    /// Password shared by every persona account
    pub agent_password: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            api_prefix: "/api".to_string(),
            admin_username: "admin".to_string(),
            admin_password: "admin".to_string(),
            agent_password: "password".to_string(),
        }
    }
}

impl TargetConfig {
    /// Base URL joined with the API prefix, without a trailing slash
    pub fn api_root(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let prefix = self.api_prefix.trim_matches('/');
        if prefix.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, prefix)
        }
    }
}

impl Validatable for TargetConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url(&self.base_url, "base_url", self.domain_name())?;
        validate_required_string(&self.admin_username, "admin_username", self.domain_name())?;
        validate_required_string(&self.admin_password, "admin_password", self.domain_name())?;
        validate_required_string(&self.agent_password, "agent_password", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "target"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_root_joining() {
        let mut config = TargetConfig::default();
        assert_eq!(config.api_root(), "http://localhost:3000/api");

        config.base_url = "http://localhost:3000/".to_string();
        config.api_prefix = "api/v2/".to_string();
        assert_eq!(config.api_root(), "http://localhost:3000/api/v2");

        config.api_prefix = String::new();
        assert_eq!(config.api_root(), "http://localhost:3000");
    }

    #[test]
    fn test_target_validation() {
        let mut config = TargetConfig::default();
        assert!(config.validate().is_ok());

        config.admin_password = String::new();
        assert!(config.validate().is_err());
    }
}
