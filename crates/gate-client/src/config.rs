//! Gateway client configuration
//!
//! All five options are required with no runtime defaults; a partially
//! configured client is a construction error, not a runtime surprise.
//! Supports loading from a file plus `GATE__`-prefixed environment
//! variables.

use gate_core::GateError;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Immutable configuration for the policy gateway
#[derive(Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway base URL, e.g. "https://gate.example.com"
    pub base_url: String,
    /// API key sent on every request
    pub api_key: String,
    /// Tenant scope
    pub tenant_id: String,
    /// Application scope
    pub app_id: String,
    /// Deployment environment, e.g. "production"
    pub environment: String,
}

impl GatewayConfig {
    /// Create a configuration from explicit values
    ///
    /// A trailing slash on `base_url` is trimmed so endpoint paths join
    /// cleanly.
    pub fn new<S: Into<String>>(
        base_url: S,
        api_key: S,
        tenant_id: S,
        app_id: S,
        environment: S,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            tenant_id: tenant_id.into(),
            app_id: app_id.into(),
            environment: environment.into(),
        }
    }

    /// Load configuration from a file, with environment overrides
    ///
    /// Environment variables use the `GATE__` prefix, e.g.
    /// `GATE__API_KEY=...`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(config::Environment::with_prefix("GATE").separator("__"))
            .build()
            .map_err(|e| GateError::config(e.to_string()))?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| GateError::config(e.to_string()))?;
        Ok(config.normalized())
    }

    /// Load configuration from `GATE__`-prefixed environment variables only
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("GATE").separator("__"))
            .build()
            .map_err(|e| GateError::config(e.to_string()))?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| GateError::config(e.to_string()))?;
        Ok(config.normalized())
    }

    fn normalized(mut self) -> Self {
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        self
    }
}

// Manual Debug so the API key never lands in logs
impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("tenant_id", &self.tenant_id)
            .field("app_id", &self.app_id)
            .field("environment", &self.environment)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = GatewayConfig::new("https://gate.example.com/", "k", "t1", "a1", "prod");
        assert_eq!(config.base_url, "https://gate.example.com");
    }

    #[test]
    fn test_debug_hides_api_key() {
        let config = GatewayConfig::new("https://gate.example.com", "sk-live-9x", "t1", "a1", "prod");
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-live-9x"));
        assert!(printed.contains("[REDACTED]"));
    }

    #[test]
    fn test_deserialize_requires_all_fields() {
        let partial = r#"{"base_url": "https://gate.example.com", "api_key": "k"}"#;
        assert!(serde_json::from_str::<GatewayConfig>(partial).is_err());
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "base_url": "https://gate.example.com",
            "api_key": "k",
            "tenant_id": "t1",
            "app_id": "a1",
            "environment": "staging"
        }"#;
        let config: GatewayConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.environment, "staging");
    }
}
