//! Configuration loading for forsetid.
//!
//! Configuration comes from an optional TOML file (`--config <path>`);
//! every section has working defaults, so the daemon also starts with no
//! file at all. The judge API key is never stored in the config file — it
//! is read from the `GROQ_API_KEY` environment variable.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::cache::CacheConfig;
use crate::cost::PricingTable;
use crate::judge::RetryConfig;
use crate::pipeline::{
    AuditConfig, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_TIER1_MODEL, DEFAULT_TIER3_MODEL,
};
use crate::{ForsetiError, Result};

/// Environment variable holding the judge API key.
pub const API_KEY_ENV_VAR: &str = "GROQ_API_KEY";

/// Daemon configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub judge: JudgeConfig,
    #[serde(default)]
    pub cache: CacheSection,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8000).
    #[serde(default = "default_address")]
    pub address: String,
    /// Environment tag reported by the health endpoint.
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            environment: default_environment(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

/// Judge tier and escalation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JudgeConfig {
    #[serde(default = "default_tier1_model")]
    pub tier1_model: String,
    #[serde(default = "default_tier3_model")]
    pub tier3_model: String,
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
    /// Override the judge API base URL (e.g. a local proxy).
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_input_cost")]
    pub input_cost_per_1k: f64,
    #[serde(default = "default_output_cost")]
    pub output_cost_per_1k: f64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            tier1_model: default_tier1_model(),
            tier3_model: default_tier3_model(),
            confidence_threshold: default_confidence_threshold(),
            base_url: None,
            input_cost_per_1k: default_input_cost(),
            output_cost_per_1k: default_output_cost(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_tier1_model() -> String {
    DEFAULT_TIER1_MODEL.to_string()
}

fn default_tier3_model() -> String {
    DEFAULT_TIER3_MODEL.to_string()
}

fn default_confidence_threshold() -> f64 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

fn default_input_cost() -> f64 {
    PricingTable::default().input_cost_per_1k
}

fn default_output_cost() -> f64 {
    PricingTable::default().output_cost_per_1k
}

fn default_max_attempts() -> u32 {
    RetryConfig::default().max_attempts
}

/// Verdict cache sizing.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSection {
    #[serde(default = "default_cache_entries")]
    pub max_entries: usize,
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            max_entries: default_cache_entries(),
            ttl_hours: default_ttl_hours(),
        }
    }
}

fn default_cache_entries() -> usize {
    CacheConfig::default().max_entries
}

fn default_ttl_hours() -> u64 {
    24
}

impl Config {
    /// Load configuration from an explicit path, or defaults when absent.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let Some(path) = explicit_path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path).map_err(|e| {
            ForsetiError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            ForsetiError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Judge API key from the environment.
    pub fn api_key(&self) -> Result<String> {
        std::env::var(API_KEY_ENV_VAR).map_err(|_| {
            ForsetiError::Configuration(format!("Missing {API_KEY_ENV_VAR} in environment"))
        })
    }

    /// Audit config assembled from the judge section.
    pub fn audit_config(&self) -> AuditConfig {
        AuditConfig::new()
            .tier1_model(self.judge.tier1_model.as_str())
            .tier3_model(self.judge.tier3_model.as_str())
            .confidence_threshold(self.judge.confidence_threshold)
            .pricing(PricingTable {
                input_cost_per_1k: self.judge.input_cost_per_1k,
                output_cost_per_1k: self.judge.output_cost_per_1k,
            })
    }

    /// Cache config assembled from the cache section.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new()
            .max_entries(self.cache.max_entries)
            .ttl(Duration::from_secs(self.cache.ttl_hours * 3600))
    }

    /// Retry config assembled from the judge section.
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new().max_attempts(self.judge.max_attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.server.address, "127.0.0.1:8000");
        assert_eq!(config.judge.tier1_model, DEFAULT_TIER1_MODEL);
        assert_eq!(config.judge.confidence_threshold, 0.9);
        assert_eq!(config.cache.max_entries, 10_000);
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [server]
            address = "0.0.0.0:8000"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.address, "0.0.0.0:8000");
        // Defaults preserved
        assert_eq!(config.judge.tier3_model, DEFAULT_TIER3_MODEL);
        assert_eq!(config.cache.ttl_hours, 24);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [server]
            address = "127.0.0.1:9000"
            environment = "staging"

            [judge]
            tier1_model = "llama-3.1-8b-instant"
            tier3_model = "llama-3.3-70b-versatile"
            confidence_threshold = 0.85
            max_attempts = 5

            [cache]
            max_entries = 500
            ttl_hours = 6
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.environment, "staging");
        assert_eq!(config.judge.confidence_threshold, 0.85);
        assert_eq!(config.retry_config().max_attempts, 5);
        assert_eq!(config.cache_config().max_entries, 500);
        assert_eq!(
            config.cache_config().ttl,
            Duration::from_secs(6 * 3600)
        );
    }

    #[test]
    fn config_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Failed to read config file"));
    }
}
