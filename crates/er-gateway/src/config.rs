//! Gateway configuration.
//!
//! The daemon assembles this from CLI flags, environment variables and an
//! optional TOML file; the gateway consumes the resolved values and never
//! re-reads configuration at request time.

use er_core::ConfigError;
use er_engine::EngineConfig;
use er_term::TermConfig;
use serde::Deserialize;

/// Fully resolved gateway configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// IP interface the listener binds.
    pub bind_address: String,
    /// Port the listener binds.
    pub http_port: u16,
    /// Enable every service, overriding the per-service flags.
    pub enable_all: bool,
    /// Enable the entity-resolution REST API.
    pub enable_api: bool,
    /// Enable the API documentation UI.
    pub enable_api_docs: bool,
    /// Enable the terminal service.
    pub enable_terminal: bool,
    /// Entity-resolution adapter configuration.
    pub engine: EngineConfig,
    /// Terminal adapter configuration.
    pub terminal: TermConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            http_port: 8261,
            enable_all: false,
            enable_api: false,
            enable_api_docs: false,
            enable_terminal: false,
            engine: EngineConfig::default(),
            terminal: TermConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::File {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::File {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}
