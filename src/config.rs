use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::{HttpSimulationClient, DEFAULT_ENDPOINT};
use crate::error::SimError;
use crate::models::SimulationParams;

/// Application configuration, read from a TOML file.
///
/// Every key is optional:
///
/// ```toml
/// [server]
/// host = "127.0.0.1"
/// port = 8080
///
/// [endpoint]
/// url = "https://logistic-model-backend.onrender.com/simulate"
/// timeout_secs = 30
///
/// [defaults]
/// M = 1000
/// k = 0.1
/// B = 10
/// duration = 52
/// step = 1
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub endpoint: EndpointConfig,
    pub defaults: SimulationParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub url: String,
    /// Request timeout; the HTTP client's default applies when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: None,
        }
    }
}

impl EndpointConfig {
    /// Build the HTTP client described by this section.
    pub fn client(&self) -> HttpSimulationClient {
        let client = HttpSimulationClient::new(self.url.clone());
        match self.timeout_secs {
            Some(secs) => client.with_timeout(Duration::from_secs(secs)),
            None => client,
        }
    }
}

impl AppConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SimError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Render the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, SimError> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), SimError> {
        if self.endpoint.url.trim().is_empty() {
            return Err(SimError::Config("endpoint.url must not be empty".to_string()));
        }
        if !self.defaults.step.is_finite() || self.defaults.step <= 0.0 {
            return Err(SimError::Config(format!(
                "defaults.step must be positive, got {}",
                self.defaults.step
            )));
        }
        Ok(())
    }
}
