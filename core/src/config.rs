//! Endpoint and transport configuration.
//!
//! Values are layered with figment: built-in defaults, then an optional
//! TOML file, then `CHARACTER_`-prefixed environment variables (use `__`
//! to reach nested keys, e.g. `CHARACTER_CHARACTER__BASE_URL`). The loaded
//! `ApiConfig` is immutable and handed to clients and gateways when they
//! are constructed.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_PREFIX: &str = "CHARACTER_";

const CHARACTER_BASE_URL: &str = "https://rickandmortyapi.com/api";
const SETTINGS_BASE_URL: &str = "https://octomobile-uat.cimbniaga.co.id/staging/api";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

/// Base URL and static headers for one upstream endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub base_url: String,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl EndpointConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            headers: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Full client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub character: EndpointConfig,
    pub settings: EndpointConfig,

    /// Upper bound for one HTTP exchange, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            character: EndpointConfig::new(CHARACTER_BASE_URL),
            settings: EndpointConfig::new(SETTINGS_BASE_URL)
                .with_header("X-Device-Info", "iOS")
                .with_header("Content-Type", "application/vnd.api.v4+json")
                .with_header("Application-Version", "3.1.40")
                .with_header("X-Device-ID", "24629109-0F53-4B93-9614-659C4209C344"),
            timeout_secs: default_timeout(),
        }
    }
}

impl ApiConfig {
    /// Defaults overridden by the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// Defaults overridden by `path` (if it exists), then by the environment.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::from_figment(figment)
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, endpoint) in [("character.base_url", &self.character), ("settings.base_url", &self.settings)] {
            if endpoint.base_url.trim().is_empty() {
                return Err(ConfigError::Validation {
                    field: field.into(),
                    reason: "must not be empty".into(),
                });
            }
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation {
                field: "timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}
