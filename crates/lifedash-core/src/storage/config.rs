//! TOML-based application configuration.
//!
//! Stores:
//! - Timer durations and the long-break cadence
//! - API endpoint and bearer token
//! - Cache TTL and request timeout
//! - The streak reference timezone
//!
//! Configuration is stored at `~/.config/lifedash/config.toml`.

use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::boundary::DEFAULT_REFERENCE_TZ;
use crate::error::ConfigError;
use crate::timer::TimerConfig;

/// Remote API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer credential obtained at login.
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Response cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_ttl_secs")]
    pub default_ttl_secs: u64,
}

/// Streak boundary configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakConfig {
    /// IANA zone name anchoring the streak day boundary.
    #[serde(default = "default_reference_timezone")]
    pub reference_timezone: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/lifedash/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub streak: StreakConfig,
}

impl Config {
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the file does
    /// not exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &PathBuf) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })
    }

    /// Parse the configured reference timezone, warning and falling back to
    /// the default on an unknown zone name.
    pub fn reference_tz(&self) -> Tz {
        match self.streak.reference_timezone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                log::warn!(
                    "unknown reference_timezone '{}', using {}",
                    self.streak.reference_timezone,
                    DEFAULT_REFERENCE_TZ
                );
                DEFAULT_REFERENCE_TZ
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.default_ttl_secs)
    }
}

// Default functions
fn default_base_url() -> String {
    "https://api.lifedash.app/".into()
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_cache_ttl_secs() -> u64 {
    30
}
fn default_reference_timezone() -> String {
    DEFAULT_REFERENCE_TZ.name().to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            reference_timezone: default_reference_timezone(),
        }
    }
}
