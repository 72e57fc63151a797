mod config;

pub use config::{ApiConfig, CacheConfig, Config, StreakConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/lifedash[-dev]/` based on LIFEDASH_ENV.
///
/// Set LIFEDASH_ENV=dev to keep development state separate.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .ok_or(ConfigError::NoHomeDir)?
        .join(".config");

    let env = std::env::var("LIFEDASH_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("lifedash-dev")
    } else {
        base_dir.join("lifedash")
    };

    ensure_dir(dir)
}

fn ensure_dir(dir: PathBuf) -> Result<PathBuf, ConfigError> {
    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::CreateDirFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
