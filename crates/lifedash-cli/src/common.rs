//! Shared helpers for CLI commands: engine state round-tripping, client
//! construction, and the runtime for async API calls.

use std::path::PathBuf;
use std::sync::Arc;

use lifedash_core::storage::data_dir;
use lifedash_core::{ApiClient, Config, PomodoroEngine, ResponseCache};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

fn engine_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    Ok(data_dir()?.join("timer_state.json"))
}

/// Load the persisted engine, or a fresh one on first run. Configuration
/// changes since the last invocation are applied on load.
pub fn load_engine(config: &Config) -> PomodoroEngine {
    let mut engine = engine_path()
        .ok()
        .and_then(|path| std::fs::read_to_string(path).ok())
        .and_then(|json| serde_json::from_str::<PomodoroEngine>(&json).ok())
        .unwrap_or_else(|| PomodoroEngine::new(config.timer.clone()));
    engine.set_config(config.timer.clone());
    engine
}

pub fn save_engine(engine: &PomodoroEngine) -> CliResult {
    let json = serde_json::to_string(engine)?;
    std::fs::write(engine_path()?, json)?;
    Ok(())
}

pub fn cards_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    Ok(data_dir()?.join("cards.json"))
}

pub fn api_client(config: &Config) -> Result<ApiClient, Box<dyn std::error::Error>> {
    Ok(ApiClient::with_cache(
        &config.api.base_url,
        config.api.token.clone(),
        Arc::new(ResponseCache::new()),
        config.request_timeout(),
        config.cache_ttl(),
    )?)
}

pub fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::error::Error>> {
    Ok(tokio::runtime::Runtime::new()?)
}
