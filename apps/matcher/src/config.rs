use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::monitoring::drift::DEFAULT_WINDOW;

/// Engine configuration loaded from environment variables.
/// Every value has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upper bound on candidates scored concurrently in one batch.
    pub workers: usize,
    /// Directory holding `skills.json` / `roles.json` / `learning.json` overrides.
    pub catalog_dir: Option<PathBuf>,
    /// Endpoint of the optional match classifier. Rule-based only when unset.
    pub model_url: Option<String>,
    pub model_timeout_secs: u64,
    pub drift_window: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let default_workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);

        Ok(Config {
            workers: parse_env("MATCHER_WORKERS", default_workers)?,
            catalog_dir: optional_env("MATCHER_CATALOG_DIR").map(PathBuf::from),
            model_url: optional_env("MATCHER_MODEL_URL"),
            model_timeout_secs: parse_env("MATCHER_MODEL_TIMEOUT_SECS", 10)?,
            drift_window: parse_env("DRIFT_WINDOW", DEFAULT_WINDOW)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}
