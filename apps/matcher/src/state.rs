use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use crate::catalog::Catalogs;
use crate::config::Config;
use crate::monitoring::DriftMonitor;
use crate::predictor::RemotePredictor;
use crate::ranking::MatchEngine;

/// Process-wide handles, built once at startup and shared by reference.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub engine: Arc<MatchEngine>,
    /// Same monitor the engine logs into; exposed for status reporting.
    pub drift: Arc<DriftMonitor>,
}

impl AppState {
    pub fn build(config: Config) -> Result<Self> {
        let catalogs = match &config.catalog_dir {
            Some(dir) => Catalogs::from_dir(dir)
                .with_context(|| format!("Failed to load catalogs from {}", dir.display()))?,
            None => Catalogs::embedded().context("Embedded catalogs are invalid")?,
        };

        let drift = Arc::new(DriftMonitor::new(config.drift_window));
        let mut engine = MatchEngine::from_catalogs(&catalogs, Arc::clone(&drift))
            .context("Failed to build match engine")?
            .with_workers(config.workers);

        if let Some(url) = &config.model_url {
            let predictor =
                RemotePredictor::new(url.clone(), Duration::from_secs(config.model_timeout_secs))
                    .context("Failed to build classifier client")?;
            info!("Classifier enabled at {}", predictor.endpoint());
            engine = engine.with_predictor(Arc::new(predictor));
        }

        info!(
            "Engine ready: {} workers, default role '{}', drift window {}",
            engine.workers(),
            engine.registry().default_role(),
            drift.capacity()
        );

        Ok(AppState {
            config,
            engine: Arc::new(engine),
            drift,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            workers: 2,
            catalog_dir: None,
            model_url: None,
            model_timeout_secs: 10,
            drift_window: 5,
            rust_log: "info".to_string(),
        }
    }

    #[test]
    fn test_build_with_embedded_catalogs() {
        let state = AppState::build(config()).unwrap();
        assert_eq!(state.drift.capacity(), 5);
        assert_eq!(state.engine.detect_role("DevOps engineer"), "DevOps Engineer");
    }

    #[tokio::test]
    async fn test_engine_and_state_share_drift_window() {
        let state = AppState::build(config()).unwrap();
        state
            .engine
            .analyze("Python developer", "Python developer", None)
            .await
            .unwrap();
        assert_eq!(state.drift.len(), 1);
        assert_eq!(state.engine.drift_status().sample_size, 1);
    }

    #[test]
    fn test_zero_workers_is_raised_to_one() {
        let mut cfg = config();
        cfg.workers = 0;
        let state = AppState::build(cfg).unwrap();
        assert_eq!(state.engine.workers(), 1);
    }

    #[test]
    fn test_invalid_catalog_override_fails_startup() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("roles.json"), "{}").unwrap();
        let mut cfg = config();
        cfg.catalog_dir = Some(dir.path().to_path_buf());
        assert!(AppState::build(cfg).is_err());
    }
}
