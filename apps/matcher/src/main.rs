use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use matcher::config::Config;
use matcher::state::AppState;

#[derive(Debug, Parser)]
#[command(name = "matcher", version)]
#[command(about = "Rank resumes against a job description", long_about = None)]
struct Args {
    /// Job description text file
    jd: PathBuf,

    /// Resume text files to rank
    #[arg(required = true)]
    resumes: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting matcher v{}", env!("CARGO_PKG_VERSION"));

    let jd_text = tokio::fs::read_to_string(&args.jd)
        .await
        .with_context(|| format!("Failed to read job description {}", args.jd.display()))?;

    let state = AppState::build(config)?;

    // Ctrl-C stops scheduling; finished candidates are still ranked
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling batch");
            on_signal.cancel();
        }
    });

    let report = state
        .engine
        .batch_analyze(&args.resumes, &jd_text, None, &cancel)
        .await;

    let output = json!({
        "batch": report,
        "drift": state.engine.drift_status(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_take_jd_then_resumes() {
        let args = Args::try_parse_from(["matcher", "jd.txt", "a.txt", "b.txt"]).unwrap();
        assert_eq!(args.jd, PathBuf::from("jd.txt"));
        assert_eq!(args.resumes.len(), 2);
    }

    #[test]
    fn test_args_require_a_resume() {
        assert!(Args::try_parse_from(["matcher", "jd.txt"]).is_err());
        assert!(Args::try_parse_from(["matcher", "--help"]).is_err());
    }
}
