//! Match predictor — optional external classifier fed with the scored features.
//!
//! The rule-based score never depends on it. `RemotePredictor` posts the
//! feature vector to an HTTP endpoint; any failure surfaces as
//! `MatchError::Prediction` and the engine records no label.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::MatchError;
use crate::scoring::ScoreBreakdown;

/// Feature vector sent to the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionFeatures {
    pub semantic_score: f64,
    pub skill_overlap: f64,
    pub experience_score: f64,
    pub education_score: f64,
    pub matched_skills: usize,
    pub total_jd_skills: usize,
}

impl PredictionFeatures {
    pub fn from_breakdown(breakdown: &ScoreBreakdown) -> Self {
        Self {
            semantic_score: breakdown.raw.semantic,
            skill_overlap: breakdown.raw.skills,
            experience_score: breakdown.raw.experience,
            education_score: breakdown.raw.education,
            matched_skills: breakdown.matched_skills.len(),
            total_jd_skills: breakdown.matched_skills.len() + breakdown.missing_skills.len(),
        }
    }
}

#[async_trait]
pub trait MatchPredictor: Send + Sync {
    async fn predict(&self, features: &PredictionFeatures) -> Result<String, MatchError>;
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    label: String,
}

/// Classifier reached over HTTP: `POST <endpoint>` with the features as JSON,
/// expecting `{"label": "..."}` back.
#[derive(Clone)]
pub struct RemotePredictor {
    client: Client,
    endpoint: String,
}

impl RemotePredictor {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, MatchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MatchError::Configuration(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl MatchPredictor for RemotePredictor {
    async fn predict(&self, features: &PredictionFeatures) -> Result<String, MatchError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(features)
            .send()
            .await
            .map_err(|e| MatchError::Prediction(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MatchError::Prediction(format!(
                "classifier returned {status}: {body}"
            )));
        }

        let parsed: PredictionResponse = response
            .json()
            .await
            .map_err(|e| MatchError::Prediction(format!("malformed response: {e}")))?;

        debug!(label = %parsed.label, "classifier prediction");
        Ok(parsed.label)
    }
}
