//! Match engine — the service object that scores, explains and ranks candidates.
//!
//! Built once at startup from the catalogs and shared by handle. Each candidate
//! in a batch runs as its own task: text is read through the `TextSource`, the
//! CPU-bound extraction and scoring run on the blocking pool, and the optional
//! classifier is awaited afterwards. A `Semaphore` bounds how many candidates are
//! in flight. Failures, panics included, exclude the candidate and never abort
//! the batch.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::{Id, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::catalog::Catalogs;
use crate::errors::MatchError;
use crate::extraction::semantic::{SemanticScorer, TfIdfScorer};
use crate::extraction::skills::SkillVocabulary;
use crate::extraction::text::{candidate_label, PlainTextSource, TextSource};
use crate::extraction::{JobSignal, SignalExtractor};
use crate::monitoring::{DriftMonitor, DriftReport};
use crate::predictor::{MatchPredictor, PredictionFeatures};
use crate::ranking::{rank_results, BatchReport, CandidateAnalysis, ExcludedCandidate};
use crate::recommend::learning::LearningPlanner;
use crate::recommend::Recommender;
use crate::roles::RoleRegistry;
use crate::scoring::{ScoreAggregator, ScoreBreakdown};

/// Label used for candidates submitted through `analyze`.
const INLINE_CANDIDATE: &str = "inline";

/// A resume already in memory.
#[derive(Debug, Clone)]
pub struct CandidateDocument {
    pub candidate: String,
    pub text: String,
}

enum CandidateInput {
    Text(String),
    File(PathBuf),
}

type TaskOutcome = (usize, String, Result<CandidateAnalysis, MatchError>);

#[derive(Clone)]
pub struct MatchEngine {
    vocabulary: Arc<SkillVocabulary>,
    extractor: SignalExtractor,
    registry: Arc<RoleRegistry>,
    aggregator: ScoreAggregator,
    recommender: Recommender,
    drift: Arc<DriftMonitor>,
    predictor: Option<Arc<dyn MatchPredictor>>,
    text_source: Arc<dyn TextSource>,
    workers: usize,
}

impl MatchEngine {
    /// Validates the catalogs and builds every index. Any `Configuration` error
    /// here is fatal for the process.
    pub fn from_catalogs(catalogs: &Catalogs, drift: Arc<DriftMonitor>) -> Result<Self, MatchError> {
        let vocabulary = Arc::new(SkillVocabulary::from_catalog(&catalogs.skills)?);
        let registry = Arc::new(RoleRegistry::from_catalog(&catalogs.roles, &vocabulary)?);
        let planner = Arc::new(LearningPlanner::from_catalog(&catalogs.learning, &vocabulary)?);

        info!(
            "Skill vocabulary v{} loaded: {} canonical skills",
            catalogs.skills.version,
            vocabulary.len()
        );

        Ok(MatchEngine {
            extractor: SignalExtractor::new(Arc::clone(&vocabulary), Arc::new(TfIdfScorer)),
            vocabulary,
            aggregator: ScoreAggregator::new(Arc::clone(&registry)),
            recommender: Recommender::new(Arc::clone(&registry), planner),
            registry,
            drift,
            predictor: None,
            text_source: Arc::new(PlainTextSource),
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        })
    }

    pub fn with_predictor(mut self, predictor: Arc<dyn MatchPredictor>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn with_semantic_scorer(mut self, semantic: Arc<dyn SemanticScorer>) -> Self {
        self.extractor = SignalExtractor::new(Arc::clone(&self.vocabulary), semantic);
        self
    }

    pub fn with_text_source(mut self, text_source: Arc<dyn TextSource>) -> Self {
        self.text_source = text_source;
        self
    }

    /// Maximum candidates scored concurrently. Values below 1 are raised to 1.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn detect_role(&self, jd_text: &str) -> &str {
        self.registry.detect_role(jd_text)
    }

    pub fn drift_status(&self) -> DriftReport {
        self.drift.check()
    }

    /// Scores one resume against one JD. `role_id` defaults to the detected role.
    pub async fn analyze(
        &self,
        resume_text: &str,
        jd_text: &str,
        role_id: Option<&str>,
    ) -> Result<CandidateAnalysis, MatchError> {
        let role_id: Arc<str> = self.resolve_role(jd_text, role_id).into();
        let job = Arc::new(self.extractor.job(jd_text));

        let analysis = self
            .process(
                INLINE_CANDIDATE.to_string(),
                CandidateInput::Text(resume_text.to_string()),
                job,
                role_id,
            )
            .await?;
        self.drift.log(analysis.breakdown.final_score);
        Ok(analysis)
    }

    /// Reads each resume file and ranks the batch.
    pub async fn batch_analyze(
        &self,
        paths: &[PathBuf],
        jd_text: &str,
        role_id: Option<&str>,
        cancel: &CancellationToken,
    ) -> BatchReport {
        let inputs = paths
            .iter()
            .map(|p| (candidate_label(p), CandidateInput::File(p.clone())))
            .collect();
        self.run_batch(inputs, jd_text, role_id, cancel).await
    }

    /// Ranks resumes already held in memory.
    pub async fn rank_batch(
        &self,
        candidates: Vec<CandidateDocument>,
        jd_text: &str,
        role_id: Option<&str>,
        cancel: &CancellationToken,
    ) -> BatchReport {
        let inputs = candidates
            .into_iter()
            .map(|c| (c.candidate, CandidateInput::Text(c.text)))
            .collect();
        self.run_batch(inputs, jd_text, role_id, cancel).await
    }

    fn resolve_role(&self, jd_text: &str, role_id: Option<&str>) -> String {
        match role_id {
            Some(role) => role.to_string(),
            None => self.registry.detect_role(jd_text).to_string(),
        }
    }

    async fn run_batch(
        &self,
        inputs: Vec<(String, CandidateInput)>,
        jd_text: &str,
        role_id: Option<&str>,
        cancel: &CancellationToken,
    ) -> BatchReport {
        let batch_id = Uuid::new_v4();
        let role_id = self.resolve_role(jd_text, role_id);
        let job = Arc::new(self.extractor.job(jd_text));
        let started = Instant::now();

        info!(
            %batch_id,
            role = %role_id,
            semantic = self.extractor.semantic_backend(),
            candidates = inputs.len(),
            jd_skills = job.skills.len(),
            "Starting batch"
        );

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let shared_role: Arc<str> = role_id.clone().into();
        let mut tasks: JoinSet<TaskOutcome> = JoinSet::new();
        let mut identities: HashMap<Id, String> = HashMap::with_capacity(inputs.len());

        for (index, (candidate, input)) in inputs.into_iter().enumerate() {
            let engine = self.clone();
            let job = Arc::clone(&job);
            let role = Arc::clone(&shared_role);
            let semaphore = Arc::clone(&semaphore);
            let label = candidate.clone();
            let handle = tasks.spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => engine.process(candidate.clone(), input, job, role).await,
                    Err(e) => Err(MatchError::Internal(e.into())),
                };
                (index, candidate, outcome)
            });
            identities.insert(handle.id(), label);
        }

        let mut completed = Vec::new();
        let mut excluded = Vec::new();
        let mut cancelled = false;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled(), if !cancelled => {
                    cancelled = true;
                    warn!(%batch_id, finished = completed.len(), "Batch cancelled; keeping finished candidates");
                    tasks.abort_all();
                }
                joined = tasks.join_next_with_id() => {
                    let Some(joined) = joined else { break };
                    match joined {
                        Ok((_, (index, _, Ok(analysis)))) => {
                            self.drift.log(analysis.breakdown.final_score);
                            completed.push((index, analysis));
                        }
                        Ok((_, (_, candidate, Err(err)))) => {
                            warn!(
                                %batch_id,
                                candidate = %candidate,
                                code = err.code(),
                                "Excluding candidate: {err}"
                            );
                            excluded.push(ExcludedCandidate {
                                candidate,
                                code: err.code().to_string(),
                                reason: err.to_string(),
                            });
                        }
                        Err(e) if e.is_cancelled() => {}
                        Err(e) => {
                            let candidate = identities
                                .remove(&e.id())
                                .unwrap_or_else(|| format!("task-{}", e.id()));
                            let err =
                                MatchError::Internal(anyhow::anyhow!("candidate task failed: {e}"));
                            error!(
                                %batch_id,
                                candidate = %candidate,
                                code = err.code(),
                                "Excluding candidate: {err}"
                            );
                            excluded.push(ExcludedCandidate {
                                candidate,
                                code: err.code().to_string(),
                                reason: err.to_string(),
                            });
                        }
                    }
                }
            }
        }

        let results = rank_results(completed);
        info!(
            %batch_id,
            ranked = results.len(),
            excluded = excluded.len(),
            cancelled,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Batch finished"
        );

        BatchReport {
            batch_id,
            role_id,
            job: JobSignal::clone(&job),
            results,
            excluded,
            cancelled,
        }
    }

    async fn process(
        &self,
        candidate: String,
        input: CandidateInput,
        job: Arc<JobSignal>,
        role_id: Arc<str>,
    ) -> Result<CandidateAnalysis, MatchError> {
        let started = Instant::now();
        let text = match input {
            CandidateInput::Text(text) => text,
            CandidateInput::File(path) => self.text_source.extract_text(&path).await?,
        };

        let engine = self.clone();
        let label = candidate.clone();
        let mut analysis =
            tokio::task::spawn_blocking(move || engine.score(&label, &text, &job, &role_id))
                .await
                .map_err(|e| MatchError::extraction(&candidate, format!("scoring task failed: {e}")))??;

        analysis.model_label = self.predict_label(&candidate, &analysis.breakdown).await;

        debug!(
            candidate = %candidate,
            final_score = analysis.breakdown.final_score,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Candidate scored"
        );
        Ok(analysis)
    }

    fn score(
        &self,
        candidate: &str,
        text: &str,
        job: &JobSignal,
        role_id: &str,
    ) -> Result<CandidateAnalysis, MatchError> {
        let signal = self.extractor.candidate(candidate, text, job)?;
        let breakdown = self.aggregator.compute(&signal, job, role_id);
        let recommendations = self.recommender.recommend(&job.skills, &signal.skills);
        let categorized_skills = self.vocabulary.categorize(&signal.skills);

        Ok(CandidateAnalysis {
            candidate: candidate.to_string(),
            degree: signal.education.label().to_string(),
            breakdown,
            recommendations,
            categorized_skills,
            model_label: None,
        })
    }

    async fn predict_label(&self, candidate: &str, breakdown: &ScoreBreakdown) -> Option<String> {
        let predictor = self.predictor.as_ref()?;
        let features = PredictionFeatures::from_breakdown(breakdown);
        match predictor.predict(&features).await {
            Ok(label) => Some(label),
            Err(e) => {
                warn!(candidate = %candidate, code = e.code(), "Classifier unavailable: {e}");
                None
            }
        }
    }
}
