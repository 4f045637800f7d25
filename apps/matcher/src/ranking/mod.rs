//! Batch ranking — result types and the stable rank assignment.

pub mod engine;

pub use engine::MatchEngine;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extraction::JobSignal;
use crate::recommend::Recommendations;
use crate::scoring::ScoreBreakdown;

/// Everything produced for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateAnalysis {
    pub candidate: String,
    pub breakdown: ScoreBreakdown,
    pub recommendations: Recommendations,
    /// Category → candidate skills in that category.
    pub categorized_skills: BTreeMap<String, Vec<String>>,
    pub degree: String,
    /// Classifier label; `None` when no classifier is configured or it failed.
    pub model_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    /// 1-based, unique and contiguous within a batch.
    pub rank: usize,
    #[serde(flatten)]
    pub analysis: CandidateAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedCandidate {
    pub candidate: String,
    pub code: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub role_id: String,
    pub job: JobSignal,
    pub results: Vec<RankedResult>,
    pub excluded: Vec<ExcludedCandidate>,
    /// True when the batch was cut short; `results` then holds only the
    /// candidates that finished before cancellation.
    pub cancelled: bool,
}

/// Orders analyses by final score, highest first. Equal scores keep input
/// order (`index` is the candidate's position in the submitted batch).
/// Ranks are assigned 1..=N after sorting.
pub fn rank_results(mut completed: Vec<(usize, CandidateAnalysis)>) -> Vec<RankedResult> {
    completed.sort_by_key(|(index, _)| *index);
    completed.sort_by(|(_, a), (_, b)| {
        b.breakdown
            .final_score
            .total_cmp(&a.breakdown.final_score)
    });
    completed
        .into_iter()
        .enumerate()
        .map(|(position, (_, analysis))| RankedResult {
            rank: position + 1,
            analysis,
        })
        .collect()
}
