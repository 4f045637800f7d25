//! Signal extraction — turns raw resume and job-description text into the typed
//! signals the aggregator scores.
//!
//! Every extractor is a pure function of its input text. `SignalExtractor` only
//! bundles the vocabulary index and the semantic backend so the batch engine can
//! share one handle across worker tasks.

pub mod education;
pub mod experience;
pub mod semantic;
pub mod skills;
pub mod text;

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::MatchError;
use education::{detect_education, EducationLevel};
use experience::{extract_experience, required_experience};
use semantic::SemanticScorer;
use skills::SkillVocabulary;
use text::{clean_text, remove_bias};

/// Everything the aggregator needs to know about one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSignal {
    /// Canonical, lower-case skill names.
    pub skills: BTreeSet<String>,
    pub experience_years: u32,
    pub education: EducationLevel,
    /// 0–100, always defined.
    pub semantic_score: f64,
}

/// Job-side signals, extracted once per batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSignal {
    pub skills: BTreeSet<String>,
    pub required_years: u32,
    /// Cleaned JD text used for semantic comparison.
    #[serde(skip)]
    pub cleaned_text: String,
}

#[derive(Clone)]
pub struct SignalExtractor {
    vocabulary: Arc<SkillVocabulary>,
    semantic: Arc<dyn SemanticScorer>,
}

impl SignalExtractor {
    pub fn new(vocabulary: Arc<SkillVocabulary>, semantic: Arc<dyn SemanticScorer>) -> Self {
        Self {
            vocabulary,
            semantic,
        }
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    pub fn semantic_backend(&self) -> &'static str {
        self.semantic.backend()
    }

    pub fn job(&self, jd_text: &str) -> JobSignal {
        let cleaned_text = clean_text(jd_text);
        JobSignal {
            skills: self.vocabulary.extract(&cleaned_text),
            required_years: required_experience(jd_text),
            cleaned_text,
        }
    }

    /// Extracts the candidate's signals against `job`.
    ///
    /// Demographic fields are stripped first. Empty resume text is not an error:
    /// it yields no skills, zero years and a semantic score of 0.
    pub fn candidate(
        &self,
        candidate: &str,
        resume_text: &str,
        job: &JobSignal,
    ) -> Result<CandidateSignal, MatchError> {
        let unbiased = remove_bias(resume_text);
        let cleaned = clean_text(&unbiased);

        let semantic_score = self.semantic.similarity(&cleaned, &job.cleaned_text);
        if !semantic_score.is_finite() {
            return Err(MatchError::extraction(
                candidate,
                format!(
                    "{} backend returned a non-finite similarity",
                    self.semantic.backend()
                ),
            ));
        }

        Ok(CandidateSignal {
            skills: self.vocabulary.extract(&cleaned),
            experience_years: extract_experience(&unbiased),
            education: detect_education(&unbiased),
            semantic_score: semantic_score.clamp(0.0, 100.0),
        })
    }
}
