//! Score aggregation — bounded final score, classification and confidence.

pub mod aggregator;

pub use aggregator::{skill_overlap, ScoreAggregator};

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::extraction::education::EducationLevel;
use crate::roles::ComponentWeights;

pub const STRONG_FIT_THRESHOLD: f64 = 85.0;
pub const GOOD_FIT_THRESHOLD: f64 = 70.0;
pub const POTENTIAL_FIT_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    StrongFit,
    GoodFit,
    PotentialFit,
    NotSuitable,
}

impl Classification {
    /// Inclusive lower bounds: 85 / 70 / 50.
    pub fn from_score(score: f64) -> Self {
        if score >= STRONG_FIT_THRESHOLD {
            Classification::StrongFit
        } else if score >= GOOD_FIT_THRESHOLD {
            Classification::GoodFit
        } else if score >= POTENTIAL_FIT_THRESHOLD {
            Classification::PotentialFit
        } else {
            Classification::NotSuitable
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Classification::StrongFit => "Strong Fit",
            Classification::GoodFit => "Good Fit",
            Classification::PotentialFit => "Potential Fit",
            Classification::NotSuitable => "Not Suitable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// `alignment` is |semantic − overlap|, `coverage` the matched share of JD
    /// skills, both in points. All comparisons are strict.
    pub fn assess(alignment: f64, coverage: f64) -> Self {
        if alignment < 15.0 && coverage > 60.0 {
            Confidence::High
        } else if alignment > 40.0 || coverage < 30.0 {
            Confidence::Low
        } else {
            Confidence::Medium
        }
    }
}

/// One value per scored signal, all on a 0–100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub semantic: f64,
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
}

impl ComponentScores {
    pub fn weighted(&self, weights: &ComponentWeights) -> ComponentScores {
        ComponentScores {
            semantic: self.semantic * weights.semantic,
            skills: self.skills * weights.skills,
            experience: self.experience * weights.experience,
            education: self.education * weights.education,
        }
    }

    pub fn total(&self) -> f64 {
        self.semantic + self.skills + self.experience + self.education
    }
}

/// Full, explainable result of scoring one candidate. Built once by the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub role_id: String,
    /// Unweighted component scores.
    pub raw: ComponentScores,
    /// Component scores after role weights were applied.
    pub contributions: ComponentScores,
    pub weights: ComponentWeights,
    pub final_score: f64,
    pub classification: Classification,
    pub confidence: Confidence,
    pub matched_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
    /// Candidate skill → role multiplier. Explanation only.
    pub weighted_skills: BTreeMap<String, f64>,
    pub experience_years: u32,
    pub required_years: u32,
    pub education: EducationLevel,
}
