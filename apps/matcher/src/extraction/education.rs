//! Education level detection — strict-priority regex cascade.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    #[default]
    None,
    Diploma,
    Bachelor,
    Master,
    Doctorate,
}

impl EducationLevel {
    /// Ordinal score used by the aggregator.
    pub fn score(self) -> u32 {
        match self {
            EducationLevel::Doctorate => 100,
            EducationLevel::Master => 80,
            EducationLevel::Bachelor => 60,
            EducationLevel::Diploma => 40,
            EducationLevel::None => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EducationLevel::Doctorate => "Doctorate/PhD",
            EducationLevel::Master => "Master's Degree",
            EducationLevel::Bachelor => "Bachelor's Degree",
            EducationLevel::Diploma => "Diploma/Associate",
            EducationLevel::None => "No Degree Detected",
        }
    }
}

static CASCADE: LazyLock<Vec<(EducationLevel, Regex)>> = LazyLock::new(|| {
    [
        (
            EducationLevel::Doctorate,
            r"(?i)\b(ph\.?d|doctorate|doctoral|d\.?phil)\b",
        ),
        (
            EducationLevel::Master,
            r"(?i)\b(m\.?s|m\.?a|m\.?b\.?a|masters?|m\.?tech|m\.?eng)\b",
        ),
        (
            EducationLevel::Bachelor,
            r"(?i)\b(b\.?s|b\.?a|b\.?tech|bachelors?|b\.?eng|undergraduate)\b",
        ),
        (
            EducationLevel::Diploma,
            r"(?i)\b(diploma|associate'?s? degree|a\.s|a\.a)\b",
        ),
    ]
    .into_iter()
    .map(|(level, pattern)| (level, Regex::new(pattern).expect("valid education regex")))
    .collect()
});

/// Highest-priority level mentioned in `text`. First match in the order
/// Doctorate → Master → Bachelor → Diploma wins; no credit for multiple degrees.
pub fn detect_education(text: &str) -> EducationLevel {
    CASCADE
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(level, _)| *level)
        .unwrap_or(EducationLevel::None)
}

/// `(score, label)` pair for `text`.
pub fn extract_education(text: &str) -> (u32, &'static str) {
    let level = detect_education(text);
    (level.score(), level.label())
}
