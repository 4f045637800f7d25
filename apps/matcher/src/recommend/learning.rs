//! Learning paths — resource lookup, priority, time estimate and expected impact
//! for each missing skill.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::catalog::{LearningCatalog, LearningResource, ResourceKind};
use crate::errors::MatchError;
use crate::extraction::skills::SkillVocabulary;

/// Default number of missing skills turned into learning paths.
pub const DEFAULT_LIMIT: usize = 5;
/// Positions below this get `Priority::High`.
const HIGH_PRIORITY_POSITIONS: usize = 3;
const GENERIC_ESTIMATE: &str = "20-30 hours";
const SELF_PACED: &str = "Self-paced";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillImpact {
    pub impact: ImpactLevel,
    pub score_increase: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPath {
    pub skill: String,
    pub priority: Priority,
    pub resources: Vec<LearningResource>,
    pub estimated_time: String,
    pub impact: SkillImpact,
}

/// Read-only index over the learning catalog.
#[derive(Debug, Clone)]
pub struct LearningPlanner {
    resources: HashMap<String, Vec<LearningResource>>,
    high_impact: BTreeSet<String>,
    medium_impact: BTreeSet<String>,
}

impl LearningPlanner {
    /// Fails on duplicate entries or skills outside the vocabulary.
    pub fn from_catalog(
        catalog: &LearningCatalog,
        vocabulary: &SkillVocabulary,
    ) -> Result<Self, MatchError> {
        let mut resources = HashMap::with_capacity(catalog.resources.len());
        for record in &catalog.resources {
            let skill = canonical(&record.skill, vocabulary, "learning resource")?;
            if resources.insert(skill, record.resources.clone()).is_some() {
                return Err(MatchError::Configuration(format!(
                    "duplicate learning resources for '{}'",
                    record.skill
                )));
            }
        }

        let tier = |skills: &[String]| -> Result<BTreeSet<String>, MatchError> {
            skills
                .iter()
                .map(|s| canonical(s, vocabulary, "impact tier"))
                .collect()
        };

        Ok(Self {
            resources,
            high_impact: tier(&catalog.impact.high)?,
            medium_impact: tier(&catalog.impact.medium)?,
        })
    }

    /// One path per missing skill, in input order, at most `limit`.
    /// The first three paths are `High` priority.
    pub fn learning_paths<'a, I>(&self, missing: I, limit: usize) -> Vec<LearningPath>
    where
        I: IntoIterator<Item = &'a String>,
    {
        missing
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(position, skill)| {
                let priority = if position < HIGH_PRIORITY_POSITIONS {
                    Priority::High
                } else {
                    Priority::Medium
                };
                let (resources, estimated_time) = match self.resources.get(&skill.to_lowercase()) {
                    Some(resources) => (resources.clone(), estimated_time(resources)),
                    None => (generic_resources(skill), GENERIC_ESTIMATE.to_string()),
                };
                LearningPath {
                    skill: skill.clone(),
                    priority,
                    resources,
                    estimated_time,
                    impact: self.improvement_impact(skill),
                }
            })
            .collect()
    }

    /// Expected score gain from acquiring `skill`.
    pub fn improvement_impact(&self, skill: &str) -> SkillImpact {
        let skill = skill.to_lowercase();
        let (impact, score_increase) = if self.high_impact.contains(&skill) {
            (ImpactLevel::High, "+8-12%")
        } else if self.medium_impact.contains(&skill) {
            (ImpactLevel::Medium, "+5-8%")
        } else {
            (ImpactLevel::Low, "+2-5%")
        };
        SkillImpact {
            impact,
            score_increase: score_increase.to_string(),
        }
    }
}

fn canonical(
    skill: &str,
    vocabulary: &SkillVocabulary,
    table: &str,
) -> Result<String, MatchError> {
    let lowered = skill.trim().to_lowercase();
    if vocabulary.is_canonical(&lowered) {
        Ok(lowered)
    } else {
        Err(MatchError::Configuration(format!(
            "{table} skill '{skill}' is not in the skill vocabulary"
        )))
    }
}

/// Sum of the "N hours" durations, or "Self-paced" when none is stated in hours.
pub fn estimated_time(resources: &[LearningResource]) -> String {
    let hours: u32 = resources
        .iter()
        .filter(|r| r.duration.to_lowercase().contains("hour"))
        .filter_map(|r| r.duration.split_whitespace().next()?.parse::<u32>().ok())
        .sum();
    if hours > 0 {
        format!("{hours} hours")
    } else {
        SELF_PACED.to_string()
    }
}

fn generic_resources(skill: &str) -> Vec<LearningResource> {
    vec![
        LearningResource {
            name: format!("Advanced {skill} Concepts"),
            provider: "LinkedIn Learning".to_string(),
            kind: ResourceKind::Course,
            duration: "3-5 hours".to_string(),
        },
        LearningResource {
            name: format!("{skill} Fundamentals"),
            provider: "Udemy".to_string(),
            kind: ResourceKind::Course,
            duration: "10-15 hours".to_string(),
        },
        LearningResource {
            name: format!("Hands-on {skill} Projects"),
            provider: "GitHub".to_string(),
            kind: ResourceKind::Project,
            duration: SELF_PACED.to_string(),
        },
    ]
}
