//! Recommendation generators — skill gaps, learning paths, alternate roles and
//! interview questions for one scored candidate.

pub mod interview;
pub mod learning;
pub mod roles;
pub mod skill_gap;

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::roles::RoleRegistry;
use interview::{interview_questions, InterviewQuestion};
use learning::{LearningPath, LearningPlanner, DEFAULT_LIMIT};
use roles::{recommend_roles, RoleSuggestion};
use skill_gap::skill_gap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub skill_gap: BTreeMap<String, String>,
    pub learning_paths: Vec<LearningPath>,
    pub recommended_roles: RoleSuggestion,
    pub interview_questions: Vec<InterviewQuestion>,
}

#[derive(Debug, Clone)]
pub struct Recommender {
    registry: Arc<RoleRegistry>,
    planner: Arc<LearningPlanner>,
}

impl Recommender {
    pub fn new(registry: Arc<RoleRegistry>, planner: Arc<LearningPlanner>) -> Self {
        Self { registry, planner }
    }

    /// Missing skills are taken in alphabetical order for both learning paths
    /// and gap questions.
    pub fn recommend(
        &self,
        jd_skills: &BTreeSet<String>,
        candidate_skills: &BTreeSet<String>,
    ) -> Recommendations {
        let gap = skill_gap(jd_skills, candidate_skills);
        let matched: Vec<&String> = jd_skills.intersection(candidate_skills).collect();

        Recommendations {
            learning_paths: self.planner.learning_paths(gap.keys(), DEFAULT_LIMIT),
            recommended_roles: recommend_roles(&self.registry, candidate_skills),
            interview_questions: interview_questions(gap.keys(), matched.into_iter()),
            skill_gap: gap,
        }
    }
}
