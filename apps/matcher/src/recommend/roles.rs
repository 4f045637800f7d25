use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::roles::RoleRegistry;

/// Roles must cover strictly more than this share of their required skills.
pub const ROLE_MATCH_THRESHOLD: f64 = 30.0;
pub const MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleMatch {
    pub role_id: String,
    pub match_percentage: f64,
}

/// Alternate roles for a candidate. `Fallback` is returned when no role clears
/// the threshold, so an empty suggestion list never reaches callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoleSuggestion {
    Matched { roles: Vec<RoleMatch> },
    Fallback { role_id: String },
}

impl RoleSuggestion {
    pub fn role_ids(&self) -> Vec<&str> {
        match self {
            RoleSuggestion::Matched { roles } => roles.iter().map(|r| r.role_id.as_str()).collect(),
            RoleSuggestion::Fallback { role_id } => vec![role_id.as_str()],
        }
    }
}

/// Top roles by coverage of their required skills. Ties keep table order.
pub fn recommend_roles(registry: &RoleRegistry, candidate_skills: &BTreeSet<String>) -> RoleSuggestion {
    let mut scored: Vec<RoleMatch> = registry
        .profiles()
        .iter()
        .filter(|p| !p.required_skills.is_empty())
        .map(|p| {
            let matched = p.required_skills.intersection(candidate_skills).count();
            RoleMatch {
                role_id: p.role_id.clone(),
                match_percentage: matched as f64 / p.required_skills.len() as f64 * 100.0,
            }
        })
        .collect();

    scored.sort_by(|a, b| b.match_percentage.total_cmp(&a.match_percentage));
    let roles: Vec<RoleMatch> = scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .filter(|r| r.match_percentage > ROLE_MATCH_THRESHOLD)
        .collect();

    if roles.is_empty() {
        RoleSuggestion::Fallback {
            role_id: registry.fallback_recommendation().to_string(),
        }
    } else {
        RoleSuggestion::Matched { roles }
    }
}
