use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::info;

use crate::catalog::RoleCatalog;
use crate::errors::MatchError;
use crate::extraction::skills::SkillVocabulary;
use crate::roles::{ComponentWeights, RoleProfile};

static NO_MULTIPLIERS: BTreeMap<String, f64> = BTreeMap::new();

/// Validated, read-only role table. Built once at startup.
///
/// Construction fails on any table that could produce an out-of-contract score:
/// weights that do not sum to 1.0, non-positive multipliers, multiplier or
/// required skills outside the vocabulary, duplicate ids or a missing default role.
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    /// Detection order.
    profiles: Vec<RoleProfile>,
    index: HashMap<String, usize>,
    default_role: String,
    default_weights: ComponentWeights,
    fallback_recommendation: String,
}

impl RoleRegistry {
    pub fn from_catalog(
        catalog: &RoleCatalog,
        vocabulary: &SkillVocabulary,
    ) -> Result<Self, MatchError> {
        let default_weights = catalog
            .roles
            .iter()
            .find(|r| r.role_id == catalog.default_role)
            .ok_or_else(|| {
                config_error(format!("default role '{}' is not defined", catalog.default_role))
            })?
            .component_weights
            .ok_or_else(|| {
                config_error(format!(
                    "default role '{}' must declare component_weights",
                    catalog.default_role
                ))
            })?;

        let mut profiles = Vec::with_capacity(catalog.roles.len());
        let mut index = HashMap::with_capacity(catalog.roles.len());

        for record in &catalog.roles {
            let role = &record.role_id;
            if role.trim().is_empty() {
                return Err(config_error("role_id must not be empty".to_string()));
            }
            if index.insert(role.clone(), profiles.len()).is_some() {
                return Err(config_error(format!("duplicate role '{role}'")));
            }

            let component_weights = record.component_weights.unwrap_or(default_weights);
            component_weights
                .validate()
                .map_err(|e| config_error(format!("role '{role}': {e}")))?;

            for (skill, multiplier) in &record.skill_weights {
                if !multiplier.is_finite() || *multiplier <= 0.0 {
                    return Err(config_error(format!(
                        "role '{role}': multiplier for '{skill}' must be > 0, got {multiplier}"
                    )));
                }
                if !vocabulary.is_canonical(skill) {
                    return Err(config_error(format!(
                        "role '{role}': multiplier skill '{skill}' is not in the skill vocabulary"
                    )));
                }
            }

            let mut required_skills = BTreeSet::new();
            for skill in &record.required_skills {
                if !vocabulary.is_canonical(skill) {
                    return Err(config_error(format!(
                        "role '{role}': required skill '{skill}' is not in the skill vocabulary"
                    )));
                }
                required_skills.insert(skill.clone());
            }

            let keywords: Vec<String> = record
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();
            if keywords.is_empty() && *role != catalog.default_role {
                return Err(config_error(format!("role '{role}' has no detection keywords")));
            }

            profiles.push(RoleProfile {
                role_id: role.clone(),
                keywords,
                skill_weights: record.skill_weights.clone(),
                component_weights,
                required_skills,
            });
        }

        info!(
            "Role registry v{} loaded: {} roles, default '{}'",
            catalog.version,
            profiles.len(),
            catalog.default_role
        );

        Ok(RoleRegistry {
            profiles,
            index,
            default_role: catalog.default_role.clone(),
            default_weights,
            fallback_recommendation: catalog.fallback_recommendation.clone(),
        })
    }

    /// First role (in table order) with a keyword contained in the lower-cased
    /// JD text; the default role when none matches.
    pub fn detect_role(&self, jd_text: &str) -> &str {
        let lowered = jd_text.to_lowercase();
        self.profiles
            .iter()
            .find(|p| p.keywords.iter().any(|k| lowered.contains(k.as_str())))
            .map(|p| p.role_id.as_str())
            .unwrap_or(self.default_role.as_str())
    }

    pub fn profile(&self, role_id: &str) -> Option<&RoleProfile> {
        self.index.get(role_id).map(|&i| &self.profiles[i])
    }

    /// Weights for `role_id`, or the default role's weights for unknown roles.
    pub fn component_weights(&self, role_id: &str) -> ComponentWeights {
        self.profile(role_id)
            .map(|p| p.component_weights)
            .unwrap_or(self.default_weights)
    }

    /// Skill multipliers for `role_id`; empty for unknown roles.
    pub fn skill_multipliers(&self, role_id: &str) -> &BTreeMap<String, f64> {
        self.profile(role_id)
            .map(|p| &p.skill_weights)
            .unwrap_or(&NO_MULTIPLIERS)
    }

    pub fn default_role(&self) -> &str {
        &self.default_role
    }

    pub fn fallback_recommendation(&self) -> &str {
        &self.fallback_recommendation
    }

    /// All profiles in detection order, default role included.
    pub fn profiles(&self) -> &[RoleProfile] {
        &self.profiles
    }
}

fn config_error(message: String) -> MatchError {
    MatchError::Configuration(message)
}
