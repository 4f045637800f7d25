//! Role profiles — per-role component weights and skill multipliers.

pub mod registry;

pub use registry::RoleRegistry;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Allowed deviation of a weight vector's sum from 1.0.
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// How much each signal contributes to the final score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentWeights {
    pub semantic: f64,
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
}

impl ComponentWeights {
    pub fn sum(&self) -> f64 {
        self.semantic + self.skills + self.experience + self.education
    }

    fn as_array(&self) -> [(&'static str, f64); 4] {
        [
            ("semantic", self.semantic),
            ("skills", self.skills),
            ("experience", self.experience),
            ("education", self.education),
        ]
    }

    /// Each weight finite and non-negative, total within `WEIGHT_TOLERANCE` of 1.0.
    pub fn validate(&self) -> Result<(), String> {
        for (name, weight) in self.as_array() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(format!("{name} weight {weight} must be a finite value >= 0"));
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(format!("weights sum to {sum}, expected 1.0"));
        }
        Ok(())
    }
}

/// A validated role, as held by the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleProfile {
    pub role_id: String,
    /// Lower-cased detection keywords, in catalog order.
    pub keywords: Vec<String>,
    /// Skill → multiplier. Skills not listed count 1.0.
    pub skill_weights: BTreeMap<String, f64>,
    pub component_weights: ComponentWeights,
    /// Skills a candidate is expected to cover for this role.
    pub required_skills: BTreeSet<String>,
}

impl RoleProfile {
    pub fn multiplier(&self, skill: &str) -> f64 {
        self.skill_weights.get(skill).copied().unwrap_or(1.0)
    }
}
