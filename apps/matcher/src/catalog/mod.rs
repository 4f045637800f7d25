//! Versioned lookup tables — skill vocabulary, role profiles, learning resources.
//!
//! The tables ship embedded in the binary (`catalog/*.json`) and can be overridden
//! per file from a directory at startup. Parsing only checks shape; semantic
//! validation (weights summing to 1.0, synonyms resolving into the vocabulary) is
//! done by the consumers that build indexes from these records, so a bad table
//! fails startup instead of silently skewing scores.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::MatchError;
use crate::roles::ComponentWeights;

const EMBEDDED_SKILLS: &str = include_str!("../../catalog/skills.json");
const EMBEDDED_ROLES: &str = include_str!("../../catalog/roles.json");
const EMBEDDED_LEARNING: &str = include_str!("../../catalog/learning.json");

pub const SKILLS_FILE: &str = "skills.json";
pub const ROLES_FILE: &str = "roles.json";
pub const LEARNING_FILE: &str = "learning.json";

// ────────────────────────────────────────────────────────────────────────────
// Skill vocabulary records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCatalog {
    pub version: u32,
    pub categories: Vec<SkillCategory>,
    #[serde(default)]
    pub synonyms: Vec<SkillSynonym>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCategory {
    pub category: String,
    pub skills: Vec<String>,
}

/// Maps an alternate spelling or abbreviation onto a canonical vocabulary entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillSynonym {
    pub alias: String,
    pub canonical: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Role records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleCatalog {
    pub version: u32,
    /// Role used when detection finds nothing and for missing component weights.
    pub default_role: String,
    /// Single role suggested when no role clears the recommendation threshold.
    pub fallback_recommendation: String,
    /// Detection order is the order of this list.
    pub roles: Vec<RoleRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRecord {
    pub role_id: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Absent means "inherit the default role's weights".
    #[serde(default)]
    pub component_weights: Option<ComponentWeights>,
    #[serde(default)]
    pub skill_weights: BTreeMap<String, f64>,
    #[serde(default)]
    pub required_skills: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Learning resource records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningCatalog {
    pub version: u32,
    pub impact: ImpactTiers,
    pub resources: Vec<LearningRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImpactTiers {
    #[serde(default)]
    pub high: Vec<String>,
    #[serde(default)]
    pub medium: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningRecord {
    pub skill: String,
    pub resources: Vec<LearningResource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Course,
    Certification,
    Project,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningResource {
    pub name: String,
    pub provider: String,
    pub kind: ResourceKind,
    pub duration: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Loading
// ────────────────────────────────────────────────────────────────────────────

/// All three tables, parsed.
#[derive(Debug, Clone)]
pub struct Catalogs {
    pub skills: SkillCatalog,
    pub roles: RoleCatalog,
    pub learning: LearningCatalog,
}

impl Catalogs {
    /// Tables compiled into the binary.
    pub fn embedded() -> Result<Self, MatchError> {
        Ok(Catalogs {
            skills: parse_table(SKILLS_FILE, EMBEDDED_SKILLS)?,
            roles: parse_table(ROLES_FILE, EMBEDDED_ROLES)?,
            learning: parse_table(LEARNING_FILE, EMBEDDED_LEARNING)?,
        })
    }

    /// Tables from `dir`, falling back to the embedded copy for any file not present.
    pub fn from_dir(dir: &Path) -> Result<Self, MatchError> {
        Ok(Catalogs {
            skills: load_table(dir, SKILLS_FILE, EMBEDDED_SKILLS)?,
            roles: load_table(dir, ROLES_FILE, EMBEDDED_ROLES)?,
            learning: load_table(dir, LEARNING_FILE, EMBEDDED_LEARNING)?,
        })
    }
}

fn load_table<T: DeserializeOwned>(dir: &Path, file: &str, embedded: &str) -> Result<T, MatchError> {
    let path = dir.join(file);
    if !path.exists() {
        return parse_table(file, embedded);
    }
    let text = std::fs::read_to_string(&path).map_err(|e| {
        MatchError::Configuration(format!("cannot read {}: {e}", path.display()))
    })?;
    info!("Loaded catalog override {}", path.display());
    parse_table(file, &text)
}

fn parse_table<T: DeserializeOwned>(file: &str, text: &str) -> Result<T, MatchError> {
    serde_json::from_str(text)
        .map_err(|e| MatchError::Configuration(format!("malformed catalog {file}: {e}")))
}
