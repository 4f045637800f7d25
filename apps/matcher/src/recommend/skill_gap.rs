use std::collections::{BTreeMap, BTreeSet};

/// Flat label attached to every missing skill.
pub const DELTA_LABEL: &str = "+5% improvement";

/// JD skills the candidate lacks, alphabetically, each with the delta label.
pub fn skill_gap(
    jd_skills: &BTreeSet<String>,
    candidate_skills: &BTreeSet<String>,
) -> BTreeMap<String, String> {
    jd_skills
        .difference(candidate_skills)
        .map(|skill| (skill.clone(), DELTA_LABEL.to_string()))
        .collect()
}
