use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::extraction::experience::experience_score;
use crate::extraction::{CandidateSignal, JobSignal};
use crate::roles::RoleRegistry;
use crate::scoring::{Classification, ComponentScores, Confidence, ScoreBreakdown};

/// Share of JD skills the candidate has, 0–100. A JD with no skills gives 0.
pub fn skill_overlap(candidate: &BTreeSet<String>, jd: &BTreeSet<String>) -> f64 {
    if jd.is_empty() {
        return 0.0;
    }
    let matched = jd.intersection(candidate).count();
    matched as f64 / jd.len() as f64 * 100.0
}

/// Combines candidate and job signals into a `ScoreBreakdown` under a role's weights.
#[derive(Debug, Clone)]
pub struct ScoreAggregator {
    registry: Arc<RoleRegistry>,
}

impl ScoreAggregator {
    pub fn new(registry: Arc<RoleRegistry>) -> Self {
        Self { registry }
    }

    pub fn compute(
        &self,
        candidate: &CandidateSignal,
        job: &JobSignal,
        role_id: &str,
    ) -> ScoreBreakdown {
        let weights = self.registry.component_weights(role_id);
        let multipliers = self.registry.skill_multipliers(role_id);

        let matched_skills: BTreeSet<String> =
            job.skills.intersection(&candidate.skills).cloned().collect();
        let missing_skills: BTreeSet<String> =
            job.skills.difference(&candidate.skills).cloned().collect();

        let raw = ComponentScores {
            semantic: candidate.semantic_score,
            skills: skill_overlap(&candidate.skills, &job.skills),
            experience: experience_score(candidate.experience_years, job.required_years),
            education: candidate.education.score() as f64,
        };
        let contributions = raw.weighted(&weights);
        let final_score = contributions.total().min(100.0);

        let alignment = (raw.semantic - raw.skills).abs();
        let coverage = matched_skills.len() as f64 / job.skills.len().max(1) as f64 * 100.0;

        let weighted_skills = candidate
            .skills
            .iter()
            .map(|s| (s.clone(), multipliers.get(s).copied().unwrap_or(1.0)))
            .collect::<BTreeMap<_, _>>();

        ScoreBreakdown {
            role_id: role_id.to_string(),
            raw,
            contributions,
            weights,
            final_score,
            classification: Classification::from_score(final_score),
            confidence: Confidence::assess(alignment, coverage),
            matched_skills,
            missing_skills,
            weighted_skills,
            experience_years: candidate.experience_years,
            required_years: job.required_years,
            education: candidate.education,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalogs;
    use crate::extraction::education::EducationLevel;
    use crate::extraction::skills::SkillVocabulary;
    use crate::roles::WEIGHT_TOLERANCE;

    fn set(skills: &[&str]) -> BTreeSet<String> {
        skills.iter().map(|s| s.to_string()).collect()
    }

    fn aggregator() -> ScoreAggregator {
        let catalogs = Catalogs::embedded().unwrap();
        let vocabulary = SkillVocabulary::from_catalog(&catalogs.skills).unwrap();
        let registry = RoleRegistry::from_catalog(&catalogs.roles, &vocabulary).unwrap();
        ScoreAggregator::new(Arc::new(registry))
    }

    fn job(skills: &[&str], required_years: u32) -> JobSignal {
        JobSignal {
            skills: set(skills),
            required_years,
            cleaned_text: String::new(),
        }
    }

    fn candidate(skills: &[&str], years: u32, education: EducationLevel, semantic: f64) -> CandidateSignal {
        CandidateSignal {
            skills: set(skills),
            experience_years: years,
            education,
            semantic_score: semantic,
        }
    }

    #[test]
    fn test_overlap_and_missing_skills() {
        let breakdown = aggregator().compute(
            &candidate(&["python", "aws", "docker"], 3, EducationLevel::Bachelor, 60.0),
            &job(&["python", "sql", "aws"], 3),
            "Default",
        );
        assert!((breakdown.raw.skills - 66.67).abs() < 0.01);
        assert_eq!(breakdown.missing_skills, set(&["sql"]));
        assert_eq!(breakdown.matched_skills, set(&["aws", "python"]));
    }

    #[test]
    fn test_empty_jd_gives_zero_overlap() {
        assert_eq!(skill_overlap(&set(&["python"]), &BTreeSet::new()), 0.0);
        let breakdown = aggregator().compute(
            &candidate(&["python"], 5, EducationLevel::Master, 40.0),
            &job(&[], 3),
            "Default",
        );
        assert_eq!(breakdown.raw.skills, 0.0);
        assert!(breakdown.missing_skills.is_empty());
    }

    #[test]
    fn test_final_score_is_weighted_sum() {
        // Default weights 0.35 / 0.35 / 0.20 / 0.10
        let breakdown = aggregator().compute(
            &candidate(&["python", "sql"], 2, EducationLevel::Bachelor, 80.0),
            &job(&["python", "sql", "aws", "docker"], 4),
            "Default",
        );
        // 80*0.35 + 50*0.35 + 50*0.20 + 60*0.10
        assert!((breakdown.final_score - 61.5).abs() < 1e-9);
        assert_eq!(breakdown.classification, Classification::PotentialFit);
    }

    #[test]
    fn test_final_score_is_bounded() {
        let breakdown = aggregator().compute(
            &candidate(&["python"], 20, EducationLevel::Doctorate, 100.0),
            &job(&["python"], 1),
            "Data Scientist",
        );
        assert!(breakdown.final_score <= 100.0);
        assert_eq!(breakdown.classification, Classification::StrongFit);
        assert_eq!(breakdown.confidence, Confidence::High);
    }

    #[test]
    fn test_contributions_use_role_weights() {
        let agg = aggregator();
        let signal = candidate(&["react"], 3, EducationLevel::Bachelor, 70.0);
        let job = job(&["react", "css"], 3);

        let frontend = agg.compute(&signal, &job, "Frontend Developer");
        assert!((frontend.weights.skills - 0.45).abs() < WEIGHT_TOLERANCE);
        assert!((frontend.contributions.skills - 50.0 * 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_skills_explain_multipliers() {
        let breakdown = aggregator().compute(
            &candidate(&["python", "excel", "figma"], 3, EducationLevel::None, 30.0),
            &job(&["python"], 3),
            "Data Scientist",
        );
        assert_eq!(breakdown.weighted_skills["python"], 1.5);
        assert_eq!(breakdown.weighted_skills["excel"], 0.8);
        assert_eq!(breakdown.weighted_skills["figma"], 1.0);
    }

    #[test]
    fn test_unknown_role_scores_with_default_weights() {
        let agg = aggregator();
        let signal = candidate(&["python"], 3, EducationLevel::Bachelor, 50.0);
        let job = job(&["python"], 3);
        let unknown = agg.compute(&signal, &job, "Astronaut");
        let default = agg.compute(&signal, &job, "Default");
        assert_eq!(unknown.final_score, default.final_score);
        assert_eq!(unknown.role_id, "Astronaut");
    }
}
