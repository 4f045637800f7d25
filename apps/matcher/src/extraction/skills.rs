//! Skill extraction — vocabulary scan with synonym normalisation.
//!
//! Two match paths feed one result set:
//! 1. whole-word match for every vocabulary entry and synonym alias;
//! 2. plain substring match for terms longer than `SUBSTRING_MIN_CHARS`
//!    (catches compound terms such as "kubernetes-based").
//!
//! Both paths resolve aliases before insertion, so callers only ever see
//! canonical skill names.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::catalog::SkillCatalog;
use crate::errors::MatchError;

/// Terms must be longer than this to take part in the substring pass.
const SUBSTRING_MIN_CHARS: usize = 4;

#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    /// Canonical entries plus aliases, sorted.
    search_terms: Vec<String>,
    canonical: BTreeSet<String>,
    synonyms: HashMap<String, String>,
    /// Category → skills, in catalog order.
    categories: Vec<(String, BTreeSet<String>)>,
}

impl SkillVocabulary {
    /// Builds the vocabulary index. Rejects tables that would let a
    /// non-canonical name leak into results.
    pub fn from_catalog(catalog: &SkillCatalog) -> Result<Self, MatchError> {
        let mut canonical = BTreeSet::new();
        let mut categories = Vec::with_capacity(catalog.categories.len());

        for category in &catalog.categories {
            let mut skills = BTreeSet::new();
            for skill in &category.skills {
                check_term(skill, &category.category)?;
                skills.insert(skill.clone());
                canonical.insert(skill.clone());
            }
            categories.push((category.category.clone(), skills));
        }

        if canonical.is_empty() {
            return Err(MatchError::Configuration(
                "skill catalog contains no skills".to_string(),
            ));
        }

        let mut synonyms = HashMap::with_capacity(catalog.synonyms.len());
        for synonym in &catalog.synonyms {
            check_term(&synonym.alias, "synonyms")?;
            if !canonical.contains(&synonym.canonical) {
                return Err(MatchError::Configuration(format!(
                    "synonym '{}' points at unknown skill '{}'",
                    synonym.alias, synonym.canonical
                )));
            }
            if canonical.contains(&synonym.alias) {
                return Err(MatchError::Configuration(format!(
                    "synonym alias '{}' is itself a canonical skill",
                    synonym.alias
                )));
            }
            synonyms.insert(synonym.alias.clone(), synonym.canonical.clone());
        }

        let mut search_terms: Vec<String> = canonical
            .iter()
            .cloned()
            .chain(synonyms.keys().cloned())
            .collect();
        search_terms.sort();

        Ok(SkillVocabulary {
            search_terms,
            canonical,
            synonyms,
            categories,
        })
    }

    /// Lower-cases and resolves aliases. Unknown skills pass through lower-cased.
    pub fn normalize(&self, skill: &str) -> String {
        let lowered = skill.trim().to_lowercase();
        match self.synonyms.get(&lowered) {
            Some(canonical) => canonical.clone(),
            None => lowered,
        }
    }

    pub fn is_canonical(&self, skill: &str) -> bool {
        self.canonical.contains(skill)
    }

    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }

    /// Extracts the canonical skills mentioned in `text`. Empty text yields an empty set.
    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        if text.trim().is_empty() {
            return found;
        }

        let text = text.to_lowercase();
        for term in &self.search_terms {
            let hit = contains_word(&text, term)
                || (term.chars().count() > SUBSTRING_MIN_CHARS && text.contains(term.as_str()));
            if hit {
                found.insert(self.normalize(term));
            }
        }
        found
    }

    /// Groups skills by catalog category. Skills listed under several categories
    /// appear under each; unknown skills are dropped.
    pub fn categorize<'a, I>(&self, skills: I) -> BTreeMap<String, Vec<String>>
    where
        I: IntoIterator<Item = &'a String> + Clone,
    {
        let mut grouped = BTreeMap::new();
        for (category, members) in &self.categories {
            let matched: Vec<String> = skills
                .clone()
                .into_iter()
                .filter(|s| members.contains(*s))
                .cloned()
                .collect();
            if !matched.is_empty() {
                grouped.insert(category.clone(), matched);
            }
        }
        grouped
    }
}

fn check_term(term: &str, context: &str) -> Result<(), MatchError> {
    if term.trim().is_empty() || term.trim() != term || term.to_lowercase() != term {
        return Err(MatchError::Configuration(format!(
            "skill '{term}' in {context} must be trimmed, lower-case and non-empty"
        )));
    }
    Ok(())
}

/// True when `needle` occurs in `haystack` with no word character directly
/// before or after it. Works for terms with punctuation ("c++", "node.js").
pub fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, matched)| {
        let end = start + matched.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalogs, SkillCategory, SkillSynonym};

    fn vocabulary() -> SkillVocabulary {
        SkillVocabulary::from_catalog(&Catalogs::embedded().unwrap().skills).unwrap()
    }

    fn small_catalog(synonyms: Vec<(&str, &str)>) -> SkillCatalog {
        SkillCatalog {
            version: 1,
            categories: vec![SkillCategory {
                category: "programming".to_string(),
                skills: vec!["python".to_string(), "javascript".to_string()],
            }],
            synonyms: synonyms
                .into_iter()
                .map(|(alias, canonical)| SkillSynonym {
                    alias: alias.to_string(),
                    canonical: canonical.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_empty_text_yields_empty_set() {
        let vocab = vocabulary();
        assert!(vocab.extract("").is_empty());
        assert!(vocab.extract("   \n ").is_empty());
    }

    #[test]
    fn test_extracts_whole_words() {
        let vocab = vocabulary();
        let skills = vocab.extract("built services in python and docker on aws");
        assert!(skills.contains("python"));
        assert!(skills.contains("docker"));
        assert!(skills.contains("aws"));
    }

    #[test]
    fn test_synonyms_resolve_to_canonical_names() {
        let vocab = vocabulary();
        let skills = vocab.extract("k8s clusters, js frontends, amazon web services");
        assert!(skills.contains("kubernetes"));
        assert!(skills.contains("javascript"));
        assert!(skills.contains("aws"));
        assert!(!skills.contains("k8s"));
        assert!(!skills.contains("js"));
        assert!(!skills.contains("amazon web services"));
    }

    #[test]
    fn test_output_contains_only_canonical_skills() {
        let vocab = vocabulary();
        let skills = vocab.extract("golang, postgres, reactjs, ml, ts, nodejs and sklearn");
        assert!(!skills.is_empty());
        for skill in &skills {
            assert!(vocab.is_canonical(skill), "{skill} is not canonical");
        }
    }

    #[test]
    fn test_substring_pass_catches_compound_terms() {
        let vocab = vocabulary();
        let skills = vocab.extract("kubernetes-based deployments and terraforming");
        assert!(skills.contains("kubernetes"));
        // "terraform" is longer than four characters so the substring pass matches it
        assert!(skills.contains("terraform"));
    }

    #[test]
    fn test_short_terms_need_word_boundaries() {
        let vocab = vocabulary();
        // "sql" (3 chars) must not match inside "mysqlish" via the substring pass
        let skills = vocab.extract("mysqlish");
        assert!(!skills.contains("sql"));
    }

    #[test]
    fn test_punctuated_terms_match() {
        let vocab = vocabulary();
        let skills = vocab.extract("c++ and node.js, some ci/cd");
        assert!(skills.contains("c++"));
        assert!(skills.contains("node.js"));
        assert!(skills.contains("ci/cd"));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let vocab = vocabulary();
        let text = "senior python developer with sql, aws and kubernetes";
        assert_eq!(vocab.extract(text), vocab.extract(text));
    }

    #[test]
    fn test_extraction_is_case_insensitive() {
        let vocab = vocabulary();
        assert_eq!(vocab.extract("Python AWS"), vocab.extract("python aws"));
    }

    #[test]
    fn test_normalize_passes_unknown_through() {
        let vocab = vocabulary();
        assert_eq!(vocab.normalize(" K8S "), "kubernetes");
        assert_eq!(vocab.normalize("Cobol-85"), "cobol-85");
    }

    #[test]
    fn test_categorize_groups_by_category() {
        let vocab = vocabulary();
        let skills: BTreeSet<String> = ["python", "docker", "figma", "made-up"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let grouped = vocab.categorize(&skills);
        assert_eq!(grouped["programming"], vec!["python".to_string()]);
        assert_eq!(grouped["devops"], vec!["docker".to_string()]);
        assert_eq!(grouped["design"], vec!["figma".to_string()]);
        assert!(grouped.values().all(|v| !v.contains(&"made-up".to_string())));
    }

    #[test]
    fn test_synonym_to_unknown_skill_rejected() {
        let err = SkillVocabulary::from_catalog(&small_catalog(vec![("rs", "rust")])).unwrap_err();
        assert_eq!(err.code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_alias_shadowing_canonical_rejected() {
        let err =
            SkillVocabulary::from_catalog(&small_catalog(vec![("python", "javascript")])).unwrap_err();
        assert_eq!(err.code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_upper_case_entry_rejected() {
        let mut catalog = small_catalog(vec![]);
        catalog.categories[0].skills.push("Rust".to_string());
        assert!(SkillVocabulary::from_catalog(&catalog).is_err());
    }

    #[test]
    fn test_contains_word_boundaries() {
        assert!(contains_word("i write go daily", "go"));
        assert!(!contains_word("i write google daily", "go"));
        assert!(contains_word("(rust)", "rust"));
        assert!(!contains_word("anything", ""));
    }
}
