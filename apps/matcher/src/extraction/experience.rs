//! Years-of-experience extraction and adequacy scoring.

use std::sync::LazyLock;

use regex::Regex;

/// Requirement assumed when a job description states no years at all.
pub const DEFAULT_REQUIRED_YEARS: u32 = 3;

// "5 years", "1 year", "7+ years", "10years"
static YEARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*\+?\s*years?").expect("valid years regex"));

/// Returns the largest "<n> year(s)" claim in `text`, or 0 when there is none.
pub fn extract_experience(text: &str) -> u32 {
    YEARS_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .max()
        .unwrap_or(0)
}

/// Required years for a job description, defaulting to `DEFAULT_REQUIRED_YEARS`.
pub fn required_experience(jd_text: &str) -> u32 {
    match extract_experience(jd_text) {
        0 => DEFAULT_REQUIRED_YEARS,
        years => years,
    }
}

/// Experience adequacy on a 0–100 scale.
///
/// Meeting or exceeding the requirement scores 100; below it scales linearly.
pub fn experience_score(candidate_years: u32, required_years: u32) -> f64 {
    if required_years == 0 || candidate_years >= required_years {
        return 100.0;
    }
    candidate_years as f64 / required_years as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_claim_is_zero() {
        assert_eq!(extract_experience("recent graduate, eager to learn"), 0);
        assert_eq!(extract_experience(""), 0);
    }

    #[test]
    fn test_takes_maximum_claim() {
        let text = "2 years at acme, 6 years at initech, 1 year freelance";
        assert_eq!(extract_experience(text), 6);
    }

    #[test]
    fn test_singular_and_plus_forms() {
        assert_eq!(extract_experience("1 year of rust"), 1);
        assert_eq!(extract_experience("7+ years building apis"), 7);
    }

    #[test]
    fn test_overflowing_number_ignored() {
        assert_eq!(extract_experience("99999999999 years and 4 years"), 4);
    }

    #[test]
    fn test_required_experience_defaults_to_three() {
        assert_eq!(required_experience("python developer"), DEFAULT_REQUIRED_YEARS);
        assert_eq!(required_experience("at least 5 years of python"), 5);
    }

    #[test]
    fn test_experience_score_meets_requirement() {
        assert_eq!(experience_score(5, 3), 100.0);
        assert_eq!(experience_score(3, 3), 100.0);
        assert_eq!(experience_score(0, 0), 100.0);
    }

    #[test]
    fn test_experience_score_scales_below_requirement() {
        assert!((experience_score(1, 4) - 25.0).abs() < 1e-9);
        assert_eq!(experience_score(0, 5), 0.0);
    }
}
