//! Text preparation — file reading, demographic field stripping, normalisation.

use std::path::Path;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::errors::MatchError;

/// Demographic `field: value` pairs removed before any signal is extracted.
/// Values stop at the end of the line.
static BIAS_FIELDS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bname[ \t]*:[ \t]*\w+",
        r"(?i)\bgender[ \t]*:[ \t]*\w+",
        r"(?i)\bage[ \t]*:[ \t]*\d+",
        r"(?i)\bcollege[ \t]*:[ \t]*[\w \t]+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid bias regex"))
    .collect()
});

/// Strips `name:`, `gender:`, `age:` and `college:` fields (case-insensitive).
pub fn remove_bias(text: &str) -> String {
    let mut out = text.to_string();
    for pattern in BIAS_FIELDS.iter() {
        out = pattern.replace_all(&out, "").into_owned();
    }
    out
}

/// Lower-cases, replaces every character outside alphanumerics and `+ # . / -`
/// with a space, and collapses runs of whitespace. Idempotent.
pub fn clean_text(text: &str) -> String {
    let lowered: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '+' | '#' | '.' | '/' | '-') {
                c
            } else {
                ' '
            }
        })
        .collect();
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Produces the plain text of a resume file.
///
/// Binary document formats are handled upstream; implementations only need
/// to return UTF-8 text or an `Extraction` error naming the file.
#[async_trait]
pub trait TextSource: Send + Sync {
    async fn extract_text(&self, path: &Path) -> Result<String, MatchError>;
}

/// Reads UTF-8 text files from disk.
#[derive(Debug, Clone, Default)]
pub struct PlainTextSource;

#[async_trait]
impl TextSource for PlainTextSource {
    async fn extract_text(&self, path: &Path) -> Result<String, MatchError> {
        let candidate = candidate_label(path);
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| MatchError::extraction(&candidate, format!("cannot read file: {e}")))?;
        String::from_utf8(bytes)
            .map_err(|_| MatchError::extraction(&candidate, "file is not valid UTF-8"))
    }
}

/// Display name of a candidate file: its file name, or the full path if it has none.
pub fn candidate_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_normalises() {
        assert_eq!(
            clean_text("  Senior C++ / Node.js   Engineer!!\n\tCI/CD, C#  "),
            "senior c++ / node.js engineer ci/cd c#"
        );
    }

    #[test]
    fn test_clean_text_is_idempotent() {
        let raw = "Data Scientist (5+ years) - Python, SQL & AWS; M.Sc.";
        let once = clean_text(raw);
        assert_eq!(clean_text(&once), once);
    }

    #[test]
    fn test_clean_text_empty() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text(" \n\t "), "");
    }

    #[test]
    fn test_remove_bias_strips_demographic_fields() {
        let raw = "Name: Priya\nGender: female\nAge: 29\nCollege: State Tech University\nSkills: python, sql";
        let stripped = remove_bias(raw);
        assert!(!stripped.contains("Priya"));
        assert!(!stripped.contains("female"));
        assert!(!stripped.contains("29"));
        assert!(!stripped.contains("State Tech"));
        assert!(stripped.contains("Skills: python, sql"));
    }

    #[test]
    fn test_remove_bias_keeps_unrelated_text() {
        let raw = "Managed a team of 5 engineers for 3 years";
        assert_eq!(remove_bias(raw), raw);
    }

    #[test]
    fn test_remove_bias_requires_field_syntax() {
        // "usage: 10" must not be treated as an age field
        assert_eq!(remove_bias("cpu usage: 10"), "cpu usage: 10");
    }

    #[tokio::test]
    async fn test_plain_text_source_reads_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alice.txt");
        std::fs::write(&path, "Python developer").unwrap();

        let text = PlainTextSource.extract_text(&path).await.unwrap();
        assert_eq!(text, "Python developer");
    }

    #[tokio::test]
    async fn test_plain_text_source_rejects_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.pdf");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x9f]).unwrap();

        let err = PlainTextSource.extract_text(&path).await.unwrap_err();
        assert_eq!(err.code(), "EXTRACTION_FAILED");
        assert!(err.to_string().contains("scan.pdf"));
    }

    #[tokio::test]
    async fn test_plain_text_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PlainTextSource
            .extract_text(&dir.path().join("nobody.txt"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "EXTRACTION_FAILED");
    }

    #[test]
    fn test_candidate_label_uses_file_name() {
        assert_eq!(candidate_label(Path::new("/tmp/batch/bob.txt")), "bob.txt");
    }
}
