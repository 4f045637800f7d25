//! Semantic similarity — pluggable scorer behind a trait.
//!
//! Default: `TfIdfScorer`, a lexical TF-IDF cosine over the two documents.
//! Deterministic, symmetric and dependency-free at runtime; an embedding
//! backend can be swapped in through `SemanticScorer` without touching the
//! aggregator.

use std::collections::BTreeMap;

/// Similarity between two cleaned texts on a 0–100 scale.
///
/// Implementations must return the same value for identical input and a low,
/// finite value (not an error) when either side is empty.
pub trait SemanticScorer: Send + Sync {
    fn similarity(&self, text_a: &str, text_b: &str) -> f64;

    /// Backend label, surfaced for transparency.
    fn backend(&self) -> &'static str;
}

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "have", "in", "is",
    "it", "of", "on", "or", "our", "the", "this", "to", "was", "we", "were", "will", "with",
    "you", "your",
];

/// Lexical TF-IDF cosine similarity.
///
/// IDF is smoothed over the two-document corpus (`ln((1 + n) / (1 + df)) + 1`)
/// so terms shared by both texts keep a non-zero weight.
#[derive(Debug, Clone, Default)]
pub struct TfIdfScorer;

impl SemanticScorer for TfIdfScorer {
    fn similarity(&self, text_a: &str, text_b: &str) -> f64 {
        let tf_a = term_frequencies(text_a);
        let tf_b = term_frequencies(text_b);
        if tf_a.is_empty() || tf_b.is_empty() {
            return 0.0;
        }

        let mut vocabulary: BTreeMap<&str, f64> = BTreeMap::new();
        for term in tf_a.keys().chain(tf_b.keys()) {
            let df = tf_a.contains_key(term) as u32 + tf_b.contains_key(term) as u32;
            vocabulary.insert(term, ((1.0 + 2.0) / (1.0 + df as f64)).ln() + 1.0);
        }

        let weights = |tf: &BTreeMap<String, f64>| -> Vec<f64> {
            vocabulary
                .iter()
                .map(|(term, idf)| tf.get(*term).copied().unwrap_or(0.0) * idf)
                .collect()
        };

        let similarity = cosine_similarity(&weights(&tf_a), &weights(&tf_b));
        (similarity * 100.0).clamp(0.0, 100.0)
    }

    fn backend(&self) -> &'static str {
        "tfidf"
    }
}

/// Relative term frequencies of the non-stopword tokens in `text`.
fn term_frequencies(text: &str) -> BTreeMap<String, f64> {
    let mut counts: BTreeMap<String, f64> = BTreeMap::new();
    let mut total = 0.0;
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0.0) += 1.0;
        total += 1.0;
    }
    for count in counts.values_mut() {
        *count /= total;
    }
    counts
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
}

/// Cosine similarity in [0, 1] for non-negative vectors. Zero vectors or a
/// dimension mismatch give 0.0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        tracing::warn!(
            a_len = a.len(),
            b_len = b.len(),
            "vector dimension mismatch; returning zero similarity"
        );
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}
