//! Distinctiveness: how much more a term belongs to its class than to any
//! sibling class.
//!
//! # Algorithm
//!
//! 1. Lowercase the term. A multi-word term is merged into a single token
//!    (`smart parking` → `smart_parking`) wherever it literally occurs in a
//!    document, so BM25 treats the phrase atomically.
//! 2. Build a BM25 index over the class's own documents and score the merged
//!    token → `class_score`.
//! 3. Repeat independently for every sibling group; each group gets its own
//!    index because IDF depends on the document set it is built over.
//! 4. Softmax over `[class_score, sibling_scores…]` (max-subtracted) and
//!    return the weight of `class_score`.
//!
//! Empty groups score `0.0`. With no siblings at all the class is trivially
//! distinctive and the result is `1.0`.
//!
//! Documents are split on whitespace only, punctuation included. A phrase
//! that ends a sentence (`city centre.`) merges to `city_centre.` and does
//! not match the query token, so that occurrence adds nothing to the group's
//! score while [`popularity`](crate::popularity) still counts it.

use crate::bm25::{Bm25Params, IndexBuilder, RetrievalIndex};

/// Lowercased document texts of one group, prepared once per class.
///
/// Only the term-dependent phrase merge and tokenization are redone per
/// term, which gives the same tokens as starting from the raw text.
#[derive(Debug, Clone, Default)]
pub struct GroupCorpus {
    texts: Vec<String>,
}

impl GroupCorpus {
    pub fn new<S: AsRef<str>>(documents: &[S]) -> Self {
        Self {
            texts: documents.iter().map(|d| d.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Tokenize every document with `term` merged into a single token.
    pub fn tokenize_for(&self, term: &str) -> Vec<Vec<String>> {
        let phrase = normalize_term(term);
        let merged = merge_token(&phrase);
        self.texts
            .iter()
            .map(|text| prepare_document(text, &phrase, &merged))
            .collect()
    }
}

/// Lowercase and collapse internal whitespace.
pub fn normalize_term(term: &str) -> String {
    term.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Single-token form of a (possibly multi-word) term.
pub fn merge_token(term: &str) -> String {
    term.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Split a lowercased document into tokens, keeping `phrase` whole.
fn prepare_document(text: &str, phrase: &str, merged: &str) -> Vec<String> {
    let text = if phrase != merged && text.contains(phrase) {
        text.replace(phrase, merged)
    } else {
        text.to_string()
    };
    text.split_whitespace().map(str::to_string).collect()
}

/// Numerically stable softmax. Empty input yields an empty vector.
pub fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return vec![0.0; scores.len()];
    }
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Scores terms against a class and its sibling groups.
#[derive(Debug, Clone, Default)]
pub struct DistinctivenessScorer<B = Bm25Params> {
    builder: B,
}

impl<B: IndexBuilder> DistinctivenessScorer<B> {
    pub fn new(builder: B) -> Self {
        Self { builder }
    }

    fn group_score(&self, token: &str, term: &str, group: &GroupCorpus) -> f64 {
        if group.is_empty() {
            return 0.0;
        }
        self.builder.build(&group.tokenize_for(term)).group_score(token)
    }

    /// Raw relevance per group: the class first, then each sibling in order.
    pub fn group_scores<'a, I>(&self, term: &str, class: &GroupCorpus, siblings: I) -> Vec<f64>
    where
        I: IntoIterator<Item = &'a GroupCorpus>,
    {
        let token = merge_token(&normalize_term(term));
        let mut scores = vec![self.group_score(&token, term, class)];
        scores.extend(
            siblings
                .into_iter()
                .map(|group| self.group_score(&token, term, group)),
        );
        scores
    }

    /// Softmax weight of the class's relevance among all groups, in `[0, 1]`.
    pub fn score<'a, I>(&self, term: &str, class: &GroupCorpus, siblings: I) -> f64
    where
        I: IntoIterator<Item = &'a GroupCorpus>,
    {
        softmax(&self.group_scores(term, class, siblings))[0]
    }
}

/// Convenience form over raw document texts with default BM25 parameters.
pub fn distinctiveness<S, I, G>(term: &str, class_docs: &[S], sibling_docs: I) -> f64
where
    S: AsRef<str>,
    I: IntoIterator<Item = G>,
    G: AsRef<[S]>,
{
    let class = GroupCorpus::new(class_docs);
    let siblings: Vec<GroupCorpus> = sibling_docs
        .into_iter()
        .map(|docs| GroupCorpus::new(docs.as_ref()))
        .collect();
    DistinctivenessScorer::new(Bm25Params::default()).score(term, &class, &siblings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_token() {
        assert_eq!(merge_token(&normalize_term("Smart  Parking")), "smart_parking");
        assert_eq!(merge_token("sensor"), "sensor");
    }

    #[test]
    fn test_phrase_kept_whole() {
        let group = GroupCorpus::new(&["Smart Parking sensor in the smart city"]);
        let tokens = group.tokenize_for("smart parking");
        assert_eq!(
            tokens[0],
            vec!["smart_parking", "sensor", "in", "the", "smart", "city"]
        );
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[3.2, 0.0, 1.5, 1000.0]);
        let total: f64 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_softmax_equal_scores() {
        let probs = softmax(&[0.0, 0.0]);
        assert_eq!(probs, vec![0.5, 0.5]);
    }

    #[test]
    fn test_parking_is_distinctive() {
        let d = distinctiveness(
            "parking",
            &["smart parking sensor data"],
            [vec!["air quality sensor data"]],
        );
        assert!(d > 0.5, "got {d}");
    }

    #[test]
    fn test_reverse_case_is_not_distinctive() {
        let d = distinctiveness(
            "quality",
            &["smart parking sensor data"],
            [vec!["air quality sensor data"]],
        );
        assert!(d < 0.5, "got {d}");
    }

    #[test]
    fn test_class_dominates_every_sibling() {
        let class = GroupCorpus::new(&["parking parking garage", "parking meter", "bike parking lot"]);
        let siblings = [
            GroupCorpus::new(&["air quality", "noise level"]),
            GroupCorpus::new(&["bus stop", "tram line"]),
        ];
        let scorer = DistinctivenessScorer::new(Bm25Params::default());
        let probs = softmax(&scorer.group_scores("parking", &class, &siblings));
        assert!(probs[0] > probs[1] && probs[0] > probs[2], "got {probs:?}");
        assert_eq!(scorer.score("parking", &class, &siblings), probs[0]);
    }

    #[test]
    fn test_shared_term_is_neutral() {
        let d = distinctiveness("sensor", &["parking sensor"], [vec!["air sensor"]]);
        assert!((d - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_sibling_group_does_not_fail() {
        let d = distinctiveness("parking", &["parking lot"], [Vec::<&str>::new()]);
        assert!(d > 0.5 && d <= 1.0);
    }

    #[test]
    fn test_no_siblings_is_fully_distinctive() {
        let d = distinctiveness("parking", &["parking lot"], Vec::<Vec<&str>>::new());
        assert_eq!(d, 1.0);
    }

    #[test]
    fn test_empty_class_group() {
        let d = distinctiveness("parking", &[] as &[&str], [vec!["parking lot"]]);
        assert!(d < 0.5);
    }

    #[test]
    fn test_trailing_punctuation_blocks_phrase_match() {
        let group = GroupCorpus::new(&["Parking in the city centre."]);
        assert_eq!(group.tokenize_for("city centre")[0][3], "city_centre.");

        let d = distinctiveness("city centre", &["Parking in the city centre."], [vec!["air quality"]]);
        assert!((d - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_multi_word_phrase() {
        let d = distinctiveness(
            "smart parking",
            &["smart parking sensor data", "smart parking bays"],
            [vec!["smart meter", "parking fines"]],
        );
        assert!(d > 0.5, "got {d}");
    }
}
