//! Okapi BM25 index over a fixed set of tokenized documents.
//!
//! Building an index ([`IndexBuilder::build`]) and scoring a query token
//! against it ([`RetrievalIndex::scores`]) are separate steps, so callers can
//! cache prepared document sets and only rebuild what a query invalidates.
//!
//! # Scoring
//!
//! ```text
//! idf(t)      = ln(1 + (N - n(t) + 0.5) / (n(t) + 0.5))
//! score(t, D) = idf(t) · tf · (k1 + 1) / (tf + k1 · (1 - b + b · |D| / avgdl))
//! ```
//!
//! The IDF is the non-negative Lucene form: a token present in a document
//! always scores above zero, even when it occurs in every document of a
//! small set. Tokens that are not in the index score `0.0`.

use std::collections::HashMap;

/// BM25 free parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    /// Term frequency saturation.
    pub k1: f64,
    /// Document length normalization.
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75 }
    }
}

/// A built index that can score one query token per document.
pub trait RetrievalIndex {
    /// Number of indexed documents.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Relevance of `token` for each indexed document, in index order.
    fn scores(&self, token: &str) -> Vec<f64>;

    /// Relevance of `token` for the document set as a whole: the best
    /// per-document score, or `0.0` for an empty index.
    fn group_score(&self, token: &str) -> f64 {
        self.scores(token).into_iter().fold(0.0, f64::max)
    }
}

/// Builds a [`RetrievalIndex`] over a fixed tokenized document set.
pub trait IndexBuilder {
    type Index: RetrievalIndex;

    fn build(&self, documents: &[Vec<String>]) -> Self::Index;
}

/// In-memory BM25 index.
#[derive(Debug, Clone)]
pub struct Bm25Index {
    params: Bm25Params,
    doc_freq: HashMap<String, usize>,
    term_freqs: Vec<HashMap<String, usize>>,
    doc_lens: Vec<usize>,
    avg_doc_len: f64,
}

impl Bm25Index {
    pub fn new(params: Bm25Params, documents: &[Vec<String>]) -> Self {
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut term_freqs = Vec::with_capacity(documents.len());
        let mut doc_lens = Vec::with_capacity(documents.len());

        for tokens in documents {
            let mut tf: HashMap<String, usize> = HashMap::new();
            for token in tokens {
                *tf.entry(token.clone()).or_insert(0) += 1;
            }
            for token in tf.keys() {
                *doc_freq.entry(token.clone()).or_insert(0) += 1;
            }
            doc_lens.push(tokens.len());
            term_freqs.push(tf);
        }

        let total_len: usize = doc_lens.iter().sum();
        let avg_doc_len = if documents.is_empty() {
            0.0
        } else {
            total_len as f64 / documents.len() as f64
        };

        Self {
            params,
            doc_freq,
            term_freqs,
            doc_lens,
            avg_doc_len,
        }
    }

    /// Inverse document frequency of `token`; `0.0` when unseen.
    pub fn idf(&self, token: &str) -> f64 {
        let n = match self.doc_freq.get(token) {
            Some(&n) => n as f64,
            None => return 0.0,
        };
        let total = self.term_freqs.len() as f64;
        ((total - n + 0.5) / (n + 0.5)).ln_1p()
    }
}

impl RetrievalIndex for Bm25Index {
    fn len(&self) -> usize {
        self.term_freqs.len()
    }

    fn scores(&self, token: &str) -> Vec<f64> {
        let idf = self.idf(token);
        let Bm25Params { k1, b } = self.params;

        self.term_freqs
            .iter()
            .zip(&self.doc_lens)
            .map(|(tf, &len)| {
                let tf = tf.get(token).copied().unwrap_or(0) as f64;
                if tf == 0.0 {
                    return 0.0;
                }
                let norm = 1.0 - b + b * len as f64 / self.avg_doc_len;
                idf * tf * (k1 + 1.0) / (tf + k1 * norm)
            })
            .collect()
    }
}

impl IndexBuilder for Bm25Params {
    type Index = Bm25Index;

    fn build(&self, documents: &[Vec<String>]) -> Bm25Index {
        Bm25Index::new(*self, documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<Vec<String>> {
        texts
            .iter()
            .map(|t| t.split_whitespace().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_empty_index_scores_zero() {
        let index = Bm25Params::default().build(&[]);
        assert!(index.is_empty());
        assert!(index.scores("parking").is_empty());
        assert_eq!(index.group_score("parking"), 0.0);
    }

    #[test]
    fn test_unknown_token_scores_zero() {
        let index = Bm25Params::default().build(&docs(&["air quality sensor"]));
        assert_eq!(index.scores("parking"), vec![0.0]);
    }

    #[test]
    fn test_present_token_positive_in_single_doc() {
        let index = Bm25Params::default().build(&docs(&["smart parking sensor data"]));
        assert!(index.group_score("parking") > 0.0);
    }

    #[test]
    fn test_token_in_every_document_still_positive() {
        let index = Bm25Params::default().build(&docs(&["sensor a", "sensor b", "sensor c"]));
        assert!(index.idf("sensor") > 0.0);
        assert!(index.scores("sensor").iter().all(|s| *s > 0.0));
    }

    #[test]
    fn test_rarer_token_has_higher_idf() {
        let index =
            Bm25Params::default().build(&docs(&["parking sensor", "air sensor", "noise sensor"]));
        assert!(index.idf("parking") > index.idf("sensor"));
    }

    #[test]
    fn test_term_frequency_saturates() {
        let index = Bm25Params::default().build(&docs(&[
            "parking lot one two",
            "parking parking parking parking",
        ]));
        let scores = index.scores("parking");
        assert!(scores[1] > scores[0]);
        // (k1 + 1) bounds the tf component
        assert!(scores[1] < index.idf("parking") * 2.5);
    }

    #[test]
    fn test_group_score_is_best_document() {
        let index =
            Bm25Params::default().build(&docs(&["weather station", "bike parking", "bus stop"]));
        let scores = index.scores("parking");
        assert_eq!(scores[0], 0.0);
        assert_eq!(index.group_score("parking"), scores[1]);
    }
}
