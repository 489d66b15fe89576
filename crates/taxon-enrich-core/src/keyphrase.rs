//! Candidate term extraction using YAKE.
//!
//! All of a class's document content is joined into one text blob and run
//! through YAKE (statistical, unsupervised keyphrase extraction) for phrases
//! of up to three words. Near-duplicate phrases are suppressed twice: once
//! inside YAKE, and again here with the Levenshtein indel ratio, so the
//! returned set never holds two phrases above the configured threshold.

use std::collections::{BTreeSet, HashSet};
use yake_rust::{get_n_best, Config, StopWords};

use crate::models::ClassifiedDocument;

/// Keyphrase extraction settings.
#[derive(Debug, Clone)]
pub struct KeyphraseConfig {
    /// Stopword language code.
    pub language: String,
    /// Longest phrase, in words.
    pub max_ngram: usize,
    /// Phrases more similar than this are treated as duplicates.
    pub dedup_threshold: f64,
    /// Co-occurrence context window, in tokens.
    pub window_size: usize,
    /// Maximum number of phrases returned per call.
    pub top: usize,
    /// Shortest phrase kept, in characters.
    pub min_chars: usize,
}

impl Default for KeyphraseConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            max_ngram: 3,
            dedup_threshold: 0.9,
            window_size: 1,
            top: 5,
            min_chars: 3,
        }
    }
}

/// YAKE-backed keyphrase extractor.
pub struct KeyphraseExtractor {
    config: KeyphraseConfig,
    stopwords: StopWords,
}

impl KeyphraseExtractor {
    pub fn new(config: KeyphraseConfig) -> Self {
        let stopwords = StopWords::predefined(&config.language)
            .or_else(|| StopWords::predefined("en"))
            .unwrap_or_else(|| StopWords::custom(HashSet::new()));
        Self { config, stopwords }
    }

    pub fn config(&self) -> &KeyphraseConfig {
        &self.config
    }

    /// Ranked key phrases for `text`, most salient first.
    pub fn extract_phrases(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() || self.config.top == 0 {
            return Vec::new();
        }

        let yake_config = Config {
            ngrams: self.config.max_ngram,
            window_size: self.config.window_size,
            remove_duplicates: true,
            deduplication_threshold: self.config.dedup_threshold,
            minimum_chars: self.config.min_chars,
            ..Config::default()
        };

        // over-fetch so the second dedup pass can still fill `top`
        let mut ranked = get_n_best(self.config.top * 2, text, &self.stopwords, &yake_config);
        // lower YAKE score is better; break ties on text for stable output
        ranked.sort_by(|a, b| {
            a.score
                .total_cmp(&b.score)
                .then_with(|| a.keyword.cmp(&b.keyword))
        });

        let mut kept: Vec<String> = Vec::with_capacity(self.config.top);
        for item in ranked {
            if kept.len() == self.config.top {
                break;
            }
            let phrase = item.keyword;
            let duplicate = kept
                .iter()
                .any(|k| indel_ratio(k, &phrase) > self.config.dedup_threshold);
            if !duplicate {
                kept.push(phrase);
            }
        }
        kept
    }

    /// Candidate terms for one class, drawn from that class's documents only.
    pub fn extract_candidates<D: ClassifiedDocument>(&self, documents: &[&D]) -> BTreeSet<String> {
        let text = documents
            .iter()
            .map(|doc| doc.content())
            .collect::<Vec<_>>()
            .join(" ");
        self.extract_phrases(&text).into_iter().collect()
    }
}

impl Default for KeyphraseExtractor {
    fn default() -> Self {
        Self::new(KeyphraseConfig::default())
    }
}

/// Normalized indel similarity of two strings, case-insensitive, in `[0, 1]`.
///
/// `2 · LCS(a, b) / (|a| + |b|)`, counted in chars. Two empty strings are
/// identical (`1.0`).
pub fn indel_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for ca in &a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    let lcs = prev[b.len()];

    (2 * lcs) as f64 / total as f64
}
