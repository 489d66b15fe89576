//! Core data models for taxonomy enrichment.
//!
//! These types represent the labeled documents consumed by the enricher and
//! the taxonomy classes whose term sets it grows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use crate::affinity::AffinityWeights;

/// Anything the enricher can treat as a labeled document.
///
/// The partitioner and scorers only need a stable identifier, the text
/// content, and the set of class labels assigned upstream.
pub trait ClassifiedDocument {
    /// Opaque, stable document identifier.
    fn id(&self) -> &str;
    /// Free text used for candidate extraction and scoring.
    fn content(&self) -> &str;
    /// Class names assigned to this document (multi-label, possibly empty).
    fn assigned_classes(&self) -> &BTreeSet<String>;

    /// Whether `class_name` is one of this document's labels.
    fn has_class(&self, class_name: &str) -> bool {
        self.assigned_classes().contains(class_name)
    }
}

/// Concrete document shape supplied by the corpus producers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub id: String,
    pub content: String,
    #[serde(default, alias = "core_classes")]
    pub assigned_classes: BTreeSet<String>,
}

impl DocumentMeta {
    pub fn new<I, S>(id: impl Into<String>, content: impl Into<String>, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            content: content.into(),
            assigned_classes: classes.into_iter().map(Into::into).collect(),
        }
    }
}

impl ClassifiedDocument for DocumentMeta {
    fn id(&self) -> &str {
        &self.id
    }
    fn content(&self) -> &str {
        &self.content
    }
    fn assigned_classes(&self) -> &BTreeSet<String> {
        &self.assigned_classes
    }
}

/// A scored descriptor term for one class.
///
/// Equality and hashing consider only [`term`](TermScore::term), so a
/// collection of `TermScore`s behaves as a set of terms regardless of how
/// the scores drift between enrichment passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermScore {
    #[serde(deserialize_with = "deserialize_term")]
    pub term: String,
    pub popularity: f64,
    pub distinctiveness: f64,
    pub semantic_similarity: f64,
    #[serde(default)]
    pub affinity_score: f64,
}

impl TermScore {
    /// Build a score, lowercasing the term and deriving the affinity key.
    pub fn new(
        term: &str,
        popularity: f64,
        distinctiveness: f64,
        semantic_similarity: f64,
        weights: &AffinityWeights,
    ) -> Self {
        Self {
            term: term_key(term),
            popularity,
            distinctiveness,
            semantic_similarity,
            affinity_score: weights.combine(popularity, distinctiveness, semantic_similarity),
        }
    }
}

/// Canonical term key: trimmed and lowercased.
pub fn term_key(term: &str) -> String {
    term.trim().to_lowercase()
}

fn deserialize_term<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(term_key(&raw))
}

impl PartialEq for TermScore {
    fn eq(&self, other: &Self) -> bool {
        self.term == other.term
    }
}

impl Eq for TermScore {}

impl Hash for TermScore {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.term.hash(state);
    }
}

/// Insertion-ordered set of [`TermScore`]s keyed by term text.
///
/// Iteration order is stable: earlier passes' terms come first, followed by
/// newly merged terms in their ranked order. A class's embedding array is
/// aligned with this order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<TermScore>", into = "Vec<TermScore>")]
pub struct TermSet {
    entries: Vec<TermScore>,
}

impl TermSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.get(term).is_some()
    }

    pub fn get(&self, term: &str) -> Option<&TermScore> {
        let key = term_key(term);
        self.entries.iter().find(|ts| ts.term == key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TermScore> {
        self.entries.iter()
    }

    /// Term texts in iteration order.
    pub fn terms(&self) -> Vec<&str> {
        self.entries.iter().map(|ts| ts.term.as_str()).collect()
    }

    /// Insert a score unless its term is already present.
    ///
    /// The term is normalized first, so case variants collapse. Returns
    /// `true` if the term was new. An existing entry is kept as-is.
    pub fn insert(&mut self, mut score: TermScore) -> bool {
        score.term = term_key(&score.term);
        if self.contains(&score.term) {
            return false;
        }
        self.entries.push(score);
        true
    }

    /// Union-by-term: a new set holding every term of `self` followed by
    /// any term of `incoming` not already present.
    pub fn union<I>(&self, incoming: I) -> TermSet
    where
        I: IntoIterator<Item = TermScore>,
    {
        let mut merged = self.clone();
        for score in incoming {
            merged.insert(score);
        }
        merged
    }
}

impl From<Vec<TermScore>> for TermSet {
    fn from(scores: Vec<TermScore>) -> Self {
        scores.into_iter().collect()
    }
}

impl From<TermSet> for Vec<TermScore> {
    fn from(set: TermSet) -> Self {
        set.entries
    }
}

impl FromIterator<TermScore> for TermSet {
    fn from_iter<T: IntoIterator<Item = TermScore>>(iter: T) -> Self {
        TermSet::new().union(iter)
    }
}

impl<'a> IntoIterator for &'a TermSet {
    type Item = &'a TermScore;
    type IntoIter = std::slice::Iter<'a, TermScore>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A taxonomy node and its accumulated enrichment state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyClass {
    pub class_name: String,
    #[serde(default)]
    pub terms: TermSet,
    /// One vector per entry of `terms`, in the same order.
    #[serde(default, alias = "embeddings")]
    pub term_embeddings: Vec<Vec<f32>>,
}

impl TaxonomyClass {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            terms: TermSet::new(),
            term_embeddings: Vec::new(),
        }
    }
}

/// Snapshot of the taxonomy after one enrichment pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentResult {
    pub generated_at: DateTime<Utc>,
    /// Embedding model used for similarity and term embeddings.
    pub model: String,
    pub classes: Vec<TaxonomyClass>,
}
