//! Corpus enricher: grows each taxonomy class's term set from its documents.
//!
//! For each class, in the order supplied:
//!
//! 1. Partition the corpus into the class's documents and sibling groups.
//! 2. Extract candidate phrases from the class's own documents.
//! 3. Score every candidate for popularity, distinctiveness, and semantic
//!    similarity to the class name; derive the affinity score.
//! 4. Rank by affinity (descending, ties by term text) and keep the top-k.
//! 5. Union the picks into the class's existing terms (never removes).
//! 6. Re-embed the class's full term set, replacing the old embeddings.
//!
//! The corpus is checked for unlabeled documents before any class is
//! touched, so a contract violation leaves the taxonomy unchanged.

use chrono::Utc;
use tracing::{debug, info};

use crate::affinity::AffinityWeights;
use crate::bm25::Bm25Params;
use crate::distinctiveness::{DistinctivenessScorer, GroupCorpus};
use crate::embedding::TermEmbedder;
use crate::error::{EnrichError, Result};
use crate::keyphrase::{KeyphraseConfig, KeyphraseExtractor};
use crate::models::{ClassifiedDocument, EnrichmentResult, TaxonomyClass, TermScore, TermSet};
use crate::partition::{ensure_labeled, partition, ClassPartition};
use crate::popularity::popularity;
use crate::progress::{EnrichProgressEvent, EnrichProgressReporter, NoProgress};

/// Enrichment tuning parameters, decoupled from application config.
#[derive(Debug, Clone)]
pub struct EnrichParams {
    /// Terms retained per class per pass.
    pub top_k: usize,
    pub weights: AffinityWeights,
    pub bm25: Bm25Params,
    pub keyphrase: KeyphraseConfig,
}

impl Default for EnrichParams {
    fn default() -> Self {
        Self {
            top_k: 3,
            weights: AffinityWeights::default(),
            bm25: Bm25Params::default(),
            keyphrase: KeyphraseConfig::default(),
        }
    }
}

/// Drives partitioning, extraction, scoring, and merging for a taxonomy.
pub struct CorpusEnricher<E> {
    embedder: E,
    extractor: KeyphraseExtractor,
    scorer: DistinctivenessScorer<Bm25Params>,
    top_k: usize,
    weights: AffinityWeights,
}

impl<E: TermEmbedder> CorpusEnricher<E> {
    pub fn new(embedder: E, params: EnrichParams) -> Self {
        Self {
            embedder,
            extractor: KeyphraseExtractor::new(params.keyphrase),
            scorer: DistinctivenessScorer::new(params.bm25),
            top_k: params.top_k,
            weights: params.weights,
        }
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn extractor(&self) -> &KeyphraseExtractor {
        &self.extractor
    }

    /// Enrich every class in place and return a snapshot of the result.
    pub fn enrich<D: ClassifiedDocument>(
        &self,
        classes: &mut [TaxonomyClass],
        corpus: &[D],
    ) -> Result<EnrichmentResult> {
        self.enrich_with_progress(classes, corpus, &NoProgress)
    }

    /// [`enrich`](Self::enrich), reporting progress to `progress`.
    pub fn enrich_with_progress<D: ClassifiedDocument>(
        &self,
        classes: &mut [TaxonomyClass],
        corpus: &[D],
        progress: &dyn EnrichProgressReporter,
    ) -> Result<EnrichmentResult> {
        ensure_labeled(corpus)?;

        let total = classes.len();
        for (i, class) in classes.iter_mut().enumerate() {
            progress.report(EnrichProgressEvent::ClassStarted {
                class: class.class_name.clone(),
                n: i + 1,
                total,
            });
            let retained = self.enrich_class(class, corpus, progress)?;
            progress.report(EnrichProgressEvent::ClassFinished {
                class: class.class_name.clone(),
                retained,
                terms: class.terms.len(),
            });
        }

        Ok(EnrichmentResult {
            generated_at: Utc::now(),
            model: self.embedder.model_name().to_string(),
            classes: classes.to_vec(),
        })
    }

    /// Enrich one class in place. Returns how many top-k picks were selected.
    pub fn enrich_class<D: ClassifiedDocument>(
        &self,
        class: &mut TaxonomyClass,
        corpus: &[D],
        progress: &dyn EnrichProgressReporter,
    ) -> Result<usize> {
        info!("Enriching class {}", class.class_name);

        let parts = partition(corpus, &class.class_name)?;
        let ranked = self.score_partition(&class.class_name, &parts, progress)?;
        let picks = select_top_k(ranked, self.top_k);
        let retained = picks.len();

        class.terms = class.terms.union(picks);
        class.term_embeddings = self.embed_terms(&class.terms)?;

        debug!(
            "Class {} now has {} terms: {:?}",
            class.class_name,
            class.terms.len(),
            class.terms.terms()
        );
        Ok(retained)
    }

    /// Every candidate for `class_name`, scored and ranked, without
    /// modifying anything.
    pub fn score_class<D: ClassifiedDocument>(
        &self,
        class_name: &str,
        corpus: &[D],
    ) -> Result<Vec<TermScore>> {
        let parts = partition(corpus, class_name)?;
        self.score_partition(class_name, &parts, &NoProgress)
    }

    /// Candidate terms extracted for `class_name`.
    pub fn candidates<D: ClassifiedDocument>(
        &self,
        class_name: &str,
        corpus: &[D],
    ) -> Result<Vec<String>> {
        let parts = partition(corpus, class_name)?;
        Ok(self.extractor.extract_candidates(&parts.own).into_iter().collect())
    }

    fn score_partition<D: ClassifiedDocument>(
        &self,
        class_name: &str,
        parts: &ClassPartition<'_, D>,
        progress: &dyn EnrichProgressReporter,
    ) -> Result<Vec<TermScore>> {
        info!("Extracting candidate terms");
        let candidates = self.extractor.extract_candidates(&parts.own);
        debug!("Candidate terms: {:?}", candidates);
        progress.report(EnrichProgressEvent::CandidatesExtracted {
            class: class_name.to_string(),
            candidates: candidates.len(),
        });
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let class_texts: Vec<&str> = parts.own.iter().map(|d| d.content()).collect();
        let class_group = GroupCorpus::new(&class_texts);
        let sibling_groups: Vec<GroupCorpus> = parts
            .siblings
            .values()
            .map(|docs| {
                let texts: Vec<&str> = docs.iter().map(|d| d.content()).collect();
                GroupCorpus::new(&texts)
            })
            .collect();
        let class_vec = self
            .embedder
            .encode(class_name)
            .map_err(EnrichError::Embedding)?;

        let total = candidates.len();
        let mut scores = Vec::with_capacity(total);
        for (i, term) in candidates.iter().enumerate() {
            info!("Calculating component scores for term: {}", term);
            let pop = popularity(term, &class_texts);
            let dist = self.scorer.score(term, &class_group, &sibling_groups);
            let term_vec = self.embedder.encode(term).map_err(EnrichError::Embedding)?;
            let sim = self.embedder.similarity(&term_vec, &class_vec) as f64;

            let score = TermScore::new(term, pop, dist, sim, &self.weights);
            debug!(
                "popularity={:.3} distinctiveness={:.3} semantic_similarity={:.3} affinity={:.3}",
                score.popularity, score.distinctiveness, score.semantic_similarity, score.affinity_score
            );
            scores.push(score);
            progress.report(EnrichProgressEvent::TermScored {
                class: class_name.to_string(),
                n: i + 1,
                total,
            });
        }

        rank_terms(&mut scores);
        Ok(scores)
    }

    fn embed_terms(&self, terms: &TermSet) -> Result<Vec<Vec<f32>>> {
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let texts: Vec<String> = terms.iter().map(|ts| ts.term.clone()).collect();
        let vectors = self
            .embedder
            .encode_batch(&texts)
            .map_err(EnrichError::Embedding)?;
        if vectors.len() != texts.len() {
            return Err(EnrichError::EmbeddingCount {
                expected: texts.len(),
                actual: vectors.len(),
            });
        }
        Ok(vectors)
    }
}

/// Sort by affinity descending, then by term text ascending.
pub fn rank_terms(scores: &mut [TermScore]) {
    scores.sort_by(|a, b| {
        b.affinity_score
            .total_cmp(&a.affinity_score)
            .then_with(|| a.term.cmp(&b.term))
    });
}

/// The best `k` distinct terms of an already ranked list.
///
/// Candidates that differ only in case collapse to their best-ranked entry.
pub fn select_top_k(ranked: Vec<TermScore>, k: usize) -> Vec<TermScore> {
    let distinct: TermSet = ranked.into_iter().collect();
    Vec::from(distinct).into_iter().take(k).collect()
}
