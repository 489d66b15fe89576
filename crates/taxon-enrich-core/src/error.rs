//! Error type returned by the enrichment pipeline.

use thiserror::Error;

/// Failures surfaced by [`CorpusEnricher`](crate::enrich::CorpusEnricher).
///
/// Degenerate inputs (empty classes, empty sibling groups, zero document
/// frequency) are not errors; they degrade to neutral scores.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// A document reached partitioning without any assigned class labels.
    ///
    /// This is an upstream data contract breach and is never retried.
    #[error("Core classes for document {document_id} not defined")]
    MissingClasses { document_id: String },

    /// The term embedder failed to encode a term or class name.
    #[error("embedding failed: {0}")]
    Embedding(#[source] anyhow::Error),

    /// The embedder returned a different number of vectors than texts sent.
    #[error("embedder returned {actual} vectors for {expected} texts")]
    EmbeddingCount { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, EnrichError>;
