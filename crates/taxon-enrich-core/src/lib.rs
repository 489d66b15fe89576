//! # Taxon Enrich Core
//!
//! Pure, synchronous logic for corpus-based taxonomy enrichment: the
//! document model, class partitioning, keyphrase extraction, popularity and
//! BM25-based distinctiveness scoring, the embedding trait, and the
//! [`CorpusEnricher`](enrich::CorpusEnricher) that drives them.
//!
//! This crate performs no network or filesystem I/O. Concrete embedding
//! backends, configuration files, and the CLI live in the `taxon-enrich`
//! application crate.
//!
//! ```text
//!                                     ┌──▶ popularity ──────┐
//! corpus ──▶ partition ──▶ keyphrase ─┼──▶ distinctiveness ─┼──▶ affinity ──▶ top-k ──▶ TermSet
//!                                     └──▶ similarity ──────┘
//! ```

pub mod affinity;
pub mod bm25;
pub mod distinctiveness;
pub mod embedding;
pub mod enrich;
pub mod error;
pub mod keyphrase;
pub mod models;
pub mod partition;
pub mod popularity;
pub mod progress;

pub use enrich::{CorpusEnricher, EnrichParams};
pub use error::EnrichError;
pub use models::{ClassifiedDocument, DocumentMeta, EnrichmentResult, TaxonomyClass, TermScore, TermSet};
