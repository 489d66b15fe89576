//! # Taxon Enrich
//!
//! Corpus-based enrichment of taxonomy class descriptors.
//!
//! This crate is the application layer around `taxon-enrich-core`: it reads
//! TOML configuration, builds an embedding provider, loads corpora and
//! taxonomies from JSON, and reports progress. The `taxo` binary wires these
//! together.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌───────────────────┐   ┌─────────────┐
//! │ corpus.json │──▶│  CorpusEnricher   │──▶│ result.json │
//! │ taxonomy    │   │ extract + score   │   │  (classes)  │
//! └─────────────┘   └─────────┬─────────┘   └─────────────┘
//!                             │
//!                   ┌─────────┴─────────┐
//!                   │ embedding provider │
//!                   │ hash/local/openai  │
//!                   └───────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`embedding`] | Embedding provider implementations |
//! | [`io`] | Corpus/taxonomy loading and result writing |
//! | [`progress`] | Human and JSON progress reporters |

pub mod config;
pub mod embedding;
pub mod io;
pub mod progress;
