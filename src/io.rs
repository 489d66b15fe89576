//! Reading corpora and taxonomies, writing enrichment results.
//!
//! All files are JSON:
//!
//! - **Corpus**: an array of `{ "id", "content", "assigned_classes" }`
//!   objects (`core_classes` is accepted as an alias).
//! - **Taxonomy**: an array whose entries are either bare class names
//!   (`"Mobility"`) or full class objects carrying earlier terms and
//!   embeddings, so a previous result's `classes` can be fed back in.
//! - **Result**: `{ "generated_at", "model", "classes" }`, written to a
//!   file or to stdout.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use taxon_enrich_core::{DocumentMeta, EnrichmentResult, TaxonomyClass};

/// One taxonomy entry as written by hand or by a previous run.
#[derive(Deserialize)]
#[serde(untagged)]
enum TaxonomyEntry {
    Name(String),
    Class(TaxonomyClass),
}

impl From<TaxonomyEntry> for TaxonomyClass {
    fn from(entry: TaxonomyEntry) -> Self {
        match entry {
            TaxonomyEntry::Name(name) => TaxonomyClass::new(name),
            TaxonomyEntry::Class(class) => class,
        }
    }
}

/// Accepts either a bare array or a previous result's `{ "classes": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum TaxonomyFile {
    List(Vec<TaxonomyEntry>),
    Result { classes: Vec<TaxonomyEntry> },
}

/// Load a labeled corpus from a JSON file.
pub fn load_corpus(path: &Path) -> Result<Vec<DocumentMeta>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus file: {}", path.display()))?;
    let docs: Vec<DocumentMeta> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse corpus file: {}", path.display()))?;
    Ok(docs)
}

/// Load taxonomy classes from a JSON file.
pub fn load_taxonomy(path: &Path) -> Result<Vec<TaxonomyClass>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read taxonomy file: {}", path.display()))?;
    parse_taxonomy(&content)
        .with_context(|| format!("Failed to parse taxonomy file: {}", path.display()))
}

fn parse_taxonomy(content: &str) -> Result<Vec<TaxonomyClass>> {
    let entries = match serde_json::from_str::<TaxonomyFile>(content)? {
        TaxonomyFile::List(entries) => entries,
        TaxonomyFile::Result { classes } => classes,
    };
    Ok(entries.into_iter().map(TaxonomyClass::from).collect())
}

/// Write an enrichment result as pretty JSON.
///
/// If `output` is `Some`, writes to that file path (creating parent
/// directories). Otherwise writes to stdout for piping.
pub fn write_result(result: &EnrichmentResult, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write result: {}", path.display()))?;
            let terms: usize = result.classes.iter().map(|c| c.terms.len()).sum();
            eprintln!(
                "Wrote {} classes, {} terms to {}",
                result.classes.len(),
                terms,
                path.display()
            );
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}
