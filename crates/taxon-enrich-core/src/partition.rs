//! Class document partitioner.
//!
//! Splits a corpus into the documents labeled with a target class and
//! label-indexed views of every other class. Sibling groups are not a
//! partition of the remaining corpus: a document carrying several labels
//! appears under each of its non-target labels.

use std::collections::BTreeMap;

use crate::error::{EnrichError, Result};
use crate::models::ClassifiedDocument;

/// Documents grouped for scoring one class.
#[derive(Debug)]
pub struct ClassPartition<'a, D> {
    /// Documents whose labels contain the target class.
    pub own: Vec<&'a D>,
    /// Every other label seen in the corpus, mapped to its documents.
    pub siblings: BTreeMap<String, Vec<&'a D>>,
}

/// Fail on the first document with no assigned classes.
pub fn ensure_labeled<D: ClassifiedDocument>(corpus: &[D]) -> Result<()> {
    match corpus.iter().find(|doc| doc.assigned_classes().is_empty()) {
        Some(doc) => Err(EnrichError::MissingClasses {
            document_id: doc.id().to_string(),
        }),
        None => Ok(()),
    }
}

/// Partition `corpus` around `class_name`.
///
/// # Errors
///
/// [`EnrichError::MissingClasses`] if any document has no labels.
pub fn partition<'a, D: ClassifiedDocument>(
    corpus: &'a [D],
    class_name: &str,
) -> Result<ClassPartition<'a, D>> {
    let mut own = Vec::new();
    let mut siblings: BTreeMap<String, Vec<&'a D>> = BTreeMap::new();

    for doc in corpus {
        let labels = doc.assigned_classes();
        if labels.is_empty() {
            return Err(EnrichError::MissingClasses {
                document_id: doc.id().to_string(),
            });
        }
        for label in labels {
            if label == class_name {
                own.push(doc);
            } else {
                siblings.entry(label.clone()).or_default().push(doc);
            }
        }
    }

    Ok(ClassPartition { own, siblings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentMeta;

    fn corpus() -> Vec<DocumentMeta> {
        vec![
            DocumentMeta::new("d1", "parking occupancy", ["Mobility"]),
            DocumentMeta::new("d2", "air quality", ["Environment"]),
            DocumentMeta::new("d3", "traffic noise", ["Mobility", "Environment", "Health"]),
        ]
    }

    fn ids<D: ClassifiedDocument>(docs: &[&D]) -> Vec<String> {
        docs.iter().map(|d| d.id().to_string()).collect()
    }

    #[test]
    fn test_own_documents() {
        let corpus = corpus();
        let p = partition(&corpus, "Mobility").unwrap();
        assert_eq!(ids(&p.own), vec!["d1", "d3"]);
    }

    #[test]
    fn test_siblings_are_label_views() {
        let corpus = corpus();
        let p = partition(&corpus, "Mobility").unwrap();
        assert_eq!(p.siblings.keys().collect::<Vec<_>>(), vec!["Environment", "Health"]);
        assert_eq!(ids(&p.siblings["Environment"]), vec!["d2", "d3"]);
        assert_eq!(ids(&p.siblings["Health"]), vec!["d3"]);
    }

    #[test]
    fn test_unknown_class_has_no_own_docs() {
        let corpus = corpus();
        let p = partition(&corpus, "Energy").unwrap();
        assert!(p.own.is_empty());
        assert_eq!(p.siblings.len(), 3);
    }

    #[test]
    fn test_unlabeled_document_fails() {
        let mut corpus = corpus();
        corpus.push(DocumentMeta::new("orphan", "no labels", Vec::<String>::new()));
        let err = partition(&corpus, "Mobility").unwrap_err();
        assert!(matches!(err, EnrichError::MissingClasses { ref document_id } if document_id == "orphan"));
        assert_eq!(err.to_string(), "Core classes for document orphan not defined");
        assert!(ensure_labeled(&corpus).is_err());
    }
}
