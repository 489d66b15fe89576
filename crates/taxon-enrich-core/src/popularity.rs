//! Popularity: log-scaled document frequency of a term within its class.

/// Count the documents in `documents` that contain `term`.
///
/// Matching is case-insensitive. Single-word terms must match a whole
/// whitespace token (so `sensor` does not count inside `sensorthings`);
/// multi-word terms match as a contiguous substring of the text.
pub fn document_frequency<S: AsRef<str>>(term: &str, documents: &[S]) -> usize {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return 0;
    }
    let single_word = term.split_whitespace().count() == 1;

    documents
        .iter()
        .filter(|doc| {
            let doc = doc.as_ref().to_lowercase();
            if single_word {
                doc.split_whitespace().any(|token| token == term)
            } else {
                doc.contains(&term)
            }
        })
        .count()
}

/// `ln(1 + df)` where `df` is [`document_frequency`].
///
/// Rewards breadth of occurrence while damping very frequent terms.
/// Zero when no document contains the term.
pub fn popularity<S: AsRef<str>>(term: &str, documents: &[S]) -> f64 {
    (document_frequency(term, documents) as f64).ln_1p()
}
