//! Enrichment progress events.
//!
//! The enricher emits an [`EnrichProgressEvent`] at each step of a pass so
//! front ends can show what is being scored and how much is left. Reporters
//! that write to a terminal live in the app crate.

/// A single progress event during an enrichment pass.
#[derive(Clone, Debug, PartialEq)]
pub enum EnrichProgressEvent {
    /// Started class `n` (1-based) of `total`.
    ClassStarted { class: String, n: usize, total: usize },
    /// Candidate extraction finished for a class.
    CandidatesExtracted { class: String, candidates: usize },
    /// Scored candidate `n` of `total` for a class.
    TermScored { class: String, n: usize, total: usize },
    /// A class was merged: `retained` new top-k picks, `terms` in the set now.
    ClassFinished {
        class: String,
        retained: usize,
        terms: usize,
    },
}

/// Receives progress events from the enricher.
pub trait EnrichProgressReporter {
    fn report(&self, event: EnrichProgressEvent);
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl EnrichProgressReporter for NoProgress {
    fn report(&self, _event: EnrichProgressEvent) {}
}
