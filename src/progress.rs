//! Enrichment progress reporting.
//!
//! Reports observable progress during `taxo enrich` so users see which class
//! is being scored and how many candidates are left. Progress is emitted on
//! **stderr** so stdout remains parseable when the result is piped.

use std::io::Write;

use taxon_enrich_core::progress::{EnrichProgressEvent, EnrichProgressReporter, NoProgress};

/// Human-friendly progress on stderr: "enrich Mobility  scoring  12 / 40 terms".
pub struct StderrProgress;

impl EnrichProgressReporter for StderrProgress {
    fn report(&self, event: EnrichProgressEvent) {
        let line = match &event {
            EnrichProgressEvent::ClassStarted { class, n, total } => {
                format!(
                    "enrich {}  class {} / {}\n",
                    class,
                    format_number(*n as u64),
                    format_number(*total as u64)
                )
            }
            EnrichProgressEvent::CandidatesExtracted { class, candidates } => {
                format!(
                    "enrich {}  extracted {} candidates\n",
                    class,
                    format_number(*candidates as u64)
                )
            }
            EnrichProgressEvent::TermScored { class, n, total } => {
                format!(
                    "enrich {}  scoring  {} / {} terms\n",
                    class,
                    format_number(*n as u64),
                    format_number(*total as u64)
                )
            }
            EnrichProgressEvent::ClassFinished {
                class,
                retained,
                terms,
            } => {
                format!(
                    "enrich {}  done  +{} selected, {} terms\n",
                    class,
                    format_number(*retained as u64),
                    format_number(*terms as u64)
                )
            }
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl EnrichProgressReporter for JsonProgress {
    fn report(&self, event: EnrichProgressEvent) {
        let obj = event_json(&event);
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

fn event_json(event: &EnrichProgressEvent) -> serde_json::Value {
    match event {
        EnrichProgressEvent::ClassStarted { class, n, total } => serde_json::json!({
            "event": "progress",
            "class": class,
            "phase": "started",
            "n": n,
            "total": total
        }),
        EnrichProgressEvent::CandidatesExtracted { class, candidates } => serde_json::json!({
            "event": "progress",
            "class": class,
            "phase": "extracted",
            "candidates": candidates
        }),
        EnrichProgressEvent::TermScored { class, n, total } => serde_json::json!({
            "event": "progress",
            "class": class,
            "phase": "scoring",
            "n": n,
            "total": total
        }),
        EnrichProgressEvent::ClassFinished {
            class,
            retained,
            terms,
        } => serde_json::json!({
            "event": "progress",
            "class": class,
            "phase": "finished",
            "retained": retained,
            "terms": terms
        }),
    }
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    /// Build a reporter for this mode.
    pub fn reporter(&self) -> Box<dyn EnrichProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
