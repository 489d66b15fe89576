//! # Taxon Enrich CLI (`taxo`)
//!
//! The `taxo` binary grows the descriptor terms of a taxonomy from a
//! labeled document corpus.
//!
//! ## Usage
//!
//! ```bash
//! taxo --config ./config/taxo.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `taxo enrich` | Enrich every class and write the updated taxonomy as JSON |
//! | `taxo score <class>` | Show ranked candidate scores for one class |
//! | `taxo candidates <class>` | Show the raw keyphrase candidates for one class |
//! | `taxo completions <shell>` | Print a shell completion script |
//!
//! ## Examples
//!
//! ```bash
//! # Enrich a taxonomy and write the result
//! taxo enrich --taxonomy classes.json --corpus corpus.json --output enriched.json
//!
//! # Feed a previous result back in: existing terms are kept
//! taxo enrich --taxonomy enriched.json --corpus more.json
//!
//! # Inspect why a term was (or was not) picked
//! taxo score Mobility --corpus corpus.json --limit 10
//! ```

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use taxon_enrich::progress::ProgressMode;
use taxon_enrich::{config, embedding, io};
use taxon_enrich_core::embedding::TermEmbedder;
use taxon_enrich_core::CorpusEnricher;

/// Taxon Enrich CLI: corpus-based enrichment of taxonomy class terms.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. A missing file falls back to built-in defaults.
#[derive(Parser)]
#[command(
    name = "taxo",
    about = "Corpus-based taxonomy enrichment",
    version,
    long_about = "Extracts candidate key phrases from the documents labeled with each taxonomy \
    class, scores them for popularity, distinctiveness against sibling classes, and semantic \
    similarity to the class name, and merges the best into the class's term set."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/taxo.toml")]
    config: PathBuf,

    /// Progress output on stderr. Defaults to `human` on a TTY, otherwise `off`.
    #[arg(long, global = true, value_enum)]
    progress: Option<ProgressMode>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Enrich every class of a taxonomy from a labeled corpus.
    ///
    /// Classes are processed in file order. Terms already present are never
    /// removed; each class's term embeddings are recomputed from its full
    /// term set.
    Enrich {
        /// Taxonomy JSON: class names, class objects, or a previous result.
        #[arg(long)]
        taxonomy: PathBuf,

        /// Corpus JSON: documents with `id`, `content`, `assigned_classes`.
        #[arg(long)]
        corpus: PathBuf,

        /// Write the result here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Score and rank every candidate term for one class.
    ///
    /// Read-only: prints popularity, distinctiveness, similarity, and the
    /// combined affinity for each candidate.
    Score {
        /// Class name.
        class: String,

        #[arg(long)]
        corpus: PathBuf,

        /// Maximum number of rows to print.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List the keyphrase candidates extracted for one class.
    Candidates {
        /// Class name.
        class: String,

        #[arg(long)]
        corpus: PathBuf,
    },

    /// Print a shell completion script to stdout.
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Commands that don't require config
    if let Commands::Completions { shell } = &cli.command {
        clap_complete::generate(*shell, &mut Cli::command(), "taxo", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;
    let progress = cli.progress.unwrap_or_else(ProgressMode::default_for_tty);
    let embedder = embedding::create_provider(&cfg.embedding)?;
    info!(
        "Using embedding model {} ({} dims)",
        embedder.model_name(),
        embedder.dims()
    );
    let enricher = CorpusEnricher::new(embedder, cfg.enrich_params());

    match cli.command {
        Commands::Enrich {
            taxonomy,
            corpus,
            output,
        } => {
            let mut classes = io::load_taxonomy(&taxonomy)?;
            let docs = io::load_corpus(&corpus)?;
            info!("Loaded {} classes and {} documents", classes.len(), docs.len());

            let reporter = progress.reporter();
            let result = enricher.enrich_with_progress(&mut classes, &docs, reporter.as_ref())?;
            io::write_result(&result, output.as_deref())?;
        }
        Commands::Score {
            class,
            corpus,
            limit,
        } => {
            let docs = io::load_corpus(&corpus)?;
            let ranked = enricher.score_class(&class, &docs)?;
            if ranked.is_empty() {
                println!("No candidates for class {}.", class);
                return Ok(());
            }

            println!(
                "{:>8}  {:>8}  {:>8}  {:>8}  TERM",
                "AFFINITY", "POP", "DIST", "SIM"
            );
            let shown = limit.unwrap_or(ranked.len());
            for score in ranked.iter().take(shown) {
                println!(
                    "{:>8.3}  {:>8.3}  {:>8.3}  {:>8.3}  {}",
                    score.affinity_score,
                    score.popularity,
                    score.distinctiveness,
                    score.semantic_similarity,
                    score.term
                );
            }
        }
        Commands::Candidates { class, corpus } => {
            let docs = io::load_corpus(&corpus)?;
            for term in enricher.candidates(&class, &docs)? {
                println!("{}", term);
            }
        }
        Commands::Completions { .. } => {
            // Handled above (before config loading)
        }
    }

    Ok(())
}
