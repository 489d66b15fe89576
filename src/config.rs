use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use taxon_enrich_core::affinity::AffinityWeights;
use taxon_enrich_core::bm25::Bm25Params;
use taxon_enrich_core::keyphrase::KeyphraseConfig;
use taxon_enrich_core::EnrichParams;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExtractionConfig {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_max_ngram")]
    pub max_ngram: usize,
    #[serde(default = "default_dedup_threshold")]
    pub dedup_threshold: f64,
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    #[serde(default = "default_top")]
    pub top: usize,
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            max_ngram: default_max_ngram(),
            dedup_threshold: default_dedup_threshold(),
            window_size: default_window_size(),
            top: default_top(),
            min_chars: default_min_chars(),
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}
fn default_max_ngram() -> usize {
    3
}
fn default_dedup_threshold() -> f64 {
    0.9
}
fn default_window_size() -> usize {
    1
}
fn default_top() -> usize {
    5
}
fn default_min_chars() -> usize {
    3
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScoringConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_bm25_k1")]
    pub bm25_k1: f64,
    #[serde(default = "default_bm25_b")]
    pub bm25_b: f64,
    #[serde(default)]
    pub weights: WeightsConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            bm25_k1: default_bm25_k1(),
            bm25_b: default_bm25_b(),
            weights: WeightsConfig::default(),
        }
    }
}

fn default_top_k() -> usize {
    3
}
fn default_bm25_k1() -> f64 {
    1.5
}
fn default_bm25_b() -> f64 {
    0.75
}

/// Affinity weights: `w_p·p/(1+p) + w_d·d + w_s·(s+1)/2`.
#[derive(Debug, Deserialize, Clone)]
pub struct WeightsConfig {
    #[serde(default = "default_w_popularity")]
    pub popularity: f64,
    #[serde(default = "default_w_distinctiveness")]
    pub distinctiveness: f64,
    #[serde(default = "default_w_similarity")]
    pub similarity: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            popularity: default_w_popularity(),
            distinctiveness: default_w_distinctiveness(),
            similarity: default_w_similarity(),
        }
    }
}

fn default_w_popularity() -> f64 {
    0.3
}
fn default_w_distinctiveness() -> f64 {
    0.4
}
fn default_w_similarity() -> f64 {
    0.3
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub dims: Option<usize>,
    /// Base URL for the Ollama provider.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            dims: Some(384),
            url: None,
            batch_size: 64,
            max_retries: 5,
            timeout_secs: 30,
        }
    }
}

fn default_provider() -> String {
    "hash".to_string()
}
fn default_batch_size() -> usize {
    64
}
fn default_max_retries() -> u32 {
    5
}
fn default_timeout_secs() -> u64 {
    30
}

impl EmbeddingConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

impl Config {
    /// Enrichment parameters for the core engine.
    pub fn enrich_params(&self) -> EnrichParams {
        EnrichParams {
            top_k: self.scoring.top_k,
            weights: AffinityWeights {
                popularity: self.scoring.weights.popularity,
                distinctiveness: self.scoring.weights.distinctiveness,
                similarity: self.scoring.weights.similarity,
            },
            bm25: Bm25Params {
                k1: self.scoring.bm25_k1,
                b: self.scoring.bm25_b,
            },
            keyphrase: KeyphraseConfig {
                language: self.extraction.language.clone(),
                max_ngram: self.extraction.max_ngram,
                dedup_threshold: self.extraction.dedup_threshold,
                window_size: self.extraction.window_size,
                top: self.extraction.top,
                min_chars: self.extraction.min_chars,
            },
        }
    }
}

/// Load and validate a TOML config. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    // Validate extraction
    let ex = &config.extraction;
    if !(1..=3).contains(&ex.max_ngram) {
        anyhow::bail!("extraction.max_ngram must be between 1 and 3");
    }
    if !(ex.dedup_threshold > 0.0 && ex.dedup_threshold <= 1.0) {
        anyhow::bail!("extraction.dedup_threshold must be in (0.0, 1.0]");
    }
    if ex.window_size == 0 {
        anyhow::bail!("extraction.window_size must be >= 1");
    }
    if ex.top == 0 {
        anyhow::bail!("extraction.top must be >= 1");
    }

    // Validate scoring
    let sc = &config.scoring;
    if sc.top_k == 0 {
        anyhow::bail!("scoring.top_k must be >= 1");
    }
    if sc.bm25_k1 <= 0.0 {
        anyhow::bail!("scoring.bm25_k1 must be > 0");
    }
    if !(0.0..=1.0).contains(&sc.bm25_b) {
        anyhow::bail!("scoring.bm25_b must be in [0.0, 1.0]");
    }
    let w = &sc.weights;
    if !(w.popularity >= 0.0 && w.distinctiveness >= 0.0 && w.similarity >= 0.0) {
        anyhow::bail!("scoring.weights must all be >= 0");
    }
    if w.popularity + w.distinctiveness + w.similarity <= 0.0 {
        anyhow::bail!("scoring.weights must not all be zero");
    }

    // Validate embedding
    let emb = &config.embedding;
    match emb.provider.as_str() {
        "disabled" => {}
        "hash" => {
            if emb.dims == Some(0) {
                anyhow::bail!("embedding.dims must be > 0 when provider is 'hash'");
            }
        }
        "openai" | "ollama" | "local" => {
            if emb.dims.is_none() || emb.dims == Some(0) {
                anyhow::bail!(
                    "embedding.dims must be > 0 when provider is '{}'",
                    emb.provider
                );
            }
            if emb.model.is_none() {
                anyhow::bail!(
                    "embedding.model must be specified when provider is '{}'",
                    emb.provider
                );
            }
        }
        other => anyhow::bail!(
            "Unknown embedding provider: '{}'. Must be disabled, hash, openai, ollama, or local.",
            other
        ),
    }
    if emb.batch_size == 0 {
        anyhow::bail!("embedding.batch_size must be > 0");
    }

    Ok(())
}
