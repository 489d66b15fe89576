//! Embedding providers for term and class-name vectors.
//!
//! Every provider implements the core [`TermEmbedder`] trait:
//! - **[`DisabledProvider`]**: returns errors; enrichment needs similarity, so
//!   this only exists to give a clear message when embeddings are turned off.
//! - **[`OpenAIProvider`]**: calls the OpenAI embeddings API with batching,
//!   retry, and backoff.
//! - **[`OllamaProvider`]**: calls a local Ollama instance's `/api/embed`.
//! - **`LocalProvider`**: runs a sentence-embedding model locally via
//!   fastembed; no network calls after the model download.
//! - **`hash`**: the offline [`HashEmbedder`] from the core crate.
//!
//! # Provider Selection
//!
//! ```rust,no_run
//! # use taxon_enrich::config::EmbeddingConfig;
//! # use taxon_enrich::embedding::create_provider;
//! # use taxon_enrich_core::embedding::TermEmbedder;
//! let config = EmbeddingConfig::default(); // provider = "hash"
//! let provider = create_provider(&config).unwrap();
//! assert_eq!(provider.model_name(), "fnv-hash");
//! ```
//!
//! # Retry Strategy
//!
//! The OpenAI and Ollama providers use exponential backoff for transient errors:
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use anyhow::{bail, Result};
use std::time::Duration;
use tracing::{debug, warn};

use taxon_enrich_core::embedding::{HashEmbedder, TermEmbedder};

use crate::config::EmbeddingConfig;

// ============ Disabled Provider ============

/// Provider used when `embedding.provider = "disabled"`.
pub struct DisabledProvider;

impl TermEmbedder for DisabledProvider {
    fn model_name(&self) -> &str {
        "disabled"
    }
    fn dims(&self) -> usize {
        0
    }
    fn encode_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        bail!("Embedding provider is disabled; set [embedding] provider in the config")
    }
}

// ============ Shared HTTP plumbing ============

/// Which hosted API a request targets; only affects URLs and messages.
#[derive(Clone, Copy)]
enum Backend {
    OpenAI,
    Ollama,
}

impl Backend {
    fn label(self) -> &'static str {
        match self {
            Backend::OpenAI => "OpenAI",
            Backend::Ollama => "Ollama",
        }
    }
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1 << (attempt - 1).min(5))
}

/// POST `body` to `url`, retrying transient failures, and parse the reply.
fn post_with_retry(
    client: &reqwest::blocking::Client,
    backend: Backend,
    url: &str,
    bearer: Option<&str>,
    body: &serde_json::Value,
    max_retries: u32,
) -> Result<serde_json::Value> {
    let mut last_err = None;

    for attempt in 0..=max_retries {
        if attempt > 0 {
            let delay = backoff(attempt);
            debug!("{} retry {} after {:?}", backend.label(), attempt, delay);
            std::thread::sleep(delay);
        }

        let mut request = client
            .post(url)
            .header("Content-Type", "application/json")
            .json(body);
        if let Some(key) = bearer {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        match request.send() {
            Ok(response) => {
                let status = response.status();

                if status.is_success() {
                    return Ok(response.json()?);
                }

                // Rate limited or server error: retry
                if status.as_u16() == 429 || status.is_server_error() {
                    let body_text = response.text().unwrap_or_default();
                    warn!("{} API error {}, will retry", backend.label(), status);
                    last_err = Some(anyhow::anyhow!(
                        "{} API error {}: {}",
                        backend.label(),
                        status,
                        body_text
                    ));
                    continue;
                }

                let body_text = response.text().unwrap_or_default();
                bail!("{} API error {}: {}", backend.label(), status, body_text);
            }
            Err(e) => {
                last_err = Some(match backend {
                    Backend::Ollama => anyhow::anyhow!(
                        "Ollama connection error (is Ollama running at {}?): {}",
                        url,
                        e
                    ),
                    Backend::OpenAI => e.into(),
                });
                continue;
            }
        }
    }

    Err(last_err.unwrap_or_else(|| {
        anyhow::anyhow!("{} embedding failed after retries", backend.label())
    }))
}

fn http_client(config: &EmbeddingConfig) -> Result<reqwest::blocking::Client> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?)
}

/// Run `f` over `texts` in chunks of `batch_size`, concatenating results.
fn batched<F>(texts: &[String], batch_size: usize, mut f: F) -> Result<Vec<Vec<f32>>>
where
    F: FnMut(&[String]) -> Result<Vec<Vec<f32>>>,
{
    let mut out = Vec::with_capacity(texts.len());
    for chunk in texts.chunks(batch_size.max(1)) {
        let vectors = f(chunk)?;
        if vectors.len() != chunk.len() {
            bail!(
                "Embedding backend returned {} vectors for {} texts",
                vectors.len(),
                chunk.len()
            );
        }
        out.extend(vectors);
    }
    Ok(out)
}

// ============ OpenAI Provider ============

/// Embedding provider using the OpenAI API.
///
/// Calls `POST /v1/embeddings` with the configured model. Requires the
/// `OPENAI_API_KEY` environment variable.
pub struct OpenAIProvider {
    model: String,
    dims: usize,
    api_key: String,
    batch_size: usize,
    max_retries: u32,
    client: reqwest::blocking::Client,
}

impl OpenAIProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let model = config
            .model
            .clone()
            .ok_or_else(|| anyhow::anyhow!("embedding.model required for OpenAI provider"))?;
        let dims = config
            .dims
            .ok_or_else(|| anyhow::anyhow!("embedding.dims required for OpenAI provider"))?;

        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))?;

        Ok(Self {
            model,
            dims,
            api_key,
            batch_size: config.batch_size,
            max_retries: config.max_retries,
            client: http_client(config)?,
        })
    }
}

impl TermEmbedder for OpenAIProvider {
    fn model_name(&self) -> &str {
        &self.model
    }
    fn dims(&self) -> usize {
        self.dims
    }
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        batched(texts, self.batch_size, |chunk| {
            let body = serde_json::json!({
                "model": self.model,
                "input": chunk,
            });
            let json = post_with_retry(
                &self.client,
                Backend::OpenAI,
                "https://api.openai.com/v1/embeddings",
                Some(&self.api_key),
                &body,
                self.max_retries,
            )?;
            parse_openai_response(&json)
        })
    }
}

/// Parse the OpenAI embeddings API response JSON.
///
/// Extracts `data[].embedding`, ordered by `data[].index` when present.
fn parse_openai_response(json: &serde_json::Value) -> Result<Vec<Vec<f32>>> {
    let data = json
        .get("data")
        .and_then(|d| d.as_array())
        .ok_or_else(|| anyhow::anyhow!("Invalid OpenAI response: missing data array"))?;

    let mut indexed = Vec::with_capacity(data.len());

    for (pos, item) in data.iter().enumerate() {
        let embedding = item
            .get("embedding")
            .and_then(|e| e.as_array())
            .ok_or_else(|| anyhow::anyhow!("Invalid OpenAI response: missing embedding"))?;

        let vec: Vec<f32> = embedding
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect();

        let index = item
            .get("index")
            .and_then(|i| i.as_u64())
            .map(|i| i as usize)
            .unwrap_or(pos);
        indexed.push((index, vec));
    }

    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, v)| v).collect())
}

// ============ Ollama Provider ============

/// Embedding provider using a local Ollama instance.
///
/// Calls `POST /api/embed` on the configured URL (default
/// `http://localhost:11434`).
pub struct OllamaProvider {
    model: String,
    dims: usize,
    url: String,
    batch_size: usize,
    max_retries: u32,
    client: reqwest::blocking::Client,
}

impl OllamaProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let model = config
            .model
            .clone()
            .ok_or_else(|| anyhow::anyhow!("embedding.model required for Ollama provider"))?;
        let dims = config
            .dims
            .ok_or_else(|| anyhow::anyhow!("embedding.dims required for Ollama provider"))?;
        let url = config
            .url
            .clone()
            .unwrap_or_else(|| "http://localhost:11434".to_string());

        Ok(Self {
            model,
            dims,
            url: url.trim_end_matches('/').to_string(),
            batch_size: config.batch_size,
            max_retries: config.max_retries,
            client: http_client(config)?,
        })
    }
}

impl TermEmbedder for OllamaProvider {
    fn model_name(&self) -> &str {
        &self.model
    }
    fn dims(&self) -> usize {
        self.dims
    }
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let endpoint = format!("{}/api/embed", self.url);
        batched(texts, self.batch_size, |chunk| {
            let body = serde_json::json!({
                "model": self.model,
                "input": chunk,
            });
            let json = post_with_retry(
                &self.client,
                Backend::Ollama,
                &endpoint,
                None,
                &body,
                self.max_retries,
            )?;
            parse_ollama_response(&json)
        })
    }
}

fn parse_ollama_response(json: &serde_json::Value) -> Result<Vec<Vec<f32>>> {
    let embeddings = json
        .get("embeddings")
        .and_then(|e| e.as_array())
        .ok_or_else(|| anyhow::anyhow!("Invalid Ollama response: missing embeddings array"))?;

    let mut result = Vec::with_capacity(embeddings.len());

    for embedding in embeddings {
        let vec: Vec<f32> = embedding
            .as_array()
            .ok_or_else(|| anyhow::anyhow!("Invalid Ollama response: embedding is not an array"))?
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect();
        result.push(vec);
    }

    Ok(result)
}

// ============ Local Provider (fastembed) ============

/// Sentence-embedding model run locally through fastembed.
///
/// The model is downloaded from Hugging Face on first use and cached. It is
/// loaded lazily on the first call to [`encode_batch`](TermEmbedder::encode_batch).
#[cfg(feature = "local-embeddings-fastembed")]
pub struct LocalProvider {
    model_name: String,
    dims: usize,
    batch_size: usize,
    model: std::sync::Mutex<Option<fastembed::TextEmbedding>>,
}

#[cfg(feature = "local-embeddings-fastembed")]
impl LocalProvider {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let (model_name, dims) = resolve_local_model(config);
        // fail fast on unsupported names, before any download
        config_to_fastembed_model(&model_name)?;
        Ok(Self {
            model_name,
            dims,
            batch_size: config.batch_size,
            model: std::sync::Mutex::new(None),
        })
    }
}

#[cfg(feature = "local-embeddings-fastembed")]
impl TermEmbedder for LocalProvider {
    fn model_name(&self) -> &str {
        &self.model_name
    }
    fn dims(&self) -> usize {
        self.dims
    }
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut guard = self
            .model
            .lock()
            .map_err(|_| anyhow::anyhow!("Local embedding model lock poisoned"))?;

        if guard.is_none() {
            debug!("Loading local embedding model {}", self.model_name);
            let model = fastembed::TextEmbedding::try_new(
                fastembed::InitOptions::new(config_to_fastembed_model(&self.model_name)?)
                    .with_show_download_progress(true),
            )
            .map_err(|e| anyhow::anyhow!("Failed to initialize local embedding model: {}", e))?;
            *guard = Some(model);
        }

        let model = guard
            .as_mut()
            .ok_or_else(|| anyhow::anyhow!("Local embedding model not loaded"))?;
        model
            .embed(texts.to_vec(), Some(self.batch_size))
            .map_err(|e| anyhow::anyhow!("Local embedding failed: {}", e))
    }
}

#[cfg_attr(not(feature = "local-embeddings-fastembed"), allow(dead_code))]
fn resolve_local_model(config: &EmbeddingConfig) -> (String, usize) {
    let model_name = config
        .model
        .clone()
        .unwrap_or_else(|| "all-minilm-l6-v2".to_string());

    let dims = config.dims.unwrap_or(match model_name.as_str() {
        "all-minilm-l6-v2" => 384,
        "bge-small-en-v1.5" => 384,
        "bge-base-en-v1.5" => 768,
        "bge-large-en-v1.5" => 1024,
        "multilingual-e5-small" => 384,
        "multilingual-e5-base" => 768,
        _ => 384,
    });

    (model_name, dims)
}

#[cfg(feature = "local-embeddings-fastembed")]
fn config_to_fastembed_model(name: &str) -> Result<fastembed::EmbeddingModel> {
    match name {
        "all-minilm-l6-v2" => Ok(fastembed::EmbeddingModel::AllMiniLML6V2),
        "bge-small-en-v1.5" => Ok(fastembed::EmbeddingModel::BGESmallENV15),
        "bge-base-en-v1.5" => Ok(fastembed::EmbeddingModel::BGEBaseENV15),
        "bge-large-en-v1.5" => Ok(fastembed::EmbeddingModel::BGELargeENV15),
        "multilingual-e5-small" => Ok(fastembed::EmbeddingModel::MultilingualE5Small),
        "multilingual-e5-base" => Ok(fastembed::EmbeddingModel::MultilingualE5Base),
        other => bail!(
            "Unknown local embedding model: '{}'. Supported models: \
             all-minilm-l6-v2, bge-small-en-v1.5, bge-base-en-v1.5, bge-large-en-v1.5, \
             multilingual-e5-small, multilingual-e5-base",
            other
        ),
    }
}

/// Create the [`TermEmbedder`] named by `config.provider`.
///
/// | Config Value | Provider |
/// |-------------|----------|
/// | `"disabled"` | [`DisabledProvider`] |
/// | `"hash"` | [`HashEmbedder`] |
/// | `"openai"` | [`OpenAIProvider`] |
/// | `"ollama"` | [`OllamaProvider`] |
/// | `"local"` | `LocalProvider` (requires `local-embeddings-fastembed`) |
pub fn create_provider(config: &EmbeddingConfig) -> Result<Box<dyn TermEmbedder>> {
    match config.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledProvider)),
        "hash" => Ok(Box::new(HashEmbedder::new(config.dims.unwrap_or(384)))),
        "openai" => Ok(Box::new(OpenAIProvider::new(config)?)),
        "ollama" => Ok(Box::new(OllamaProvider::new(config)?)),
        #[cfg(feature = "local-embeddings-fastembed")]
        "local" => Ok(Box::new(LocalProvider::new(config)?)),
        #[cfg(not(feature = "local-embeddings-fastembed"))]
        "local" => bail!("Local embedding provider requires --features local-embeddings-fastembed"),
        other => bail!("Unknown embedding provider: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_openai_orders_by_index() {
        let json = serde_json::json!({
            "data": [
                {"index": 1, "embedding": [0.0, 1.0]},
                {"index": 0, "embedding": [1.0, 0.0]}
            ]
        });
        let vecs = parse_openai_response(&json).unwrap();
        assert_eq!(vecs, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn test_parse_openai_missing_data() {
        let json = serde_json::json!({"error": "nope"});
        assert!(parse_openai_response(&json).is_err());
    }

    #[test]
    fn test_parse_ollama() {
        let json = serde_json::json!({"embeddings": [[0.5, 0.5], [1.0, -1.0]]});
        let vecs = parse_ollama_response(&json).unwrap();
        assert_eq!(vecs.len(), 2);
        assert_eq!(vecs[1], vec![1.0, -1.0]);
    }

    #[test]
    fn test_parse_ollama_bad_shape() {
        let json = serde_json::json!({"embeddings": [1.0, 2.0]});
        assert!(parse_ollama_response(&json).is_err());
    }

    #[test]
    fn test_backoff_is_capped() {
        assert_eq!(backoff(1), Duration::from_secs(1));
        assert_eq!(backoff(3), Duration::from_secs(4));
        assert_eq!(backoff(6), Duration::from_secs(32));
        assert_eq!(backoff(10), Duration::from_secs(32));
    }

    #[test]
    fn test_batched_splits_and_checks_counts() {
        let texts: Vec<String> = (0..5).map(|i| format!("t{i}")).collect();
        let mut calls = 0;
        let out = batched(&texts, 2, |chunk| {
            calls += 1;
            Ok(chunk.iter().map(|_| vec![1.0]).collect())
        })
        .unwrap();
        assert_eq!(out.len(), 5);
        assert_eq!(calls, 3);

        let err = batched(&texts, 2, |_| Ok(vec![vec![1.0]]));
        assert!(err.is_err());
    }

    #[test]
    fn test_create_hash_provider() {
        let config = EmbeddingConfig::default();
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.model_name(), "fnv-hash");
        assert_eq!(provider.dims(), 384);
        let v = provider.encode("parking sensor").unwrap();
        assert_eq!(v.len(), 384);
    }

    #[test]
    fn test_disabled_provider_errors() {
        let config = EmbeddingConfig {
            provider: "disabled".to_string(),
            ..EmbeddingConfig::default()
        };
        let provider = create_provider(&config).unwrap();
        assert!(provider.encode("anything").is_err());
    }

    #[test]
    fn test_unknown_provider() {
        let config = EmbeddingConfig {
            provider: "word2vec".to_string(),
            ..EmbeddingConfig::default()
        };
        assert!(create_provider(&config).is_err());
    }

    #[test]
    fn test_resolve_local_model_dims() {
        let config = EmbeddingConfig {
            provider: "local".to_string(),
            model: Some("bge-base-en-v1.5".to_string()),
            dims: None,
            ..EmbeddingConfig::default()
        };
        assert_eq!(resolve_local_model(&config), ("bge-base-en-v1.5".to_string(), 768));
    }
}
