//! Term embedder trait and vector utilities.
//!
//! Defines the [`TermEmbedder`] trait every embedding backend implements,
//! [`cosine_similarity`], and [`HashEmbedder`], a deterministic offline
//! embedder based on feature hashing.
//!
//! Network and model-backed embedders (OpenAI, Ollama, fastembed) live in
//! the `taxon-enrich` app crate.

use anyhow::Result;

/// Produces dense vectors for terms and class names.
///
/// Implementations must return exactly one vector per input text, in input
/// order, all of length [`dims`](TermEmbedder::dims).
pub trait TermEmbedder: Send + Sync {
    /// Returns the model identifier (e.g. `"all-minilm-l6-v2"`).
    fn model_name(&self) -> &str;
    /// Returns the embedding vector dimensionality (e.g. `384`).
    fn dims(&self) -> usize;

    /// Embed a batch of texts.
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single text.
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        self.encode_batch(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("Empty embedding response"))
    }

    /// Similarity between two vectors produced by this embedder.
    fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        cosine_similarity(a, b)
    }
}

impl<E: TermEmbedder + ?Sized> TermEmbedder for Box<E> {
    fn model_name(&self) -> &str {
        (**self).model_name()
    }
    fn dims(&self) -> usize {
        (**self).dims()
    }
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        (**self).encode_batch(texts)
    }
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        (**self).encode(text)
    }
    fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        (**self).similarity(a, b)
    }
}

/// Semantic similarity between `term` and `class_name`.
///
/// Both strings are encoded independently; the result is the embedder's
/// similarity of the two vectors (cosine unless overridden).
pub fn semantic_similarity<E: TermEmbedder + ?Sized>(
    embedder: &E,
    term: &str,
    class_name: &str,
) -> Result<f64> {
    let term_vec = embedder.encode(term)?;
    let class_vec = embedder.encode(class_name)?;
    Ok(embedder.similarity(&term_vec, &class_vec) as f64)
}

/// Compute cosine similarity between two embedding vectors.
///
/// Returns a value in `[-1.0, 1.0]`:
/// - `1.0` = identical direction
/// - `0.0` = orthogonal (unrelated)
/// - `-1.0` = opposite direction
///
/// Returns `0.0` for empty vectors, zero vectors, or vectors of different
/// lengths.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    (dot / denom).clamp(-1.0, 1.0)
}

/// Deterministic embedder using FNV-1a feature hashing.
///
/// Each lowercased word and each character trigram of `#word#` is hashed
/// into one of `dims` buckets with a hash-derived sign, then the vector is
/// L2-normalized. Texts sharing words or word fragments land close together.
/// No model download, no network; useful offline and in tests.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dims: usize,
}

impl HashEmbedder {
    pub fn new(dims: usize) -> Self {
        Self { dims: dims.max(1) }
    }

    fn fnv1a(feature: &str) -> u64 {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in feature.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        hash
    }

    fn add_feature(&self, vec: &mut [f32], feature: &str, weight: f32) {
        let hash = Self::fnv1a(feature);
        let idx = (hash % self.dims as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vec[idx] += sign * weight;
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vec = vec![0.0f32; self.dims];
        for word in text.to_lowercase().split_whitespace() {
            let word: String = word.chars().filter(|c| c.is_alphanumeric()).collect();
            if word.is_empty() {
                continue;
            }
            self.add_feature(&mut vec, &format!("w:{word}"), 1.0);

            let padded: Vec<char> = format!("#{word}#").chars().collect();
            for gram in padded.windows(3) {
                let gram: String = gram.iter().collect();
                self.add_feature(&mut vec, &format!("g:{gram}"), 0.5);
            }
        }

        let norm = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for x in &mut vec {
                *x /= norm;
            }
        }
        vec
    }
}

impl TermEmbedder for HashEmbedder {
    fn model_name(&self) -> &str {
        "fnv-hash"
    }
    fn dims(&self) -> usize {
        self.dims
    }
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}
