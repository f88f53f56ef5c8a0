//! Text embedding providers
//!
//! Profiles are turned into fixed-length vectors before scoring. The
//! production provider runs the pretrained `all-MiniLM-L6-v2` model locally
//! (cargo feature `local-model`); [`HashingEmbedder`] is a deterministic,
//! model-free provider for tests, benchmarks and offline runs.

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::EmbeddingSettings;

/// Output dimension of all-MiniLM-L6-v2
pub const MINILM_DIMENSIONS: usize = 384;
pub const MINILM_MODEL_NAME: &str = "all-MiniLM-L6-v2";

/// Errors that can occur while producing embeddings
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Embedding model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Embedding inference failed: {0}")]
    Inference(String),
}

/// Turns text into a fixed-length vector
///
/// Implementations must be deterministic for identical input and accept the
/// empty string.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    fn dimensions(&self) -> usize;

    fn model_name(&self) -> &str;
}

/// Which provider to construct at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// Pretrained all-MiniLM-L6-v2 via ONNX Runtime
    MiniLm,
    /// Signed feature hashing over word tokens
    Hashing,
}

/// Build the configured embedder, wrapped in a cache when one is configured
///
/// A model that cannot be loaded is fatal; there is no fallback provider.
pub fn build_embedder(settings: &EmbeddingSettings) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    let inner: Arc<dyn Embedder> = match settings.provider {
        EmbeddingProvider::MiniLm => Arc::new(MiniLmEmbedder::new(settings)?),
        EmbeddingProvider::Hashing => Arc::new(HashingEmbedder::new(settings.dimensions)),
    };

    info!(
        model = inner.model_name(),
        dimensions = inner.dimensions(),
        "Embedding provider ready"
    );

    match settings.cache_size {
        Some(size) if size > 0 => Ok(Arc::new(CachedEmbedder::new(inner, size))),
        _ => Ok(inner),
    }
}

// ---------------------------------------------------------------------------
// Pretrained model
// ---------------------------------------------------------------------------

#[cfg(feature = "local-model")]
pub struct MiniLmEmbedder {
    model: std::sync::Mutex<fastembed::TextEmbedding>,
}

#[cfg(feature = "local-model")]
impl MiniLmEmbedder {
    /// Load the model, downloading it into the cache directory on first use
    pub fn new(settings: &EmbeddingSettings) -> Result<Self, EmbeddingError> {
        use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

        info!(
            model = MINILM_MODEL_NAME,
            cache_dir = ?settings.cache_dir,
            "Loading embedding model"
        );

        let mut options = InitOptions::default();
        options.model_name = EmbeddingModel::AllMiniLML6V2;
        options.show_download_progress = settings.show_download_progress;
        if let Some(dir) = &settings.cache_dir {
            options.cache_dir = dir.clone();
        }

        let model = TextEmbedding::try_new(options)
            .map_err(|e| EmbeddingError::ModelUnavailable(e.to_string()))?;

        Ok(Self {
            model: std::sync::Mutex::new(model),
        })
    }
}

#[cfg(feature = "local-model")]
impl Embedder for MiniLmEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut model = self
            .model
            .lock()
            .map_err(|e| EmbeddingError::Inference(format!("Model lock poisoned: {}", e)))?;

        let mut embeddings = model
            .embed(vec![text], None)
            .map_err(|e| EmbeddingError::Inference(e.to_string()))?;

        let embedding = embeddings
            .pop()
            .ok_or_else(|| EmbeddingError::Inference("No embedding returned".to_string()))?;

        if embedding.len() != MINILM_DIMENSIONS {
            return Err(EmbeddingError::Inference(format!(
                "Expected {} dimensions, got {}",
                MINILM_DIMENSIONS,
                embedding.len()
            )));
        }

        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        MINILM_DIMENSIONS
    }

    fn model_name(&self) -> &str {
        MINILM_MODEL_NAME
    }
}

/// Stand-in used when the crate is built without `local-model`
#[cfg(not(feature = "local-model"))]
pub struct MiniLmEmbedder;

#[cfg(not(feature = "local-model"))]
impl MiniLmEmbedder {
    pub fn new(_settings: &EmbeddingSettings) -> Result<Self, EmbeddingError> {
        Err(EmbeddingError::ModelUnavailable(format!(
            "{} requires a build with `--features local-model`; \
             set embedding.provider = \"hashing\" to run without it",
            MINILM_MODEL_NAME
        )))
    }
}

#[cfg(not(feature = "local-model"))]
impl Embedder for MiniLmEmbedder {
    fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::ModelUnavailable(MINILM_MODEL_NAME.to_string()))
    }

    fn dimensions(&self) -> usize {
        MINILM_DIMENSIONS
    }

    fn model_name(&self) -> &str {
        MINILM_MODEL_NAME
    }
}

// ---------------------------------------------------------------------------
// Feature hashing
// ---------------------------------------------------------------------------

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Deterministic bag-of-words embedder
///
/// Each lowercase alphanumeric token is hashed (FNV-1a) into one of
/// `dimensions` buckets with a hash-derived sign, and the result is
/// L2-normalized. Text without tokens maps to the zero vector.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn fnv1a(token: &str) -> u64 {
        token.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
        })
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(MINILM_DIMENSIONS)
    }
}

impl Embedder for HashingEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vector = vec![0.0_f32; self.dimensions];

        let lowered = text.to_lowercase();
        for token in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = Self::fnv1a(token);
            let bucket = (hash % self.dimensions as u64) as usize;
            let sign = if (hash >> 63) == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        "feature-hashing"
    }
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// In-process cache in front of another embedder, keyed by input text
pub struct CachedEmbedder {
    inner: Arc<dyn Embedder>,
    cache: moka::sync::Cache<String, Arc<Vec<f32>>>,
}

impl CachedEmbedder {
    pub fn new(inner: Arc<dyn Embedder>, capacity: u64) -> Self {
        Self {
            inner,
            cache: moka::sync::Cache::new(capacity),
        }
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}

impl Embedder for CachedEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if let Some(hit) = self.cache.get(text) {
            debug!(text_len = text.len(), "Embedding cache hit");
            return Ok(hit.as_ref().clone());
        }

        let embedding = self.inner.embed(text)?;
        self.cache.insert(text.to_string(), Arc::new(embedding.clone()));
        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
