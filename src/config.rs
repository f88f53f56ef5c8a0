use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::embedding::{EmbeddingProvider, MINILM_DIMENSIONS};
use crate::models::MatchWeights;

const ENV_PREFIX: &str = "INTELLIBRIDGE";

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub embedding: EmbeddingSettings,
    #[serde(default)]
    pub feedback: FeedbackSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub data: DataSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingSettings {
    #[serde(default = "default_provider")]
    pub provider: EmbeddingProvider,
    /// Vector length for the hashing provider; the pretrained model is fixed at 384
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
    /// Cached embeddings kept in memory; `0` disables the cache
    #[serde(default = "default_embedding_cache_size")]
    pub cache_size: Option<u64>,
    /// Where downloaded model files are kept
    pub cache_dir: Option<PathBuf>,
    #[serde(default)]
    pub show_download_progress: bool,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            dimensions: default_dimensions(),
            cache_size: default_embedding_cache_size(),
            cache_dir: None,
            show_download_progress: false,
        }
    }
}

fn default_provider() -> EmbeddingProvider { EmbeddingProvider::MiniLm }
fn default_dimensions() -> usize { MINILM_DIMENSIONS }
fn default_embedding_cache_size() -> Option<u64> { Some(1024) }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackBackendKind {
    File,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackSettings {
    #[serde(default = "default_feedback_path")]
    pub path: PathBuf,
    #[serde(default = "default_feedback_backend")]
    pub backend: FeedbackBackendKind,
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self {
            path: default_feedback_path(),
            backend: default_feedback_backend(),
        }
    }
}

fn default_feedback_path() -> PathBuf { PathBuf::from("match_feedback.json") }
fn default_feedback_backend() -> FeedbackBackendKind { FeedbackBackendKind::File }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_skill_similarity_weight")]
    pub skill_similarity: f64,
    #[serde(default = "default_complementarity_weight")]
    pub complementarity: f64,
    #[serde(default = "default_domain_alignment_weight")]
    pub domain_alignment: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            skill_similarity: default_skill_similarity_weight(),
            complementarity: default_complementarity_weight(),
            domain_alignment: default_domain_alignment_weight(),
        }
    }
}

impl From<WeightsConfig> for MatchWeights {
    fn from(config: WeightsConfig) -> Self {
        Self {
            skill_similarity: config.skill_similarity,
            complementarity: config.complementarity,
            domain_alignment: config.domain_alignment,
        }
    }
}

fn default_skill_similarity_weight() -> f64 { 0.4 }
fn default_complementarity_weight() -> f64 { 0.4 }
fn default_domain_alignment_weight() -> f64 { 0.2 }

#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_sample_path")]
    pub sample_path: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            sample_path: default_sample_path(),
        }
    }
}

fn default_sample_path() -> PathBuf { PathBuf::from("data/sample_data.json") }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration files (config/default.toml, then config/local.toml)
    /// 3. Environment variables (prefixed with INTELLIBRIDGE__)
    /// 4. FEEDBACK_FILE and FASTEMBED_CACHE_DIR
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., INTELLIBRIDGE__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        apply_env_overrides(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        apply_env_overrides(settings)?.try_deserialize()
    }

    pub fn default_weights(&self) -> MatchWeights {
        self.matching.weights.into()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Short-form variables that predate the prefixed scheme and win over it
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(path) = env::var("FEEDBACK_FILE") {
        builder = builder.set_override("feedback.path", path)?;
    }
    if let Ok(dir) = env::var("FASTEMBED_CACHE_DIR") {
        builder = builder.set_override("embedding.cache_dir", dir)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.skill_similarity, 0.4);
        assert_eq!(weights.complementarity, 0.4);
        assert_eq!(weights.domain_alignment, 0.2);
        assert_eq!(MatchWeights::from(weights), MatchWeights::default());
    }

    #[test]
    fn test_default_embedding() {
        let embedding = EmbeddingSettings::default();
        assert_eq!(embedding.provider, EmbeddingProvider::MiniLm);
        assert_eq!(embedding.dimensions, 384);
        assert_eq!(embedding.cache_size, Some(1024));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 9000

[embedding]
provider = "hashing"
dimensions = 64

[feedback]
backend = "memory"

[matching.weights]
skill_similarity = 0.5
"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.embedding.provider, EmbeddingProvider::Hashing);
        assert_eq!(settings.embedding.dimensions, 64);
        assert_eq!(settings.feedback.backend, FeedbackBackendKind::Memory);
        assert_eq!(settings.matching.weights.skill_similarity, 0.5);
        assert_eq!(settings.matching.weights.complementarity, 0.4);
        assert_eq!(settings.data.sample_path, PathBuf::from("data/sample_data.json"));
    }

    #[test]
    fn test_bundled_default_config() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/default.toml");
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.embedding.provider, EmbeddingProvider::MiniLm);
        assert_eq!(settings.default_weights(), MatchWeights::default());

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("--features local-model"));
    }
}
