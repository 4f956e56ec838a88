//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, RoutingPolicy};

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Routing policy (partitions, fan-out, enforcement)
    #[serde(default)]
    pub routing: RoutingPolicy,

    /// Vector store connection
    #[serde(default)]
    pub vector_store: VectorStoreSettings,

    /// Embedding collaborator
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Completion collaborator
    #[serde(default)]
    pub llm: LlmSettings,

    /// Translation collaborator
    #[serde(default)]
    pub translation: TranslationSettings,

    /// Question/answer sheet ingestion
    #[serde(default)]
    pub ingestion: IngestionConfig,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.routing.validate()?;
        self.validate_server()?;
        self.validate_vector_store()?;
        self.validate_llm()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port must be non-zero".to_string(),
            });
        }

        if self.server.request_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.request_timeout_seconds".to_string(),
                message: "Timeout must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    fn validate_vector_store(&self) -> Result<(), ConfigError> {
        if self.vector_store.vector_dim == 0 {
            return Err(ConfigError::InvalidValue {
                field: "vector_store.vector_dim".to_string(),
                message: "Vector dimension must be greater than zero".to_string(),
            });
        }

        if self.vector_store.backend == VectorStoreBackend::Qdrant
            && self.vector_store.endpoint.trim().is_empty()
        {
            return Err(ConfigError::MissingField("vector_store.endpoint".to_string()));
        }

        Ok(())
    }

    fn validate_llm(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature".to_string(),
                message: format!("Must be between 0.0 and 2.0, got {}", self.llm.temperature),
            });
        }

        if self.llm.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.max_tokens".to_string(),
                message: "Must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins (empty allows any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

/// Vector store backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VectorStoreBackend {
    /// Qdrant, one collection per partition
    #[default]
    Qdrant,
    /// In-process store (development and tests)
    Memory,
}

/// Vector store connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreSettings {
    #[serde(default)]
    pub backend: VectorStoreBackend,

    /// Qdrant endpoint
    #[serde(default = "default_qdrant_endpoint")]
    pub endpoint: String,

    /// Qdrant API key (optional)
    #[serde(default = "default_qdrant_api_key")]
    pub api_key: Option<String>,

    /// Embedding dimension of stored vectors
    #[serde(default = "default_vector_dim")]
    pub vector_dim: usize,
}

fn default_qdrant_endpoint() -> String {
    "http://localhost:6334".to_string()
}

fn default_qdrant_api_key() -> Option<String> {
    std::env::var("QDRANT_API_KEY").ok().filter(|k| !k.is_empty())
}

fn default_vector_dim() -> usize {
    768
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            backend: VectorStoreBackend::default(),
            endpoint: default_qdrant_endpoint(),
            api_key: default_qdrant_api_key(),
            vector_dim: default_vector_dim(),
        }
    }
}

/// Embedding providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// Ollama `/api/embed`
    #[default]
    Ollama,
    /// Deterministic hash embedding (tests, offline development)
    Hash,
}

/// Embedding collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub provider: EmbeddingProvider,

    #[serde(default = "default_embedding_endpoint")]
    pub endpoint: String,

    /// Multilingual sentence embedding model
    #[serde(default = "default_embedding_model")]
    pub model: String,
}

fn default_embedding_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_embedding_model() -> String {
    "paraphrase-multilingual".to_string()
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::default(),
            endpoint: default_embedding_endpoint(),
            model: default_embedding_model(),
        }
    }
}

/// Completion collaborator configuration (OpenAI-compatible API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_llm_api_key")]
    pub api_key: Option<String>,

    #[serde(default = "default_llm_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// HTTP client timeout
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u64,
}

fn default_llm_endpoint() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_llm_api_key() -> Option<String> {
    std::env::var("GROQ_API_KEY").ok().filter(|k| !k.is_empty())
}

fn default_llm_model() -> String {
    "llama-3.1-70b-versatile".to_string()
}

fn default_max_tokens() -> usize {
    512
}

fn default_temperature() -> f32 {
    0.2
}

fn default_llm_timeout() -> u64 {
    30
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            api_key: default_llm_api_key(),
            model: default_llm_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_seconds: default_llm_timeout(),
        }
    }
}

/// Translation providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    /// Google Cloud Translation v2
    #[default]
    Google,
    /// Disabled (enforcer passes text through)
    Disabled,
}

/// Translation collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationSettings {
    #[serde(default)]
    pub provider: TranslationProvider,

    #[serde(default = "default_translation_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_translation_api_key")]
    pub api_key: Option<String>,

    #[serde(default = "default_translation_timeout")]
    pub timeout_seconds: u64,
}

fn default_translation_endpoint() -> String {
    "https://translation.googleapis.com/language/translate/v2".to_string()
}

fn default_translation_api_key() -> Option<String> {
    std::env::var("GOOGLE_TRANSLATE_API_KEY").ok().filter(|k| !k.is_empty())
}

fn default_translation_timeout() -> u64 {
    15
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            endpoint: default_translation_endpoint(),
            api_key: default_translation_api_key(),
            timeout_seconds: default_translation_timeout(),
        }
    }
}

/// Column names of the question/answer sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    #[serde(default = "default_question_column")]
    pub question_column: String,

    #[serde(default = "default_answer_column")]
    pub answer_column: String,
}

fn default_question_column() -> String {
    "Question".to_string()
}

fn default_answer_column() -> String {
    "Answer".to_string()
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            question_column: default_question_column(),
            answer_column: default_answer_column(),
        }
    }
}

/// Load settings from files and environment
///
/// Priority: env vars > config/{env} > config/default > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from("config", env)
}

/// Same as [`load_settings`] but reading files from `dir`
pub fn load_settings_from(dir: &str, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    builder = builder.add_source(File::with_name(&format!("{}/default", dir)).required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        builder = builder.add_source(File::with_name(&format!("{}/{}", dir, env_name)).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("QUERY_ROUTER")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    // Validate
    settings.validate()?;

    Ok(settings)
}
