//! Configuration management for the query router
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default`, `config/{env}`)
//! - Environment variables (QUERY_ROUTER_ prefix, `__` separator)
//!
//! The routing policy (partitions, fan-out, enforcement, fallback contact)
//! is loaded once at startup and never mutated afterwards.

pub mod routing;
pub mod settings;

pub use routing::{PartitionConfig, RoutingPolicy};
pub use settings::{
    load_settings, load_settings_from, EmbeddingConfig, EmbeddingProvider, IngestionConfig, LlmSettings,
    ObservabilityConfig, ServerConfig, Settings, TranslationProvider, TranslationSettings,
    VectorStoreBackend, VectorStoreSettings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for query_router_core::Error {
    fn from(err: ConfigError) -> Self {
        query_router_core::Error::Config(err.to_string())
    }
}
