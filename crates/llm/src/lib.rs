//! LLM integration
//!
//! Features:
//! - OpenAI-compatible chat completion backend (Groq by default)
//! - Generation tier: language-pinned system prompt, sentinel rejection

pub mod backend;
pub mod generation;

pub use backend::{create_completion_service, OpenAiCompatibleBackend, OpenAiCompatibleConfig};
pub use generation::{system_prompt, GenerationTier};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for query_router_core::Error {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Configuration(msg) => query_router_core::Error::Config(msg),
            other => query_router_core::Error::Llm(other.to_string()),
        }
    }
}
