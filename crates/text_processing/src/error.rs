use thiserror::Error;

/// Text processing errors
#[derive(Error, Debug)]
pub enum TextProcessingError {
    #[error("Translation failed: {0}")]
    Translation(String),

    #[error("Translation service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Malformed translation response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for TextProcessingError {
    fn from(err: reqwest::Error) -> Self {
        TextProcessingError::Translation(err.to_string())
    }
}

impl From<TextProcessingError> for query_router_core::Error {
    fn from(err: TextProcessingError) -> Self {
        match err {
            TextProcessingError::Configuration(msg) => query_router_core::Error::Config(msg),
            other => query_router_core::Error::Translation(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, TextProcessingError>;
