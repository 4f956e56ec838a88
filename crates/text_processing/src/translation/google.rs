//! Google Cloud Translation v2 client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use query_router_core::{Language, Translator};

use crate::{Result, TextProcessingError};

/// Google translator configuration
#[derive(Debug, Clone)]
pub struct GoogleTranslatorConfig {
    /// `.../language/translate/v2`
    pub endpoint: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl Default for GoogleTranslatorConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://translation.googleapis.com/language/translate/v2".to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(15),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

/// Extract `data.translations[0].translatedText`
fn parse_response(body: &str) -> Result<String> {
    let response: TranslateResponse = serde_json::from_str(body)
        .map_err(|e| TextProcessingError::InvalidResponse(e.to_string()))?;

    response
        .data
        .translations
        .into_iter()
        .next()
        .map(|t| t.translated_text)
        .ok_or_else(|| TextProcessingError::InvalidResponse("No translations in response".to_string()))
}

/// Google Cloud Translation v2 translator
pub struct GoogleTranslator {
    client: Client,
    config: GoogleTranslatorConfig,
}

impl GoogleTranslator {
    pub fn new(config: GoogleTranslatorConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(TextProcessingError::Configuration(
                "Google Translate API key required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TextProcessingError::Configuration(e.to_string()))?;

        Ok(Self { client, config })
    }

    async fn request(&self, text: &str, target: Language) -> Result<String> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .query(&[("key", self.config.api_key.as_str())])
            .form(&[("q", text), ("target", target.code()), ("format", "text")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if status == reqwest::StatusCode::FORBIDDEN {
                tracing::warn!("Google Translate API key may be invalid or disabled");
            }
            return Err(TextProcessingError::Http {
                status: status.as_u16(),
                body,
            });
        }

        parse_response(&body)
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target: Language) -> query_router_core::Result<String> {
        if text.is_empty() {
            return Ok(String::new());
        }
        Ok(self.request(text, target).await?)
    }

    fn name(&self) -> &str {
        "google"
    }
}
