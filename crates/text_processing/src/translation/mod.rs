//! Translation collaborators
//!
//! Used by the output enforcer to bring answers into the target language.

mod google;
mod noop;

pub use google::{GoogleTranslator, GoogleTranslatorConfig};
pub use noop::NoopTranslator;

use query_router_config::{TranslationProvider, TranslationSettings};
use query_router_core::Translator;
use std::sync::Arc;
use std::time::Duration;

/// Create translator based on config
///
/// Returns `None` when translation is disabled or no API key is configured;
/// the enforcer then treats translation as unavailable.
pub fn create_translator(config: &TranslationSettings) -> Option<Arc<dyn Translator>> {
    match config.provider {
        TranslationProvider::Google => {
            let Some(api_key) = config.api_key.clone().filter(|k| !k.trim().is_empty()) else {
                tracing::warn!("Google Translate API key not configured, translation disabled");
                return None;
            };

            let google_config = GoogleTranslatorConfig {
                endpoint: config.endpoint.clone(),
                api_key,
                timeout: Duration::from_secs(config.timeout_seconds),
            };

            match GoogleTranslator::new(google_config) {
                Ok(translator) => {
                    tracing::info!(endpoint = %config.endpoint, "Using Google translator");
                    Some(Arc::new(translator))
                },
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to build Google translator, translation disabled");
                    None
                },
            }
        },
        TranslationProvider::Disabled => {
            tracing::info!("Translation disabled");
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_provider() {
        let config = TranslationSettings {
            provider: TranslationProvider::Disabled,
            api_key: Some("key".to_string()),
            ..Default::default()
        };
        assert!(create_translator(&config).is_none());
    }

    #[test]
    fn test_missing_key_disables() {
        let config = TranslationSettings {
            provider: TranslationProvider::Google,
            api_key: None,
            ..Default::default()
        };
        assert!(create_translator(&config).is_none());

        let config = TranslationSettings {
            api_key: Some("   ".to_string()),
            ..config
        };
        assert!(create_translator(&config).is_none());
    }

    #[test]
    fn test_google_with_key() {
        let config = TranslationSettings {
            provider: TranslationProvider::Google,
            api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        let translator = create_translator(&config).unwrap();
        assert_eq!(translator.name(), "google");
    }
}
