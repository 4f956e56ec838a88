//! Output language enforcement
//!
//! Makes sure a final answer is in the configured target language. Text that
//! already carries the target script, or that the detector recognises as the
//! target language, passes through untouched; everything else is handed to the
//! translator. Translation problems never escape: the original text is
//! returned instead.

use std::sync::Arc;
use std::time::Duration;

use query_router_core::{with_deadline, Language, LanguageDetector, Translator};

const DEFAULT_TRANSLATION_TIMEOUT: Duration = Duration::from_secs(15);

/// Output language enforcer
#[derive(Clone)]
pub struct OutputLanguageEnforcer {
    enabled: bool,
    target: Language,
    detector: Arc<dyn LanguageDetector>,
    translator: Option<Arc<dyn Translator>>,
    timeout: Duration,
}

impl OutputLanguageEnforcer {
    pub fn new(
        enabled: bool,
        target: Language,
        detector: Arc<dyn LanguageDetector>,
        translator: Option<Arc<dyn Translator>>,
    ) -> Self {
        Self {
            enabled,
            target,
            detector,
            translator,
            timeout: DEFAULT_TRANSLATION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn target(&self) -> Language {
        self.target
    }

    /// Enforce using the configured flag
    pub async fn enforce(&self, text: &str) -> String {
        self.enforce_with(text, self.enabled).await
    }

    /// Enforce with an explicit flag; `force_target = false` is the identity
    pub async fn enforce_with(&self, text: &str, force_target: bool) -> String {
        if !force_target || text.trim().is_empty() {
            return text.to_string();
        }

        if self.target.script().appears_in(text) {
            return text.to_string();
        }

        if self.detector.detect(text) == Some(self.target) {
            return text.to_string();
        }

        let Some(translator) = self.translator.as_ref() else {
            tracing::debug!(target_language = %self.target, "Translator not configured, returning original text");
            return text.to_string();
        };

        match with_deadline(self.timeout, translator.translate(text, self.target)).await {
            Ok(translated) if !translated.trim().is_empty() => {
                tracing::debug!(
                    translator = translator.name(),
                    target_language = %self.target,
                    "Translated answer"
                );
                translated
            },
            Ok(_) => {
                tracing::warn!(translator = translator.name(), "Translator returned empty text");
                text.to_string()
            },
            Err(e) => {
                tracing::warn!(
                    translator = translator.name(),
                    error = %e,
                    "Translation failed, returning original text"
                );
                text.to_string()
            },
        }
    }
}

impl std::fmt::Debug for OutputLanguageEnforcer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputLanguageEnforcer")
            .field("enabled", &self.enabled)
            .field("target", &self.target)
            .field("translator", &self.translator.as_ref().map(|t| t.name().to_string()))
            .field("timeout", &self.timeout)
            .finish()
    }
}
