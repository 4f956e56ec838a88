//! Text processing traits

use async_trait::async_trait;

use crate::{Language, Result};

/// Translation interface
///
/// Implementations:
/// - `GoogleTranslator` - Google Cloud Translation v2 over HTTP
/// - `NoopTranslator` - Pass-through
///
/// Translating text that is already in `target` should return it unchanged
/// or near-unchanged.
///
/// # Example
///
/// ```ignore
/// let translator: Arc<dyn Translator> = Arc::new(GoogleTranslator::new(config)?);
/// let arabic = translator.translate("Go to Orders > New.", Language::Arabic).await?;
/// ```
#[async_trait]
pub trait Translator: Send + Sync + 'static {
    /// Translate text into `target`
    async fn translate(&self, text: &str, target: Language) -> Result<String>;

    /// Get translator name
    fn name(&self) -> &str;
}

/// Statistical language identification
///
/// Must be deterministic: the same input always yields the same answer.
/// `None` means the detector could not decide.
pub trait LanguageDetector: Send + Sync + 'static {
    fn detect(&self, text: &str) -> Option<Language>;
}
