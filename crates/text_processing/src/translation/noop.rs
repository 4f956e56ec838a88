use async_trait::async_trait;
use query_router_core::{Language, Result, Translator};

/// Pass-through translator
#[derive(Debug, Clone, Default)]
pub struct NoopTranslator;

impl NoopTranslator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Translator for NoopTranslator {
    async fn translate(&self, text: &str, _target: Language) -> Result<String> {
        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        "noop"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passthrough() {
        let translator = NoopTranslator::new();
        let out = translator.translate("Go to Orders", Language::Arabic).await.unwrap();
        assert_eq!(out, "Go to Orders");
    }
}
