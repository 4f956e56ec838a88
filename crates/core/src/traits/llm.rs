//! Completion service trait

use async_trait::async_trait;

use crate::Result;

/// Single-turn completion interface
///
/// No conversation state is retained between calls.
///
/// Implementations:
/// - `OpenAiCompatibleBackend` - Groq / OpenAI-style chat completions
#[async_trait]
pub trait CompletionService: Send + Sync + 'static {
    /// Complete `user_text` under `system_prompt`
    async fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String>;

    /// Model identifier, for logging
    fn model_name(&self) -> &str;
}
