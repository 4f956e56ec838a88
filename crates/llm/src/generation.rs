//! Generation tier
//!
//! Asked only when retrieval finds nothing. Pins the reply language through
//! the system prompt and rejects empty completions or ones starting with the
//! configured sentinel prefix.

use std::sync::Arc;
use std::time::Duration;

use query_router_core::{with_deadline, CandidateAnswer, CompletionService, Language, Tier};

/// System instruction pinning the reply language
pub fn system_prompt(language: Language) -> String {
    format!("You are a helpful assistant. Reply concisely in {}.", language.name())
}

/// Generation tier
#[derive(Clone)]
pub struct GenerationTier {
    service: Arc<dyn CompletionService>,
    sentinel_prefix: String,
    timeout: Duration,
}

impl GenerationTier {
    pub fn new(service: Arc<dyn CompletionService>, sentinel_prefix: impl Into<String>, timeout: Duration) -> Self {
        Self {
            service,
            sentinel_prefix: sentinel_prefix.into(),
            timeout,
        }
    }

    pub fn sentinel_prefix(&self) -> &str {
        &self.sentinel_prefix
    }

    /// Whether a completion may be returned to the user
    pub fn is_usable(&self, completion: &str) -> bool {
        let trimmed = completion.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.sentinel_prefix.is_empty() || !trimmed.starts_with(&self.sentinel_prefix)
    }

    pub async fn generate(&self, query: &str, language: Language) -> Option<CandidateAnswer> {
        let prompt = system_prompt(language);

        match with_deadline(self.timeout, self.service.complete(&prompt, query)).await {
            Ok(completion) if self.is_usable(&completion) => {
                tracing::info!(
                    model = self.service.model_name(),
                    language = %language,
                    "Generation accepted"
                );
                Some(CandidateAnswer::new(Tier::Generation, completion.trim(), language))
            },
            Ok(completion) => {
                tracing::info!(
                    model = self.service.model_name(),
                    empty = completion.trim().is_empty(),
                    "Generation rejected"
                );
                None
            },
            Err(e) => {
                tracing::warn!(
                    model = self.service.model_name(),
                    error = %e,
                    timed_out = e.is_timeout(),
                    "Completion failed"
                );
                None
            },
        }
    }
}

impl std::fmt::Debug for GenerationTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationTier")
            .field("model", &self.service.model_name())
            .field("sentinel_prefix", &self.sentinel_prefix)
            .field("timeout", &self.timeout)
            .finish()
    }
}
