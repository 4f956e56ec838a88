//! Response orchestrator
//!
//! Collaborators (partition stores, completion, translation, detection) are
//! constructed once at startup and passed in; the orchestrator itself holds
//! no mutable state and can serve concurrent requests.

use serde::Serialize;
use std::sync::Arc;

use query_router_config::RoutingPolicy;
use query_router_core::{CandidateAnswer, CompletionService, Language, LanguageDetector, Tier, Translator};
use query_router_llm::GenerationTier;
use query_router_rag::{DebugHit, KnowledgeBaseRouter, RetrievalTier};
use query_router_text_processing::{FastPathMatcher, FastPathTable, LanguageClassifier, OutputLanguageEnforcer};

/// Final answer for one query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutedResponse {
    /// Text returned to the user
    pub text: String,
    /// Tier that produced the answer
    pub tier: Tier,
    /// Classified language (absent on fast-path hits)
    pub language: Option<Language>,
    /// Partition searched, if retrieval ran
    pub partition: Option<String>,
    /// Similarity score of the accepted hit
    pub score: Option<f32>,
}

/// Response orchestrator
pub struct ResponseOrchestrator {
    fast_path: FastPathMatcher,
    classifier: LanguageClassifier,
    retrieval: RetrievalTier,
    generation: Option<GenerationTier>,
    enforcer: OutputLanguageEnforcer,
    force_target_language: bool,
    fallback_message: String,
    debug_top_k: usize,
}

impl ResponseOrchestrator {
    /// Wire the orchestrator from the routing policy and its collaborators
    ///
    /// `completion = None` disables the generation tier; `translator = None`
    /// leaves enforcement without a translation service.
    pub fn new(
        policy: &RoutingPolicy,
        router: Arc<KnowledgeBaseRouter>,
        completion: Option<Arc<dyn CompletionService>>,
        translator: Option<Arc<dyn Translator>>,
        detector: Arc<dyn LanguageDetector>,
    ) -> Self {
        let timeout = policy.call_timeout();

        let classifier = LanguageClassifier::new(
            policy.primary_language(),
            policy.fallback_language(),
            detector.clone(),
        );
        let retrieval = RetrievalTier::new(router, policy.top_k, timeout);
        let generation = completion
            .map(|service| GenerationTier::new(service, policy.generation_sentinel_prefix.clone(), timeout));
        let enforcer = OutputLanguageEnforcer::new(
            policy.force_target_language,
            policy.target_language,
            detector,
            translator,
        )
        .with_timeout(timeout);

        Self {
            fast_path: FastPathMatcher::default(),
            classifier,
            retrieval,
            generation,
            enforcer,
            force_target_language: policy.force_target_language,
            fallback_message: policy.default_fallback_message(),
            debug_top_k: policy.debug_top_k,
        }
    }

    pub fn with_fast_path(mut self, table: FastPathTable) -> Self {
        self.fast_path = FastPathMatcher::new(table);
        self
    }

    /// Override the enforcement flag for this orchestrator
    pub fn with_force_target_language(mut self, force: bool) -> Self {
        self.force_target_language = force;
        self
    }

    pub fn force_target_language(&self) -> bool {
        self.force_target_language
    }

    pub fn classifier(&self) -> &LanguageClassifier {
        &self.classifier
    }

    pub fn router(&self) -> &Arc<KnowledgeBaseRouter> {
        self.retrieval.router()
    }

    pub fn fallback_message(&self) -> &str {
        &self.fallback_message
    }

    /// Answer text for `query`
    pub async fn answer(&self, query: &str) -> String {
        self.respond(query).await.text
    }

    /// Resolve `query` through the tiers; always terminates with an answer
    pub async fn respond(&self, query: &str) -> RoutedResponse {
        if let Some(hit) = self.fast_path.match_query(query) {
            tracing::info!("Fast-path hit");
            return RoutedResponse {
                text: hit.into_reply(),
                tier: Tier::FastPath,
                language: None,
                partition: None,
                score: None,
            };
        }

        let language = self.classifier.classify(query);
        let partition = self.retrieval.router().route(language);
        tracing::info!(language = %language, partition = %partition.id(), "Query routed");

        if let Some(candidate) = self.retrieval.retrieve_from(query, partition).await {
            let partition = Some(partition.id().to_string());
            return self.finish(candidate, partition).await;
        }

        if let Some(generation) = &self.generation {
            if let Some(candidate) = generation.generate(query, language).await {
                return self.finish(candidate, Some(partition.id().to_string())).await;
            }
        } else {
            tracing::debug!("Generation tier not configured");
        }

        tracing::info!(language = %language, "Falling back to default answer");
        let candidate = CandidateAnswer::new(Tier::DefaultFallback, self.fallback_message.clone(), language);
        self.finish(candidate, Some(partition.id().to_string())).await
    }

    async fn finish(&self, candidate: CandidateAnswer, partition: Option<String>) -> RoutedResponse {
        let text = if candidate.tier.is_enforced() {
            self.enforcer
                .enforce_with(&candidate.text, self.force_target_language)
                .await
        } else {
            candidate.text
        };

        RoutedResponse {
            text,
            tier: candidate.tier,
            language: Some(candidate.language),
            partition,
            score: candidate.score,
        }
    }

    /// Ranked hits for `query` from the partition it routes to
    pub async fn debug_search(&self, query: &str, k: Option<usize>) -> Vec<DebugHit> {
        let language = self.classifier.classify(query);
        let k = k.unwrap_or(self.debug_top_k);
        self.retrieval.debug_search(query, language, k).await
    }
}

impl std::fmt::Debug for ResponseOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseOrchestrator")
            .field("classifier", &self.classifier)
            .field("retrieval", &self.retrieval)
            .field("generation", &self.generation)
            .field("enforcer", &self.enforcer)
            .field("force_target_language", &self.force_target_language)
            .finish()
    }
}
