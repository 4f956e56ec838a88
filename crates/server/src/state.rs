//! Application State
//!
//! Shared state across all handlers. Collaborators are built once here and
//! injected into the orchestrator and the ingestor.

use std::sync::Arc;

use query_router_agent::ResponseOrchestrator;
use query_router_config::Settings;
use query_router_core::Language;
use query_router_llm::create_completion_service;
use query_router_rag::{KnowledgeBaseRouter, KnowledgeIngestor};
use query_router_text_processing::{create_translator, WhatlangDetector};

use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Settings, immutable after startup
    pub config: Arc<Settings>,
    pub orchestrator: Arc<ResponseOrchestrator>,
    pub ingestor: Arc<KnowledgeIngestor>,
}

impl AppState {
    pub fn new(config: Settings, orchestrator: ResponseOrchestrator, ingestor: KnowledgeIngestor) -> Self {
        Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
            ingestor: Arc::new(ingestor),
        }
    }

    /// Connect every collaborator described by `config`
    ///
    /// A missing completion or translation service only disables that
    /// feature; an unreachable vector store is an error.
    pub async fn from_settings(config: Settings) -> Result<Self, ServerError> {
        let router = KnowledgeBaseRouter::from_settings(&config)
            .await
            .map_err(|e| ServerError::Startup(e.to_string()))?;
        let router = Arc::new(router);

        let completion = match create_completion_service(&config.llm) {
            Ok(service) => Some(service),
            Err(e) => {
                tracing::warn!(error = %e, "Completion service unavailable, generation tier disabled");
                None
            },
        };
        let translator = create_translator(&config.translation);

        let orchestrator = ResponseOrchestrator::new(
            &config.routing,
            router.clone(),
            completion,
            translator,
            Arc::new(WhatlangDetector::new()),
        );
        let ingestor = KnowledgeIngestor::new(router, config.ingestion.clone());

        Ok(Self::new(config, orchestrator, ingestor))
    }

    /// Language served by the primary partition
    pub fn primary_language(&self) -> Language {
        self.config.routing.primary_language()
    }
}
