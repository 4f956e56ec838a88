//! Retrieval tier
//!
//! Normalizes the query for the routed partition, runs a top-k similarity
//! search and accepts the best hit as is. No score threshold is applied; the
//! score only travels along for logging and diagnostics.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use query_router_core::{with_deadline, CandidateAnswer, Language, Metadata, Tier};
use query_router_text_processing::TextNormalizer;

use crate::{KnowledgeBaseRouter, Partition};

/// Characters of content shown per diagnostic hit
pub const DEBUG_CONTENT_CHARS: usize = 200;

/// One ranked hit from diagnostic search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugHit {
    /// 1-based rank
    pub rank: usize,
    pub score: f32,
    pub language: Language,
    /// Partition table / collection
    pub table: String,
    /// Content, truncated for display
    pub content: String,
    pub metadata: Metadata,
}

fn truncate_content(content: &str) -> String {
    if content.chars().count() > DEBUG_CONTENT_CHARS {
        let head: String = content.chars().take(DEBUG_CONTENT_CHARS).collect();
        format!("{}...", head)
    } else {
        content.to_string()
    }
}

/// Retrieval tier
#[derive(Debug, Clone)]
pub struct RetrievalTier {
    router: Arc<KnowledgeBaseRouter>,
    normalizer: TextNormalizer,
    top_k: usize,
    timeout: Duration,
}

impl RetrievalTier {
    pub fn new(router: Arc<KnowledgeBaseRouter>, top_k: usize, timeout: Duration) -> Self {
        Self {
            router,
            normalizer: TextNormalizer::default(),
            top_k: top_k.max(1),
            timeout,
        }
    }

    pub fn with_normalizer(mut self, normalizer: TextNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn router(&self) -> &Arc<KnowledgeBaseRouter> {
        &self.router
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Route by `language` and retrieve
    pub async fn retrieve(&self, query: &str, language: Language) -> Option<CandidateAnswer> {
        let partition = self.router.route(language);
        self.retrieve_from(query, partition).await
    }

    /// Retrieve from an explicit partition
    pub async fn retrieve_from(&self, query: &str, partition: &Partition) -> Option<CandidateAnswer> {
        let normalized = self.normalizer.normalize(query, partition.language());

        let search = partition.store().similarity_search(&normalized, self.top_k);
        match with_deadline(self.timeout, search).await {
            Ok(hits) => match hits.into_iter().next() {
                Some(hit) => {
                    tracing::info!(
                        partition = %partition.id(),
                        score = hit.score,
                        "Retrieval hit"
                    );
                    Some(
                        CandidateAnswer::new(Tier::Retrieval, hit.content, partition.language())
                            .with_score(hit.score),
                    )
                },
                None => {
                    tracing::info!(partition = %partition.id(), "Retrieval returned no documents");
                    None
                },
            },
            Err(e) => {
                tracing::warn!(
                    partition = %partition.id(),
                    error = %e,
                    timed_out = e.is_timeout(),
                    "Similarity search failed"
                );
                None
            },
        }
    }

    /// Ranked hits for diagnostics; errors yield an empty list
    pub async fn debug_search(&self, query: &str, language: Language, k: usize) -> Vec<DebugHit> {
        let partition = self.router.route(language);
        let normalized = self.normalizer.normalize(query, partition.language());

        let search = partition.store().similarity_search(&normalized, k.max(1));
        match with_deadline(self.timeout, search).await {
            Ok(hits) => hits
                .into_iter()
                .enumerate()
                .map(|(i, hit)| DebugHit {
                    rank: i + 1,
                    score: hit.score,
                    language: partition.language(),
                    table: partition.id().to_string(),
                    content: truncate_content(&hit.content),
                    metadata: hit.metadata,
                })
                .collect(),
            Err(e) => {
                tracing::warn!(partition = %partition.id(), error = %e, "Debug search failed");
                Vec::new()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use query_router_config::RoutingPolicy;
    use query_router_core::{Error, PartitionStore, Result, SearchHit};

    /// Store returning scripted hits and recording queries
    struct ScriptedStore {
        name: String,
        hits: Vec<SearchHit>,
        fail: bool,
        delay: Option<Duration>,
        queries: Mutex<Vec<(String, usize)>>,
    }

    impl ScriptedStore {
        fn new(name: &str, hits: Vec<SearchHit>) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                hits,
                fail: false,
                delay: None,
                queries: Mutex::new(Vec::new()),
            })
        }

        fn failing(name: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                hits: Vec::new(),
                fail: true,
                delay: None,
                queries: Mutex::new(Vec::new()),
            })
        }

        fn slow(name: &str, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                hits: vec![SearchHit::new("late", 0.9)],
                fail: false,
                delay: Some(delay),
                queries: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl PartitionStore for ScriptedStore {
        async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
            self.queries.lock().push((query.to_string(), k));
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(Error::VectorStore("connection refused".to_string()));
            }
            Ok(self.hits.iter().take(k).cloned().collect())
        }

        async fn add_texts(&self, texts: &[String], _metadatas: &[Metadata]) -> Result<usize> {
            Ok(texts.len())
        }

        async fn count(&self) -> Result<u64> {
            Ok(self.hits.len() as u64)
        }

        async fn clear(&self) -> Result<u64> {
            Ok(0)
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    fn tier(primary: Arc<ScriptedStore>, fallback: Arc<ScriptedStore>, top_k: usize) -> RetrievalTier {
        let router =
            KnowledgeBaseRouter::from_policy(&RoutingPolicy::default(), primary, fallback).unwrap();
        RetrievalTier::new(Arc::new(router), top_k, Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_accepts_top_hit_without_threshold() {
        let content = "Q: How to create a purchase order?\nA: Go to Orders > New.";
        let primary = ScriptedStore::new(
            "documents",
            vec![SearchHit::new(content, 0.01), SearchHit::new("second", 0.005)],
        );
        let fallback = ScriptedStore::new("arabic_documents", vec![]);
        let tier = tier(primary.clone(), fallback.clone(), 1);

        let answer = tier
            .retrieve("How to create a purchase order?", Language::English)
            .await
            .unwrap();

        assert_eq!(answer.tier, Tier::Retrieval);
        assert_eq!(answer.text, content);
        assert_eq!(answer.score, Some(0.01));
        assert_eq!(answer.language, Language::English);
        assert_eq!(primary.queries.lock()[0].1, 1);
        assert!(fallback.queries.lock().is_empty());
    }

    #[tokio::test]
    async fn test_fallback_query_is_normalized_and_exclusive() {
        let primary = ScriptedStore::new("documents", vec![SearchHit::new("english", 0.9)]);
        let fallback = ScriptedStore::new("arabic_documents", vec![SearchHit::new("عربي", 0.8)]);
        let tier = tier(primary.clone(), fallback.clone(), 1);

        let answer = tier.retrieve("كـيـف أضيف منتج", Language::Arabic).await.unwrap();

        assert_eq!(answer.text, "عربي");
        assert!(primary.queries.lock().is_empty());
        assert_eq!(fallback.queries.lock()[0].0, "كيف ءضيف منتج");
    }

    #[tokio::test]
    async fn test_empty_result_yields_nothing() {
        let tier = tier(
            ScriptedStore::new("documents", vec![]),
            ScriptedStore::new("arabic_documents", vec![]),
            1,
        );
        assert!(tier.retrieve("unknown topic", Language::English).await.is_none());
    }

    #[tokio::test]
    async fn test_store_error_yields_nothing() {
        let tier = tier(
            ScriptedStore::failing("documents"),
            ScriptedStore::new("arabic_documents", vec![]),
            1,
        );
        assert!(tier.retrieve("anything", Language::English).await.is_none());
    }

    #[tokio::test]
    async fn test_timeout_yields_nothing() {
        let router = KnowledgeBaseRouter::from_policy(
            &RoutingPolicy::default(),
            ScriptedStore::slow("documents", Duration::from_millis(500)),
            ScriptedStore::new("arabic_documents", vec![]),
        )
        .unwrap();
        let tier = RetrievalTier::new(Arc::new(router), 1, Duration::from_millis(20));
        assert!(tier.retrieve("anything", Language::English).await.is_none());
    }

    #[tokio::test]
    async fn test_debug_search_ranks_and_truncates() {
        let long = "x".repeat(250);
        let primary = ScriptedStore::new(
            "documents",
            vec![
                SearchHit::new(long, 0.9).with_metadata("row", 3),
                SearchHit::new("short", 0.5),
            ],
        );
        let tier = tier(primary.clone(), ScriptedStore::new("arabic_documents", vec![]), 1);

        let hits = tier.debug_search("query", Language::English, 5).await;

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].rank, 1);
        assert_eq!(hits[0].table, "documents");
        assert_eq!(hits[0].content.chars().count(), DEBUG_CONTENT_CHARS + 3);
        assert!(hits[0].content.ends_with("..."));
        assert_eq!(hits[0].metadata.get("row"), Some(&serde_json::json!(3)));
        assert_eq!(hits[1].rank, 2);
        assert_eq!(hits[1].content, "short");
        assert_eq!(primary.queries.lock()[0].1, 5);
    }

    #[tokio::test]
    async fn test_debug_search_error_is_empty() {
        let tier = tier(
            ScriptedStore::new("documents", vec![]),
            ScriptedStore::failing("arabic_documents"),
            1,
        );
        assert!(tier.debug_search("سؤال", Language::Arabic, 5).await.is_empty());
    }

    #[test]
    fn test_truncate_content_boundary() {
        let exact = "a".repeat(DEBUG_CONTENT_CHARS);
        assert_eq!(truncate_content(&exact), exact);
        assert_eq!(truncate_content("عربي"), "عربي");
    }
}
