//! In-process partition store
//!
//! Cosine search over an in-memory list. Backs the `memory` vector-store
//! backend and tests.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use query_router_core::{Metadata, PartitionStore, Result, SearchHit};

use crate::Embedder;

#[derive(Debug, Clone)]
struct StoredDocument {
    content: String,
    metadata: Metadata,
    embedding: Vec<f32>,
}

/// Cosine similarity; zero vectors score 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Partition store kept in process memory
pub struct InMemoryPartitionStore {
    name: String,
    embedder: Arc<dyn Embedder>,
    documents: RwLock<Vec<StoredDocument>>,
}

impl InMemoryPartitionStore {
    pub fn new(name: impl Into<String>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            name: name.into(),
            embedder,
            documents: RwLock::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

#[async_trait]
impl PartitionStore for InMemoryPartitionStore {
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        let query_embedding = self.embedder.embed(query).await?;

        let documents = self.documents.read();
        let mut scored: Vec<(f32, &StoredDocument)> = documents
            .iter()
            .map(|doc| (cosine_similarity(&query_embedding, &doc.embedding), doc))
            .collect();

        // Stable sort: equal scores keep insertion order
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(score, doc)| SearchHit {
                content: doc.content.clone(),
                metadata: doc.metadata.clone(),
                score,
            })
            .collect())
    }

    async fn add_texts(&self, texts: &[String], metadatas: &[Metadata]) -> Result<usize> {
        if texts.is_empty() {
            return Ok(0);
        }

        let embeddings = self.embedder.embed_batch(texts).await?;

        let mut documents = self.documents.write();
        for (i, (text, embedding)) in texts.iter().zip(embeddings).enumerate() {
            documents.push(StoredDocument {
                content: text.clone(),
                metadata: metadatas.get(i).cloned().unwrap_or_default(),
                embedding,
            });
        }

        tracing::debug!(partition = %self.name, added = texts.len(), "Stored documents");
        Ok(texts.len())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.documents.read().len() as u64)
    }

    async fn clear(&self) -> Result<u64> {
        let mut documents = self.documents.write();
        let removed = documents.len() as u64;
        documents.clear();
        Ok(removed)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
