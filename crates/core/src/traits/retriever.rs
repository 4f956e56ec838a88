//! Partition store trait for retrieval

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::Result;

/// Free-form document metadata
pub type Metadata = HashMap<String, serde_json::Value>;

/// One similarity search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Stored document content
    pub content: String,
    /// Metadata stored alongside the content
    #[serde(default)]
    pub metadata: Metadata,
    /// Similarity score (higher is closer)
    pub score: f32,
}

impl SearchHit {
    pub fn new(content: impl Into<String>, score: f32) -> Self {
        Self {
            content: content.into(),
            metadata: HashMap::new(),
            score,
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Vector store bound to one language partition
///
/// Implementations:
/// - `QdrantPartitionStore` - one Qdrant collection per partition
/// - `InMemoryPartitionStore` - cosine search over an in-process list
///
/// # Example
///
/// ```ignore
/// let store: Arc<dyn PartitionStore> = Arc::new(InMemoryPartitionStore::new("documents", embedder));
/// store.add_texts(&["Q: How to add a product?\nA: Go to Catalogue.".into()], &[]).await?;
/// let hits = store.similarity_search("add product", 1).await?;
/// ```
#[async_trait]
pub trait PartitionStore: Send + Sync + 'static {
    /// Search for the `k` closest documents, best first
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>>;

    /// Store texts; `metadatas` aligns by index and may be shorter than `texts`
    ///
    /// # Returns
    /// Number of documents stored
    async fn add_texts(&self, texts: &[String], metadatas: &[Metadata]) -> Result<usize>;

    /// Number of documents in the partition
    async fn count(&self) -> Result<u64>;

    /// Remove every document, returning how many were removed
    async fn clear(&self) -> Result<u64>;

    /// Partition identifier (table or collection name)
    fn name(&self) -> &str;
}
