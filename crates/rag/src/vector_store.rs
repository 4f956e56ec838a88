//! Partition store using Qdrant
//!
//! One collection per language partition. Points carry the document text
//! under `content` plus scalar metadata.

use async_trait::async_trait;
use qdrant_client::{
    qdrant::{
        value::Kind, CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder,
        UpsertPointsBuilder, Value, VectorParamsBuilder,
    },
    Qdrant,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use query_router_core::{Metadata, PartitionStore, SearchHit};

use crate::{Embedder, RagError};

const CONTENT_KEY: &str = "content";

/// Qdrant partition configuration
#[derive(Debug, Clone)]
pub struct QdrantStoreConfig {
    /// Qdrant endpoint
    pub endpoint: String,
    /// Collection backing this partition
    pub collection: String,
    /// Vector dimension
    pub vector_dim: usize,
    /// API key (optional)
    pub api_key: Option<String>,
}

impl Default for QdrantStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:6334".to_string(),
            collection: "documents".to_string(),
            vector_dim: 768,
            api_key: None,
        }
    }
}

fn to_qdrant_value(value: &serde_json::Value) -> Value {
    match value {
        serde_json::Value::String(s) => s.clone().into(),
        serde_json::Value::Bool(b) => (*b).into(),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => i.into(),
            None => n.as_f64().unwrap_or_default().into(),
        },
        other => other.to_string().into(),
    }
}

fn from_qdrant_value(value: Value) -> Option<serde_json::Value> {
    match value.kind? {
        Kind::StringValue(s) => Some(serde_json::Value::String(s)),
        Kind::IntegerValue(i) => Some(i.into()),
        Kind::DoubleValue(d) => serde_json::Number::from_f64(d).map(serde_json::Value::Number),
        Kind::BoolValue(b) => Some(serde_json::Value::Bool(b)),
        _ => None,
    }
}

fn build_payload(content: &str, metadata: Option<&Metadata>) -> HashMap<String, Value> {
    let mut payload: HashMap<String, Value> = HashMap::new();
    if let Some(metadata) = metadata {
        for (k, v) in metadata {
            payload.insert(k.clone(), to_qdrant_value(v));
        }
    }
    payload.insert(CONTENT_KEY.to_string(), content.to_string().into());
    payload
}

fn split_payload(payload: HashMap<String, Value>) -> (String, Metadata) {
    let mut content = String::new();
    let mut metadata = Metadata::new();

    for (k, v) in payload {
        if k == CONTENT_KEY {
            if let Some(Kind::StringValue(s)) = v.kind {
                content = s;
            }
        } else if let Some(value) = from_qdrant_value(v) {
            metadata.insert(k, value);
        }
    }

    (content, metadata)
}

/// Qdrant-backed partition store
pub struct QdrantPartitionStore {
    client: Qdrant,
    config: QdrantStoreConfig,
    embedder: Arc<dyn Embedder>,
}

impl QdrantPartitionStore {
    /// Connect and make sure the partition's collection exists
    pub async fn connect(config: QdrantStoreConfig, embedder: Arc<dyn Embedder>) -> Result<Self, RagError> {
        let mut builder = Qdrant::from_url(&config.endpoint);

        if let Some(ref api_key) = config.api_key {
            builder = builder.api_key(api_key.clone());
            tracing::info!("Qdrant connection using API key authentication");
        }

        let client = builder
            .build()
            .map_err(|e| RagError::Connection(e.to_string()))?;

        let store = Self {
            client,
            config,
            embedder,
        };
        store.ensure_collection().await?;
        Ok(store)
    }

    /// Create collection if not exists
    pub async fn ensure_collection(&self) -> Result<(), RagError> {
        let exists = self
            .client
            .collection_exists(&self.config.collection)
            .await
            .map_err(|e| RagError::VectorStore(e.to_string()))?;

        if !exists {
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.config.collection).vectors_config(
                        VectorParamsBuilder::new(self.config.vector_dim as u64, Distance::Cosine),
                    ),
                )
                .await
                .map_err(|e| RagError::VectorStore(e.to_string()))?;

            tracing::info!(collection = %self.config.collection, "Created collection");
        }

        Ok(())
    }

    async fn points_count(&self) -> Result<u64, RagError> {
        let info = self
            .client
            .collection_info(&self.config.collection)
            .await
            .map_err(|e| RagError::VectorStore(e.to_string()))?;

        Ok(info
            .result
            .and_then(|r| r.points_count)
            .unwrap_or(0))
    }
}

#[async_trait]
impl PartitionStore for QdrantPartitionStore {
    async fn similarity_search(&self, query: &str, k: usize) -> query_router_core::Result<Vec<SearchHit>> {
        let query_embedding = self.embedder.embed(query).await?;

        let results = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.config.collection, query_embedding, k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(|e| RagError::Search(e.to_string()))?;

        Ok(results
            .result
            .into_iter()
            .map(|point| {
                let (content, metadata) = split_payload(point.payload);
                SearchHit {
                    content,
                    metadata,
                    score: point.score,
                }
            })
            .collect())
    }

    async fn add_texts(&self, texts: &[String], metadatas: &[Metadata]) -> query_router_core::Result<usize> {
        if texts.is_empty() {
            return Ok(0);
        }

        let embeddings = self.embedder.embed_batch(texts).await?;

        let points: Vec<PointStruct> = texts
            .iter()
            .zip(embeddings)
            .enumerate()
            .map(|(i, (text, embedding))| {
                PointStruct::new(
                    Uuid::new_v4().to_string(),
                    embedding,
                    build_payload(text, metadatas.get(i)),
                )
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.config.collection, points).wait(true))
            .await
            .map_err(|e| RagError::VectorStore(e.to_string()))?;

        tracing::debug!(collection = %self.config.collection, added = texts.len(), "Upserted points");
        Ok(texts.len())
    }

    async fn count(&self) -> query_router_core::Result<u64> {
        Ok(self.points_count().await?)
    }

    async fn clear(&self) -> query_router_core::Result<u64> {
        let removed = self.points_count().await?;

        self.client
            .delete_collection(&self.config.collection)
            .await
            .map_err(|e| RagError::VectorStore(e.to_string()))?;
        self.ensure_collection().await?;

        tracing::info!(collection = %self.config.collection, removed, "Cleared collection");
        Ok(removed)
    }

    fn name(&self) -> &str {
        &self.config.collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = QdrantStoreConfig::default();
        assert_eq!(config.vector_dim, 768);
        assert_eq!(config.collection, "documents");
    }

    #[test]
    fn test_payload_keeps_content_and_metadata() {
        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), serde_json::json!("faq.csv"));
        metadata.insert("row".to_string(), serde_json::json!(7));
        metadata.insert("verified".to_string(), serde_json::json!(true));

        let payload = build_payload("Q: a\nA: b", Some(&metadata));
        let (content, restored) = split_payload(payload);

        assert_eq!(content, "Q: a\nA: b");
        assert_eq!(restored, metadata);
    }

    #[test]
    fn test_metadata_cannot_shadow_content() {
        let mut metadata = Metadata::new();
        metadata.insert(CONTENT_KEY.to_string(), serde_json::json!("other"));

        let (content, restored) = split_payload(build_payload("real", Some(&metadata)));
        assert_eq!(content, "real");
        assert!(restored.is_empty());
    }

    #[test]
    fn test_nested_metadata_is_stringified() {
        let value = to_qdrant_value(&serde_json::json!({"a": 1}));
        assert_eq!(from_qdrant_value(value), Some(serde_json::json!("{\"a\":1}")));
    }
}
