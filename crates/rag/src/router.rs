//! Knowledge base router
//!
//! Maps a language to exactly one partition. There is no cross-partition
//! search and no chaining: a wrong choice simply yields no match.

use std::sync::Arc;

use query_router_config::{PartitionConfig, RoutingPolicy, Settings, VectorStoreBackend};
use query_router_core::{Language, PartitionStore};

use crate::{create_embedder, Embedder, InMemoryPartitionStore, QdrantPartitionStore, QdrantStoreConfig, RagError};

/// A language-scoped partition and its store
#[derive(Clone)]
pub struct Partition {
    config: PartitionConfig,
    store: Arc<dyn PartitionStore>,
}

impl Partition {
    pub fn new(config: PartitionConfig, store: Arc<dyn PartitionStore>) -> Self {
        Self { config, store }
    }

    pub fn language(&self) -> Language {
        self.config.language
    }

    /// Table / collection name
    pub fn id(&self) -> &str {
        &self.config.collection
    }

    pub fn match_function(&self) -> &str {
        &self.config.match_function
    }

    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn PartitionStore> {
        &self.store
    }
}

impl std::fmt::Debug for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Partition")
            .field("config", &self.config)
            .field("store", &self.store.name())
            .finish()
    }
}

/// Routes languages to partitions
#[derive(Debug, Clone)]
pub struct KnowledgeBaseRouter {
    primary: Partition,
    fallback: Partition,
}

impl KnowledgeBaseRouter {
    pub fn new(primary: Partition, fallback: Partition) -> Result<Self, RagError> {
        if primary.language() == fallback.language() {
            return Err(RagError::Routing(format!(
                "Both partitions serve {}",
                primary.language()
            )));
        }
        if primary.id() == fallback.id() {
            return Err(RagError::Routing(format!(
                "Partitions must be disjoint, both use {}",
                primary.id()
            )));
        }
        Ok(Self { primary, fallback })
    }

    /// Build the router from the routing policy and pre-built stores
    pub fn from_policy(
        policy: &RoutingPolicy,
        primary_store: Arc<dyn PartitionStore>,
        fallback_store: Arc<dyn PartitionStore>,
    ) -> Result<Self, RagError> {
        Self::new(
            Partition::new(policy.primary.clone(), primary_store),
            Partition::new(policy.fallback.clone(), fallback_store),
        )
    }

    /// Connect the configured backend for both partitions
    pub async fn from_settings(settings: &Settings) -> Result<Self, RagError> {
        let embedder = create_embedder(&settings.embedding, settings.vector_store.vector_dim);
        let primary = build_partition_store(settings, &settings.routing.primary, embedder.clone()).await?;
        let fallback = build_partition_store(settings, &settings.routing.fallback, embedder).await?;
        Self::from_policy(&settings.routing, primary, fallback)
    }

    /// Partition for `language`; anything but the fallback language goes to primary
    pub fn route(&self, language: Language) -> &Partition {
        if language == self.fallback.language() {
            &self.fallback
        } else {
            &self.primary
        }
    }

    /// Partition for a raw tag; unknown tags go to primary
    pub fn route_tag(&self, tag: &str) -> &Partition {
        match Language::from_str_loose(tag) {
            Some(language) => self.route(language),
            None => &self.primary,
        }
    }

    pub fn primary(&self) -> &Partition {
        &self.primary
    }

    pub fn fallback(&self) -> &Partition {
        &self.fallback
    }

    pub fn partitions(&self) -> [&Partition; 2] {
        [&self.primary, &self.fallback]
    }
}

/// Build the store backing one partition
pub async fn build_partition_store(
    settings: &Settings,
    partition: &PartitionConfig,
    embedder: Arc<dyn Embedder>,
) -> Result<Arc<dyn PartitionStore>, RagError> {
    match settings.vector_store.backend {
        VectorStoreBackend::Qdrant => {
            let config = QdrantStoreConfig {
                endpoint: settings.vector_store.endpoint.clone(),
                collection: partition.collection.clone(),
                vector_dim: settings.vector_store.vector_dim,
                api_key: settings.vector_store.api_key.clone(),
            };
            let store = QdrantPartitionStore::connect(config, embedder).await?;
            tracing::info!(
                collection = %partition.collection,
                language = %partition.language,
                "Connected Qdrant partition"
            );
            Ok(Arc::new(store))
        },
        VectorStoreBackend::Memory => {
            tracing::info!(
                collection = %partition.collection,
                language = %partition.language,
                "Using in-memory partition"
            );
            Ok(Arc::new(InMemoryPartitionStore::new(partition.collection.clone(), embedder)))
        },
    }
}
