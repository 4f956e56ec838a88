//! Language-partitioned knowledge base
//!
//! Features:
//! - Knowledge base router (one partition per language, no fan-out)
//! - Retrieval tier (top-k similarity search, top hit accepted)
//! - Dense vector storage via Qdrant, or an in-process store
//! - Ollama and deterministic hash embedders
//! - Script-aware ingestion of texts and question/answer sheets
//! - Diagnostic search with ranks and scores

pub mod embeddings;
pub mod ingestion;
pub mod memory_store;
pub mod retrieval;
pub mod router;
pub mod vector_store;

pub use embeddings::{create_embedder, Embedder, HashEmbedder, OllamaEmbedder, OllamaEmbeddingConfig};
pub use ingestion::{IngestionReport, KnowledgeIngestor, PartitionCounts, StoreOutcome};
pub use memory_store::{cosine_similarity, InMemoryPartitionStore};
pub use retrieval::{DebugHit, RetrievalTier, DEBUG_CONTENT_CHARS};
pub use router::{build_partition_store, KnowledgeBaseRouter, Partition};
pub use vector_store::{QdrantPartitionStore, QdrantStoreConfig};

use thiserror::Error;

/// RAG errors
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Ingestion error: {0}")]
    Ingestion(String),

    #[error("Invalid routing: {0}")]
    Routing(String),
}

impl From<RagError> for query_router_core::Error {
    fn from(err: RagError) -> Self {
        match err {
            RagError::Embedding(msg) => query_router_core::Error::Embedding(msg),
            RagError::Ingestion(msg) => query_router_core::Error::Ingestion(msg),
            RagError::Routing(msg) => query_router_core::Error::Config(msg),
            other => query_router_core::Error::VectorStore(other.to_string()),
        }
    }
}

impl From<csv::Error> for RagError {
    fn from(err: csv::Error) -> Self {
        RagError::Ingestion(err.to_string())
    }
}
