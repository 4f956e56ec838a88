//! Collaborator traits for the query router
//!
//! The router talks to every external service through one of these traits,
//! so deployments can wire real backends and tests can wire doubles.
//!
//! # Trait Hierarchy
//!
//! ```text
//! Retrieval:
//!   - PartitionStore: Similarity search and ingestion for one language partition
//!
//! Generation:
//!   - CompletionService: Single-turn system + user completion
//!
//! Text Processing:
//!   - Translator: Translate text into a target language
//!   - LanguageDetector: Deterministic statistical language identification
//! ```

mod llm;
mod retriever;
mod text_processing;

pub use llm::CompletionService;
pub use retriever::{Metadata, PartitionStore, SearchHit};
pub use text_processing::{LanguageDetector, Translator};
