//! Response orchestration
//!
//! Runs every query through the answer-resolution tiers in fixed order:
//! fast path, classification, retrieval, generation, default fallback.
//! Each tier is tried at most once and the pipeline always produces an answer.

pub mod orchestrator;

pub use orchestrator::{ResponseOrchestrator, RoutedResponse};
