//! Core traits and types for the multilingual query router
//!
//! This crate provides foundational types used across all other crates:
//! - Language and script definitions (English primary, Arabic fallback)
//! - Collaborator traits (partition store, completion, translation, detection)
//! - Candidate answers produced by the resolution tiers
//! - Error types and the per-call deadline helper

pub mod answer;
pub mod deadline;
pub mod error;
pub mod language;
pub mod traits;

pub use answer::{CandidateAnswer, Tier};
pub use deadline::with_deadline;
pub use error::{Error, Result};
pub use language::{Language, Script};

pub use traits::{CompletionService, LanguageDetector, Metadata, PartitionStore, SearchHit, Translator};
