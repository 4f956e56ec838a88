//! Candidate answers produced by the resolution tiers

use serde::{Deserialize, Serialize};

use crate::Language;

/// Stage of the answer-resolution pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    FastPath,
    Retrieval,
    Generation,
    DefaultFallback,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FastPath => "fast_path",
            Self::Retrieval => "retrieval",
            Self::Generation => "generation",
            Self::DefaultFallback => "default_fallback",
        }
    }

    /// Whether output from this tier goes through language enforcement
    pub fn is_enforced(&self) -> bool {
        !matches!(self, Self::FastPath)
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer text produced by one tier for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateAnswer {
    /// Tier that produced the text
    pub tier: Tier,
    /// Answer text
    pub text: String,
    /// Similarity score (retrieval only)
    pub score: Option<f32>,
    /// Language the query was classified as
    pub language: Language,
}

impl CandidateAnswer {
    pub fn new(tier: Tier, text: impl Into<String>, language: Language) -> Self {
        Self {
            tier,
            text: text.into(),
            score: None,
            language,
        }
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }
}
