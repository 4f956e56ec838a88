//! Routing policy
//!
//! Which partition serves which language, how many neighbours to fetch,
//! and how the final answer's language is enforced.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use query_router_core::Language;

use crate::ConfigError;

/// One language-scoped knowledge-base partition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionConfig {
    /// Language served by this partition
    pub language: Language,
    /// Table / collection name
    pub collection: String,
    /// Name of the store-side match function
    #[serde(default)]
    pub match_function: String,
}

impl PartitionConfig {
    pub fn new(language: Language, collection: impl Into<String>, match_function: impl Into<String>) -> Self {
        Self {
            language,
            collection: collection.into(),
            match_function: match_function.into(),
        }
    }
}

fn default_primary() -> PartitionConfig {
    PartitionConfig::new(Language::English, "documents", "match_documents")
}

fn default_fallback() -> PartitionConfig {
    PartitionConfig::new(Language::Arabic, "arabic_documents", "match_arabic_documents")
}

fn default_top_k() -> usize {
    1
}

fn default_debug_top_k() -> usize {
    5
}

fn default_true() -> bool {
    true
}

fn default_target_language() -> Language {
    Language::Arabic
}

fn default_contact() -> String {
    "+966542924317".to_string()
}

fn default_sentinel_prefix() -> String {
    "ID:".to_string()
}

fn default_call_timeout_ms() -> u64 {
    15_000
}

/// Routing policy, immutable for the lifetime of the process
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingPolicy {
    /// Partition for the primary-script language
    #[serde(default = "default_primary")]
    pub primary: PartitionConfig,

    /// Partition for the fallback language
    #[serde(default = "default_fallback")]
    pub fallback: PartitionConfig,

    /// Similarity fan-out on the answer path
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Similarity fan-out for diagnostic search
    #[serde(default = "default_debug_top_k")]
    pub debug_top_k: usize,

    /// Translate non-target answers into `target_language`
    #[serde(default = "default_true")]
    pub force_target_language: bool,

    #[serde(default = "default_target_language")]
    pub target_language: Language,

    /// Human contact embedded in the default fallback message
    #[serde(default = "default_contact")]
    pub contact: String,

    /// Completions starting with this prefix are rejected
    #[serde(default = "default_sentinel_prefix")]
    pub generation_sentinel_prefix: String,

    /// Deadline for each external call (search, completion, translation)
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            fallback: default_fallback(),
            top_k: default_top_k(),
            debug_top_k: default_debug_top_k(),
            force_target_language: true,
            target_language: default_target_language(),
            contact: default_contact(),
            generation_sentinel_prefix: default_sentinel_prefix(),
            call_timeout_ms: default_call_timeout_ms(),
        }
    }
}

impl RoutingPolicy {
    pub fn primary_language(&self) -> Language {
        self.primary.language
    }

    pub fn fallback_language(&self) -> Language {
        self.fallback.language
    }

    /// Partition bound to `language`; anything but the fallback language
    /// resolves to the primary partition
    pub fn partition_for(&self, language: Language) -> &PartitionConfig {
        if language == self.fallback.language {
            &self.fallback
        } else {
            &self.primary
        }
    }

    /// Partition for a raw language tag; unknown tags resolve to primary
    pub fn partition_for_tag(&self, tag: &str) -> &PartitionConfig {
        match Language::from_str_loose(tag) {
            Some(language) => self.partition_for(language),
            None => &self.primary,
        }
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// Terminal answer used when every tier comes up empty
    pub fn default_fallback_message(&self) -> String {
        format!(
            "I don't have this type of data or information. For more details, contact {}.",
            self.contact
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::InvalidValue {
                field: "routing.top_k".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if self.debug_top_k < self.top_k {
            return Err(ConfigError::InvalidValue {
                field: "routing.debug_top_k".to_string(),
                message: format!(
                    "Must be >= routing.top_k ({}), got {}",
                    self.top_k, self.debug_top_k
                ),
            });
        }

        if self.primary.language == self.fallback.language {
            return Err(ConfigError::InvalidValue {
                field: "routing.fallback.language".to_string(),
                message: "Primary and fallback partitions must serve different languages".to_string(),
            });
        }

        if self.primary.collection == self.fallback.collection {
            return Err(ConfigError::InvalidValue {
                field: "routing.fallback.collection".to_string(),
                message: "Partitions must be disjoint".to_string(),
            });
        }

        for (field, partition) in [("routing.primary.collection", &self.primary), ("routing.fallback.collection", &self.fallback)] {
            if partition.collection.trim().is_empty() {
                return Err(ConfigError::MissingField(field.to_string()));
            }
        }

        if self.contact.trim().is_empty() {
            return Err(ConfigError::MissingField("routing.contact".to_string()));
        }

        if self.generation_sentinel_prefix.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "routing.generation_sentinel_prefix".to_string(),
                message: "Must not be empty".to_string(),
            });
        }

        if self.call_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "routing.call_timeout_ms".to_string(),
                message: "Must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}
