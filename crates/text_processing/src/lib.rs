//! Text processing for the query router
//!
//! This crate provides the pure, script-aware stages of the pipeline:
//! - **Normalization**: Arabic tatweel/tashkeel stripping and hamza folding
//! - **Language Classification**: script-dominant rule backed by a statistical detector
//! - **Fast Path**: canned small-talk replies and greeting recognition
//! - **Output Enforcement**: translate final answers into the target language
//! - **Translation**: Google Cloud Translation v2 client
//!
//! # Example
//!
//! ```ignore
//! use query_router_text_processing::{FastPathMatcher, LanguageClassifier};
//!
//! let matcher = FastPathMatcher::default();
//! assert!(matcher.match_reply("hi").is_some());
//!
//! let classifier = LanguageClassifier::english_arabic();
//! assert_eq!(classifier.classify("كيف أضيف منتج"), Language::Arabic);
//! ```

pub mod classifier;
pub mod enforcer;
pub mod fast_path;
pub mod normalizer;
pub mod translation;

mod error;

pub use classifier::{LanguageClassifier, WhatlangDetector};
pub use enforcer::OutputLanguageEnforcer;
pub use error::{Result, TextProcessingError};
pub use fast_path::{FastPathMatch, FastPathMatcher, FastPathTable, GREETING_REPLY};
pub use normalizer::{fold_for_matching, ArabicNormalizer, TextNormalizer};
pub use translation::{create_translator, GoogleTranslator, GoogleTranslatorConfig, NoopTranslator};
