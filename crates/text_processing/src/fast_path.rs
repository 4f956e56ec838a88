//! Intent fast path
//!
//! Recognizes conversational small talk so it can be answered without
//! touching retrieval or generation. Matching favours recall: short
//! ambiguous inputs are treated as greetings on purpose.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

use crate::normalizer::fold_for_matching;

/// Generic reply for recognized greetings with no canned entry
pub const GREETING_REPLY: &str =
    "Hello! I'm here to help you with Tijarah360. How can I assist you today?";

/// Longest cleaned input (in characters) still treated as a short greeting
const SHORT_INPUT_MAX_CHARS: usize = 10;

/// Most words a short-greeting input may have
const SHORT_INPUT_MAX_WORDS: usize = 2;

const CANNED_REPLIES: &[(&str, &str)] = &[
    ("hi", "Hello! How can I assist you with Tijarah360 today?"),
    ("hello", "Hi there! How can I help you with Tijarah360?"),
    ("how are you", "I'm just a bot, but I'm functioning perfectly! How about you?"),
    ("what's up", "I'm here to help you with Tijarah360. How can I assist?"),
    ("hey", "Hey! How can I assist you today?"),
    ("good morning", "Good morning! How can I help you with Tijarah360 today?"),
    ("good afternoon", "Good afternoon! How can I assist you with Tijarah360?"),
    ("good evening", "Good evening! How can I help you with Tijarah360?"),
    ("bye", "Goodbye! Feel free to return if you need help with Tijarah360."),
    ("goodbye", "Goodbye! Have a great day!"),
    ("thanks", "You're welcome! Is there anything else I can help you with regarding Tijarah360?"),
    ("thank you", "You're welcome! Is there anything else I can help you with regarding Tijarah360?"),
    ("ok", "Great! How can I assist you with Tijarah360?"),
    ("okay", "Great! How can I assist you with Tijarah360?"),
    ("yes", "Great! What would you like to know about Tijarah360?"),
    ("no", "No problem! Let me know if you need help with Tijarah360 later."),
    ("maybe", "Take your time! I'm here when you need help with Tijarah360."),
    ("sure", "Perfect! How can I help you with Tijarah360?"),
    ("alright", "Alright! What can I help you with regarding Tijarah360?"),
];

const SHORT_GREETING_TOKENS: &[&str] = &[
    "hi", "hello", "hey", "bye", "ok", "okay", "yes", "no", "maybe", "sure", "alright",
];

const GREETING_PHRASES: &[&str] = &[
    "hi", "hello", "hey", "good morning", "good afternoon", "good evening", "how are you",
    "what's up", "bye", "goodbye", "thanks", "thank you", "ok", "okay", "yes", "no", "maybe",
    "sure", "alright",
];

const HOW_ARE_YOU_VARIANTS: &[&str] = &["how r u", "how are u", "how r you", "how are you"];

static DEFAULT_TABLE: Lazy<FastPathTable> = Lazy::new(FastPathTable::tijarah360);

/// Read-only fast-path table
#[derive(Debug, Clone)]
pub struct FastPathTable {
    /// Folded phrase -> canned reply
    pub canned: HashMap<String, String>,
    /// Tokens that form a greeting when an input consists only of them
    pub short_tokens: HashSet<String>,
    /// Whole phrases recognized as greetings
    pub greeting_phrases: HashSet<String>,
    /// Phonetic / abbreviated spellings of "how are you"
    pub how_are_you_variants: HashSet<String>,
    /// Reply used for greetings without a canned entry
    pub greeting_reply: String,
}

impl FastPathTable {
    /// Built-in small-talk table
    pub fn tijarah360() -> Self {
        Self {
            canned: CANNED_REPLIES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            short_tokens: SHORT_GREETING_TOKENS.iter().map(|s| s.to_string()).collect(),
            greeting_phrases: GREETING_PHRASES.iter().map(|s| s.to_string()).collect(),
            how_are_you_variants: HOW_ARE_YOU_VARIANTS.iter().map(|s| s.to_string()).collect(),
            greeting_reply: GREETING_REPLY.to_string(),
        }
    }
}

impl Default for FastPathTable {
    fn default() -> Self {
        DEFAULT_TABLE.clone()
    }
}

/// Outcome of a fast-path hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FastPathMatch {
    /// Exact key in the canned table
    Canned(String),
    /// Recognized as a greeting, answered with the generic reply
    Greeting(String),
}

impl FastPathMatch {
    pub fn into_reply(self) -> String {
        match self {
            Self::Canned(reply) | Self::Greeting(reply) => reply,
        }
    }
}

/// Fast-path matcher
#[derive(Debug, Clone, Default)]
pub struct FastPathMatcher {
    table: FastPathTable,
}

impl FastPathMatcher {
    pub fn new(table: FastPathTable) -> Self {
        Self { table }
    }

    /// Match `text` against the table; first rule to fire wins
    pub fn match_query(&self, text: &str) -> Option<FastPathMatch> {
        let cleaned = fold_for_matching(text);

        if let Some(reply) = self.table.canned.get(&cleaned) {
            return Some(FastPathMatch::Canned(reply.clone()));
        }

        if self.is_greeting(&cleaned) {
            return Some(FastPathMatch::Greeting(self.table.greeting_reply.clone()));
        }

        None
    }

    /// Reply text for `text`, if the fast path handles it
    pub fn match_reply(&self, text: &str) -> Option<String> {
        self.match_query(text).map(FastPathMatch::into_reply)
    }

    fn is_greeting(&self, cleaned: &str) -> bool {
        let words: Vec<&str> = cleaned.split_whitespace().collect();

        if words.len() <= SHORT_INPUT_MAX_WORDS {
            if words.iter().all(|w| self.table.short_tokens.contains(*w)) {
                return true;
            }
            if cleaned.chars().count() <= SHORT_INPUT_MAX_CHARS {
                return true;
            }
        }

        self.table.greeting_phrases.contains(cleaned)
            || self.table.how_are_you_variants.contains(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_reply() {
        let matcher = FastPathMatcher::default();
        assert_eq!(
            matcher.match_query("hi"),
            Some(FastPathMatch::Canned(
                "Hello! How can I assist you with Tijarah360 today?".to_string()
            ))
        );
        assert_eq!(
            matcher.match_reply("  Thank You!! "),
            Some(
                "You're welcome! Is there anything else I can help you with regarding Tijarah360?"
                    .to_string()
            )
        );
        assert_eq!(
            matcher.match_reply("What's up?"),
            Some("I'm here to help you with Tijarah360. How can I assist?".to_string())
        );
    }

    #[test]
    fn test_all_canned_keys_hit() {
        let matcher = FastPathMatcher::default();
        for (key, reply) in CANNED_REPLIES {
            assert_eq!(matcher.match_reply(key).as_deref(), Some(*reply), "key {key}");
        }
    }

    #[test]
    fn test_short_token_combination_is_greeting() {
        let matcher = FastPathMatcher::default();
        assert_eq!(
            matcher.match_query("hello hello"),
            Some(FastPathMatch::Greeting(GREETING_REPLY.to_string()))
        );
        assert_eq!(matcher.match_reply("ok sure").as_deref(), Some(GREETING_REPLY));
    }

    #[test]
    fn test_short_input_is_greeting() {
        let matcher = FastPathMatcher::default();
        // Two short words not in any list still count
        assert_eq!(matcher.match_reply("yo dude").as_deref(), Some(GREETING_REPLY));
        assert_eq!(matcher.match_reply("pricing").as_deref(), Some(GREETING_REPLY));
    }

    #[test]
    fn test_how_are_you_variants() {
        let matcher = FastPathMatcher::default();
        assert_eq!(matcher.match_reply("How r u?").as_deref(), Some(GREETING_REPLY));
        assert_eq!(matcher.match_reply("how are u").as_deref(), Some(GREETING_REPLY));
        assert_eq!(matcher.match_reply("how r you").as_deref(), Some(GREETING_REPLY));
    }

    #[test]
    fn test_real_questions_pass_through() {
        let matcher = FastPathMatcher::default();
        assert_eq!(matcher.match_query("How to create a purchase order?"), None);
        assert_eq!(matcher.match_query("inventory adjustments"), None);
        assert_eq!(matcher.match_query("كيف أقوم بإنشاء أمر شراء؟"), None);
    }

    #[test]
    fn test_two_long_words_not_greeting() {
        let matcher = FastPathMatcher::default();
        // 2 words but longer than the short-input limit and not all tokens
        assert_eq!(matcher.match_query("purchase orders"), None);
    }

    #[test]
    fn test_custom_table() {
        let mut table = FastPathTable::tijarah360();
        table.canned.insert("salam".to_string(), "Wa alaikum salam!".to_string());
        let matcher = FastPathMatcher::new(table);
        assert_eq!(matcher.match_reply("Salam").as_deref(), Some("Wa alaikum salam!"));
    }
}
