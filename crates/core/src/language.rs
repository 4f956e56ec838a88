//! Language definitions
//!
//! The router distinguishes a primary-script language (English) from a
//! fallback language written in its own script (Arabic). Each language maps
//! to exactly one knowledge-base partition.

use serde::{Deserialize, Serialize};

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[serde(alias = "en")]
    English,
    #[serde(alias = "ar")]
    Arabic,
}

impl Language {
    /// Get ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Arabic => "ar",
        }
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Arabic => "Arabic",
        }
    }

    /// Get script used by this language
    pub fn script(&self) -> Script {
        match self {
            Self::English => Script::Latin,
            Self::Arabic => Script::Arabic,
        }
    }

    /// Parse from string (case-insensitive)
    pub fn from_str_loose(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "en" | "eng" | "english" => Some(Self::English),
            "ar" | "ara" | "arabic" => Some(Self::Arabic),
            _ => None,
        }
    }

    /// Get all supported languages
    pub fn all() -> &'static [Language] {
        &[Self::English, Self::Arabic]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Script systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Script {
    Latin,
    Arabic,
}

impl Script {
    /// Unicode blocks of this script
    pub fn unicode_ranges(&self) -> &'static [(u32, u32)] {
        match self {
            // Basic Latin, Latin-1 Supplement, Extended-A/B, Extended Additional
            Self::Latin => &[(0x0041, 0x024F), (0x1E00, 0x1EFF)],
            Self::Arabic => &[(0x0600, 0x06FF)],
        }
    }

    /// Check if a character belongs to this script
    ///
    /// Latin only counts letters; spaces, digits and ASCII punctuation are
    /// script-neutral.
    pub fn contains_char(&self, c: char) -> bool {
        let code = c as u32;
        let in_block = self
            .unicode_ranges()
            .iter()
            .any(|&(start, end)| (start..=end).contains(&code));
        match self {
            Self::Latin => in_block && c.is_alphabetic(),
            Self::Arabic => in_block,
        }
    }

    /// Check if any character of `text` belongs to this script
    pub fn appears_in(&self, text: &str) -> bool {
        text.chars().any(|c| self.contains_char(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_code() {
        assert_eq!(Language::English.code(), "en");
        assert_eq!(Language::Arabic.code(), "ar");
    }

    #[test]
    fn test_language_script() {
        assert_eq!(Language::English.script(), Script::Latin);
        assert_eq!(Language::Arabic.script(), Script::Arabic);
    }

    #[test]
    fn test_language_from_str() {
        assert_eq!(Language::from_str_loose("ar"), Some(Language::Arabic));
        assert_eq!(Language::from_str_loose(" Arabic "), Some(Language::Arabic));
        assert_eq!(Language::from_str_loose("EN"), Some(Language::English));
        assert_eq!(Language::from_str_loose("fr"), None);
    }

    #[test]
    fn test_language_serde_accepts_codes() {
        let lang: Language = serde_json::from_str("\"ar\"").unwrap();
        assert_eq!(lang, Language::Arabic);
        let lang: Language = serde_json::from_str("\"english\"").unwrap();
        assert_eq!(lang, Language::English);
    }

    #[test]
    fn test_script_contains_char() {
        assert!(Script::Arabic.contains_char('م'));
        assert!(Script::Arabic.contains_char('\u{0640}'));
        assert!(!Script::Arabic.contains_char('m'));
        assert!(Script::Arabic.appears_in("order رقم 5"));
        assert!(!Script::Arabic.appears_in("order number 5"));
    }

    #[test]
    fn test_latin_ignores_neutral_characters() {
        assert!(Script::Latin.contains_char('a'));
        assert!(Script::Latin.contains_char('é'));
        assert!(!Script::Latin.contains_char(' '));
        assert!(!Script::Latin.contains_char('5'));
        assert!(!Script::Latin.contains_char('?'));
        assert!(!Script::Latin.appears_in("اذهب إلى الطلبات 3؟"));
        assert!(Script::Latin.appears_in("رقم order"));
    }
}
