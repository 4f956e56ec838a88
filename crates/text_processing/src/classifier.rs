//! Language classification
//!
//! Decides whether a query belongs to the primary language or the fallback
//! language. Script presence dominates: a single fallback-script character is
//! enough. Otherwise a statistical detector gets a say, and anything it cannot
//! decide lands on the primary language.

use std::sync::Arc;

use query_router_core::{Language, LanguageDetector};

/// Statistical detector backed by `whatlang`
///
/// `whatlang` is a pure trigram model with no random state, so repeated
/// calls on the same input always return the same answer.
#[derive(Debug, Clone, Default)]
pub struct WhatlangDetector;

impl WhatlangDetector {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Option<Language> {
        let info = whatlang::detect(text)?;
        match info.lang() {
            whatlang::Lang::Ara => Some(Language::Arabic),
            whatlang::Lang::Eng => Some(Language::English),
            _ => None,
        }
    }
}

/// Language classifier
#[derive(Clone)]
pub struct LanguageClassifier {
    primary: Language,
    fallback: Language,
    detector: Arc<dyn LanguageDetector>,
}

impl LanguageClassifier {
    pub fn new(primary: Language, fallback: Language, detector: Arc<dyn LanguageDetector>) -> Self {
        Self {
            primary,
            fallback,
            detector,
        }
    }

    /// English primary, Arabic fallback, `whatlang` detector
    pub fn english_arabic() -> Self {
        Self::new(Language::English, Language::Arabic, Arc::new(WhatlangDetector::new()))
    }

    pub fn primary(&self) -> Language {
        self.primary
    }

    pub fn fallback(&self) -> Language {
        self.fallback
    }

    /// Classify `text`. Never fails.
    pub fn classify(&self, text: &str) -> Language {
        if self.fallback.script().appears_in(text) {
            tracing::debug!(language = %self.fallback, "Fallback script present");
            return self.fallback;
        }

        match self.detector.detect(text) {
            Some(lang) if lang == self.fallback => {
                tracing::debug!(language = %lang, "Detector reported fallback language");
                self.fallback
            },
            _ => self.primary,
        }
    }
}

impl std::fmt::Debug for LanguageClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageClassifier")
            .field("primary", &self.primary)
            .field("fallback", &self.fallback)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct FixedDetector(Option<Language>);

    impl LanguageDetector for FixedDetector {
        fn detect(&self, _text: &str) -> Option<Language> {
            self.0
        }
    }

    fn classifier_with(detected: Option<Language>) -> LanguageClassifier {
        LanguageClassifier::new(
            Language::English,
            Language::Arabic,
            Arc::new(FixedDetector(detected)),
        )
    }

    #[test]
    fn test_arabic_script_dominates() {
        let classifier = classifier_with(Some(Language::English));
        assert_eq!(classifier.classify("كيف أقوم بإنشاء أمر شراء؟"), Language::Arabic);
        // One Arabic letter inside an English sentence is enough
        assert_eq!(
            classifier.classify("How do I print the invoice ف please"),
            Language::Arabic
        );
    }

    #[test]
    fn test_detector_consulted_without_script() {
        assert_eq!(
            classifier_with(Some(Language::Arabic)).classify("marhaba"),
            Language::Arabic
        );
        assert_eq!(
            classifier_with(Some(Language::English)).classify("hello"),
            Language::English
        );
    }

    #[test]
    fn test_latin_fallback_ignores_spaces_and_digits() {
        let classifier = LanguageClassifier::new(
            Language::Arabic,
            Language::English,
            Arc::new(FixedDetector(None)),
        );
        assert_eq!(classifier.classify("كيف أضيف منتج 2؟"), Language::Arabic);
        assert_eq!(classifier.classify("كيف أضيف product"), Language::English);
    }

    #[test]
    fn test_inconclusive_defaults_to_primary() {
        let classifier = classifier_with(None);
        assert_eq!(classifier.classify(""), Language::English);
        assert_eq!(classifier.classify("12345"), Language::English);
    }

    #[test]
    fn test_whatlang_detector() {
        let detector = WhatlangDetector::new();
        assert_eq!(
            detector.detect("How do I create a purchase order in the system?"),
            Some(Language::English)
        );
        assert_eq!(detector.detect(""), None);
    }

    #[test]
    fn test_whatlang_is_deterministic() {
        let detector = WhatlangDetector::new();
        let text = "Where can I find the monthly sales report for my branch";
        let first = detector.detect(text);
        for _ in 0..20 {
            assert_eq!(detector.detect(text), first);
        }
    }

    #[test]
    fn test_default_classifier() {
        let classifier = LanguageClassifier::english_arabic();
        assert_eq!(classifier.classify("مرحبا"), Language::Arabic);
        assert_eq!(
            classifier.classify("How to create a purchase order?"),
            Language::English
        );
    }

    proptest! {
        #[test]
        fn any_arabic_char_classifies_as_fallback(
            prefix in "[a-zA-Z0-9 ?]{0,30}",
            c in proptest::char::range('\u{0600}', '\u{06FF}'),
            suffix in "[a-zA-Z0-9 ?]{0,30}",
        ) {
            let classifier = classifier_with(Some(Language::English));
            let text = format!("{}{}{}", prefix, c, suffix);
            prop_assert_eq!(classifier.classify(&text), Language::Arabic);
        }

        #[test]
        fn latin_text_follows_detector(s in "[a-zA-Z0-9 ,?]{0,60}") {
            prop_assert_eq!(classifier_with(None).classify(&s), Language::English);
            prop_assert_eq!(classifier_with(Some(Language::English)).classify(&s), Language::English);
            prop_assert_eq!(classifier_with(Some(Language::Arabic)).classify(&s), Language::Arabic);
        }

        #[test]
        fn classification_is_deterministic(s in ".{0,60}") {
            let classifier = LanguageClassifier::english_arabic();
            prop_assert_eq!(classifier.classify(&s), classifier.classify(&s));
        }
    }
}
