//! Script-aware text normalization
//!
//! Canonicalizes Arabic text before it is searched or stored:
//! - strips tatweel (U+0640)
//! - strips tashkeel (U+064B..=U+0652), optionally the superscript alef (U+0670)
//! - folds every hamza form onto the bare hamza (أ إ ؤ ئ and the combining
//!   hamza marks -> ء, alef madda -> ءء, or ءا at the start of a short word)
//!
//! Latin text is left untouched. None of this changes the information content
//! of the text; it only removes presentation variants.

use query_router_core::{Language, Script};

const TATWEEL: char = '\u{0640}';
const SUPERSCRIPT_ALEF: char = '\u{0670}';
const HAMZA: char = '\u{0621}';
const ALEF: char = '\u{0627}';
const ALEF_MADDA: char = '\u{0622}';
const SHADDA: char = '\u{0651}';

fn is_tashkeel(c: char) -> bool {
    ('\u{064B}'..='\u{0652}').contains(&c)
}

/// Short vowels, tanween and sukun (shadda excluded)
fn is_haraka(c: char) -> bool {
    ('\u{064B}'..='\u{0650}').contains(&c) || c == '\u{0652}'
}

fn is_hamza_form(c: char) -> bool {
    matches!(c, 'أ' | 'إ' | 'ؤ' | 'ئ' | '\u{0654}' | '\u{0655}')
}

/// Uniform hamza folding over the whole text
fn normalize_hamza(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 2);
    let mut rest = chars.as_slice();

    if chars.first() == Some(&ALEF_MADDA) {
        let short_word = chars.len() >= 3
            && !is_haraka(chars[1])
            && (chars[2] == SHADDA || chars.len() == 3);
        out.push(HAMZA);
        out.push(if short_word { ALEF } else { HAMZA });
        rest = &chars[1..];
    }

    for &c in rest {
        if c == ALEF_MADDA {
            out.push(HAMZA);
            out.push(HAMZA);
        } else if is_hamza_form(c) {
            out.push(HAMZA);
        } else {
            out.push(c);
        }
    }
    out
}

/// Arabic normalizer
#[derive(Debug, Clone)]
pub struct ArabicNormalizer {
    /// Also strip the superscript (dagger) alef
    pub strip_superscript_alef: bool,
}

impl Default for ArabicNormalizer {
    fn default() -> Self {
        Self {
            strip_superscript_alef: false,
        }
    }
}

impl ArabicNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_superscript_alef(mut self, strip: bool) -> Self {
        self.strip_superscript_alef = strip;
        self
    }

    /// Normalize Arabic text; empty input is returned unchanged
    pub fn normalize(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let folded: String = normalize_hamza(text)
            .chars()
            .filter(|&c| c != TATWEEL)
            .filter(|&c| !is_tashkeel(c))
            .filter(|&c| !(self.strip_superscript_alef && c == SUPERSCRIPT_ALEF))
            .collect();

        folded.trim().to_string()
    }
}

/// Normalizer dispatching on the query language
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    arabic: ArabicNormalizer,
}

impl TextNormalizer {
    pub fn new(arabic: ArabicNormalizer) -> Self {
        Self { arabic }
    }

    /// Normalize `text` for `language`
    ///
    /// Only Arabic-script languages are rewritten; other text is returned as is.
    pub fn normalize(&self, text: &str, language: Language) -> String {
        match language.script() {
            Script::Arabic => self.arabic.normalize(text),
            Script::Latin => text.to_string(),
        }
    }
}

/// Case and punctuation folding used by fast-path matching
///
/// Trims, lower-cases and removes `?`, `!` and `.`.
pub fn fold_for_matching(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .replace(['?', '!', '.'], "")
        .trim()
        .to_string()
}
