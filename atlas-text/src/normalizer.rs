//! Arabic Text Normalizer
//!
//! Canonicalizes raw Arabic text so that two spellings of the same narration
//! compare equal:
//! - Diacritics (tashkeel), Quranic annotation marks and tatweel are removed
//! - Hamza-carrying alef variants become bare alef
//! - Alef maqsura becomes yaa, taa marbuta becomes haa
//! - Punctuation (Latin and Arabic) becomes a space
//! - Whitespace runs collapse to a single space, ends are trimmed

use serde::{Deserialize, Serialize};

const BARE_ALEF: char = '\u{0627}';
const YAA: char = '\u{064A}';
const HAA: char = '\u{0647}';
const ALEF_MAQSURA: char = '\u{0649}';
const TAA_MARBUTA: char = '\u{0629}';
const TATWEEL: char = '\u{0640}';

const DEFAULT_NORMALIZER: ArabicNormalizer = ArabicNormalizer::new();

/// Normalize text with the default rule set.
///
/// Total and idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    DEFAULT_NORMALIZER.normalize(text)
}

/// Arabic text normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArabicNormalizer {
    /// Remove diacritical marks (tashkeel) and Quranic annotation signs
    pub strip_diacritics: bool,
    /// Remove tatweel (kashida)
    pub strip_tatweel: bool,
    /// Map alef with hamza above/below and alef with madda to bare alef
    pub normalize_alef: bool,
    /// Map alef maqsura to yaa
    pub normalize_yaa: bool,
    /// Map taa marbuta to haa
    pub normalize_taa_marbuta: bool,
    /// Replace anything that is not a word character, whitespace or an
    /// Arabic letter with a space
    pub replace_punctuation: bool,
}

impl Default for ArabicNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ArabicNormalizer {
    /// Create a normalizer with every rule enabled.
    pub const fn new() -> Self {
        Self {
            strip_diacritics: true,
            strip_tatweel: true,
            normalize_alef: true,
            normalize_yaa: true,
            normalize_taa_marbuta: true,
            replace_punctuation: true,
        }
    }

    /// Normalize Arabic text.
    pub fn normalize(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut pending_space = false;

        for ch in text.chars() {
            if self.strip_diacritics && is_arabic_diacritic(ch) {
                continue;
            }

            if self.strip_tatweel && ch == TATWEEL {
                continue;
            }

            let ch = self.fold_letter(ch);

            if ch.is_whitespace() || (self.replace_punctuation && !is_retained(ch)) {
                pending_space = !result.is_empty();
                continue;
            }

            if pending_space {
                result.push(' ');
                pending_space = false;
            }
            result.push(ch);
        }

        result
    }

    fn fold_letter(&self, ch: char) -> char {
        match ch {
            c if self.normalize_alef && is_hamza_alef(c) => BARE_ALEF,
            ALEF_MAQSURA if self.normalize_yaa => YAA,
            TAA_MARBUTA if self.normalize_taa_marbuta => HAA,
            c => c,
        }
    }
}

/// Check if a character is an Arabic diacritical or annotation mark.
fn is_arabic_diacritic(ch: char) -> bool {
    matches!(ch,
        '\u{0610}'..='\u{061A}' | // Honorifics and small high marks
        '\u{064B}'..='\u{065F}' | // Fathatan to wavy hamza below
        '\u{0670}' |              // Superscript alef
        '\u{06D6}'..='\u{06ED}'   // Quranic annotation signs
    )
}

/// Alef variants carrying a hamza or madda.
fn is_hamza_alef(ch: char) -> bool {
    matches!(ch,
        '\u{0622}' | // Alef with madda
        '\u{0623}' | // Alef with hamza above
        '\u{0625}'   // Alef with hamza below
    )
}

fn is_arabic_block(ch: char) -> bool {
    matches!(ch as u32, 0x0600..=0x06FF)
}

/// Punctuation that lives inside the Arabic block.
fn is_arabic_punctuation(ch: char) -> bool {
    matches!(ch,
        '\u{0609}'..='\u{060D}' | // Per mille, comma, date separator
        '\u{061B}' |              // Semicolon
        '\u{061E}' |              // Triple dot
        '\u{061F}' |              // Question mark
        '\u{066A}'..='\u{066D}' | // Percent, separators, star
        '\u{06D4}'                // Full stop
    )
}

fn is_retained(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric() || (is_arabic_block(ch) && !is_arabic_punctuation(ch))
}
