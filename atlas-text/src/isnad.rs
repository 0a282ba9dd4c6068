//! Isnad Canonicalizer
//!
//! Derives the grouping key of a transmission chain: the normalized chain
//! with narration formulas removed token by token. Removing formulas as
//! substrings would corrupt names that happen to contain one (for example
//! "عون" contains "عن"), so the chain is always tokenized first.

use std::sync::OnceLock;

use super::formula_words::FormulaWords;
use super::normalizer::ArabicNormalizer;

/// Canonicalize an isnad with the default normalizer and formula words.
///
/// Returns `None` when nothing identifies a chain after formula removal.
pub fn canonicalize_isnad(raw: &str) -> Option<String> {
    static DEFAULT: OnceLock<IsnadCanonicalizer> = OnceLock::new();
    DEFAULT.get_or_init(IsnadCanonicalizer::default).canonicalize(raw)
}

#[derive(Debug, Clone)]
pub struct IsnadCanonicalizer {
    normalizer: ArabicNormalizer,
    formulas: FormulaWords,
}

impl Default for IsnadCanonicalizer {
    fn default() -> Self {
        Self::new(FormulaWords::narration())
    }
}

impl IsnadCanonicalizer {
    pub fn new(formulas: FormulaWords) -> Self {
        Self {
            normalizer: ArabicNormalizer::new(),
            formulas,
        }
    }

    pub fn formulas(&self) -> &FormulaWords {
        &self.formulas
    }

    pub fn canonicalize(&self, raw: &str) -> Option<String> {
        let normalized = self.normalizer.normalize(raw);
        let key = normalized
            .split_whitespace()
            .filter(|token| !self.formulas.contains(token))
            .collect::<Vec<_>>()
            .join(" ");

        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }
}
