//! Arabic Text Canonicalization
//!
//! Normalization, tokenization and transmission-chain canonicalization used
//! to compare narration records.

mod formula_words;
mod isnad;
mod normalizer;
mod tokenizer;

pub use formula_words::{FormulaWords, DEFAULT_NARRATION_FORMULAS};
pub use isnad::{canonicalize_isnad, IsnadCanonicalizer};
pub use normalizer::{normalize, ArabicNormalizer};
pub use tokenizer::tokenize;
