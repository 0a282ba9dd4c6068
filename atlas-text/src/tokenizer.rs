//! Tokenizer
//!
//! Splits normalized text into an ordered token sequence.

use super::normalizer::normalize;

/// Tokenize text with the default normalizer.
///
/// Order and duplicates are preserved; no token is ever empty.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text).split_whitespace().map(str::to_owned).collect()
}
