//! Narration Formula Vocabulary
//!
//! The transmission formulas ("narrated to us", "informed us", "said",
//! "heard", "from") that link narrator names inside an isnad. Entries are
//! stored in normalized form so lookups compare against normalized tokens.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::normalizer::normalize;

/// Default narration formulas.
pub static DEFAULT_NARRATION_FORMULAS: &[&str] = &[
    "حدثنا", // narrated to us
    "أخبرنا", // informed us
    "قال",   // said
    "سمعت",  // heard
    "عن",    // from
];

/// Configurable set of formula words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormulaWords {
    words: HashSet<String>,
}

impl FormulaWords {
    /// Create an empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a slice of words. Each word is normalized first.
    pub fn from_slice(words: &[&str]) -> Self {
        let mut vocabulary = Self::new();
        vocabulary.add_words(words);
        vocabulary
    }

    /// The five fixed narration formulas.
    pub fn narration() -> Self {
        Self::from_slice(DEFAULT_NARRATION_FORMULAS)
    }

    /// Load formula words from a file (one word per line, `#` comments).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, std::io::Error> {
        let content = fs::read_to_string(path)?;
        let mut vocabulary = Self::new();
        for line in content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
        {
            vocabulary.add(line);
        }
        Ok(vocabulary)
    }

    /// Add a word. Words that normalize to nothing, or to more than one
    /// token, are ignored since removal is token by token.
    pub fn add(&mut self, word: &str) {
        let normalized = normalize(word);
        if !normalized.is_empty() && !normalized.contains(' ') {
            self.words.insert(normalized);
        }
    }

    /// Add multiple words.
    pub fn add_words(&mut self, words: &[&str]) {
        for word in words {
            self.add(word);
        }
    }

    /// Check if a normalized token is a formula word.
    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Merge with another vocabulary.
    pub fn merge(&mut self, other: &FormulaWords) {
        self.words.extend(other.words.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn narration_formulas_are_normalized() {
        let words = FormulaWords::narration();
        assert_eq!(words.len(), 5);
        assert!(words.contains("حدثنا"));
        assert!(words.contains("اخبرنا"));
        assert!(!words.contains("أخبرنا"));
        assert!(words.contains("عن"));
        assert!(!words.contains("مالك"));
    }

    #[test]
    fn ignores_blank_and_multi_token_entries() {
        let mut words = FormulaWords::new();
        words.add("  ");
        words.add("حدثني فلان");
        words.add("َ");
        assert!(words.is_empty());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# extra formulas").unwrap();
        writeln!(file, "حدَّثني").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "أنبأنا").unwrap();

        let words = FormulaWords::from_file(file.path()).unwrap();
        assert_eq!(words.len(), 2);
        assert!(words.contains("حدثني"));
        assert!(words.contains("انبانا"));
    }

    #[test]
    fn merges_vocabularies() {
        let mut words = FormulaWords::narration();
        words.merge(&FormulaWords::from_slice(&["حدثني"]));
        assert_eq!(words.len(), 6);
        assert!(words.contains("حدثني"));
    }
}
