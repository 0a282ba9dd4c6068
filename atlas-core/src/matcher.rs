//! Reference Matcher
//!
//! Decides whether a candidate text retells a reference text. Matching is
//! token coverage only; there is no edit-distance tolerance.

use std::collections::HashSet;

use atlas_text::normalize;
use serde::{Deserialize, Serialize};

/// Strategy used to compare a reference text with a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Every reference token occurs somewhere in the candidate.
    AllTokens,
    /// Reference token coverage reaches `threshold`. References of at most
    /// `short_phrase_max_len` tokens must be covered completely.
    Core {
        threshold: f64,
        short_phrase_max_len: usize,
    },
    /// The normalized candidate contains the normalized reference.
    PhraseContains,
    /// Any of the inner strategies matches.
    AnyOf { strategies: Vec<MatchStrategy> },
}

impl Default for MatchStrategy {
    fn default() -> Self {
        Self::core()
    }
}

impl MatchStrategy {
    pub const DEFAULT_THRESHOLD: f64 = 0.8;
    pub const DEFAULT_SHORT_PHRASE_MAX_LEN: usize = 4;

    /// Core match with the default threshold and short-phrase length.
    pub fn core() -> Self {
        Self::Core {
            threshold: Self::DEFAULT_THRESHOLD,
            short_phrase_max_len: Self::DEFAULT_SHORT_PHRASE_MAX_LEN,
        }
    }

    /// All-tokens OR phrase containment.
    pub fn loose() -> Self {
        Self::AnyOf {
            strategies: vec![Self::AllTokens, Self::PhraseContains],
        }
    }

    pub fn matches(&self, reference: &str, candidate: &str) -> bool {
        matches(reference, candidate, self)
    }

    fn evaluate(&self, reference: &PreparedText, candidate: &CandidateView<'_>) -> bool {
        let tokens = &reference.tokens;
        match self {
            MatchStrategy::AllTokens => {
                !tokens.is_empty() && tokens.iter().all(|t| candidate.tokens.contains(t.as_str()))
            }
            MatchStrategy::Core {
                threshold,
                short_phrase_max_len,
            } => {
                if tokens.is_empty() {
                    return false;
                }
                let shared = shared_tokens(reference, candidate);
                if tokens.len() <= *short_phrase_max_len {
                    shared == tokens.len()
                } else {
                    shared as f64 / tokens.len() as f64 >= *threshold
                }
            }
            MatchStrategy::PhraseContains => {
                !reference.normalized.is_empty()
                    && candidate.normalized.contains(reference.normalized.as_str())
            }
            MatchStrategy::AnyOf { strategies } => {
                strategies.iter().any(|s| s.evaluate(reference, candidate))
            }
        }
    }
}

/// Normalized text and its tokens, computed once and reused across
/// many comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedText {
    normalized: String,
    tokens: Vec<String>,
}

impl PreparedText {
    pub fn new(text: &str) -> Self {
        let normalized = normalize(text);
        let tokens = normalized.split_whitespace().map(str::to_owned).collect();
        Self { normalized, tokens }
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Match this text, as the reference, against a candidate.
    pub fn matches(&self, candidate: &PreparedText, strategy: &MatchStrategy) -> bool {
        strategy.evaluate(self, &CandidateView::new(candidate))
    }

    /// Share of this text's tokens present in the candidate.
    pub fn coverage(&self, candidate: &PreparedText) -> Option<f64> {
        if self.tokens.is_empty() {
            return None;
        }
        let shared = shared_tokens(self, &CandidateView::new(candidate));
        Some(shared as f64 / self.tokens.len() as f64)
    }
}

struct CandidateView<'a> {
    normalized: &'a str,
    tokens: HashSet<&'a str>,
}

impl<'a> CandidateView<'a> {
    fn new(text: &'a PreparedText) -> Self {
        Self {
            normalized: &text.normalized,
            tokens: text.tokens.iter().map(String::as_str).collect(),
        }
    }
}

/// Reference tokens (counted with multiplicity) present in the candidate set.
fn shared_tokens(reference: &PreparedText, candidate: &CandidateView<'_>) -> usize {
    reference
        .tokens
        .iter()
        .filter(|t| candidate.tokens.contains(t.as_str()))
        .count()
}

/// Whether `candidate` retells `reference` under `strategy`.
///
/// Not symmetric. An empty reference never matches.
pub fn matches(reference: &str, candidate: &str, strategy: &MatchStrategy) -> bool {
    PreparedText::new(reference).matches(&PreparedText::new(candidate), strategy)
}

/// Share of reference tokens present in the candidate; `None` for an
/// empty reference.
pub fn coverage(reference: &str, candidate: &str) -> Option<f64> {
    PreparedText::new(reference).coverage(&PreparedText::new(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NIYYAT: &str = "إنما الأعمال بالنيات";
    const NIYYAT_LONG: &str = "إنما الأعمال بالنيات وانما لكل امرئ ما نوى";

    #[test]
    fn core_match_short_reference_fully_covered() {
        assert!(matches(NIYYAT, NIYYAT_LONG, &MatchStrategy::core()));
    }

    #[test]
    fn core_match_short_reference_missing_one_token() {
        let candidate = "إنما الأعمال بالنية";
        assert!(!matches(NIYYAT, candidate, &MatchStrategy::core()));
    }

    #[test]
    fn core_match_long_reference_uses_threshold() {
        // five reference tokens, four present: 0.8 coverage
        let reference = "من كذب علي متعمدا فليتبوا";
        let four_of_five = "من كذب علي متعمدا فليتقعد";
        let three_of_five = "من كذب علي عامدا فليتقعد";
        assert!(matches(reference, four_of_five, &MatchStrategy::core()));
        assert!(!matches(reference, three_of_five, &MatchStrategy::core()));
    }

    #[test]
    fn core_match_checks_candidate_by_set_membership() {
        let reference = "قال قال قال قال قال نعم";
        assert!(matches(reference, "قال", &MatchStrategy::core()));
        assert_eq!(coverage(reference, "قال"), Some(5.0 / 6.0));
    }

    #[test]
    fn custom_core_parameters() {
        let strict = MatchStrategy::Core {
            threshold: 1.0,
            short_phrase_max_len: 0,
        };
        let reference = "من كذب علي متعمدا فليتبوا";
        assert!(!matches(reference, "من كذب علي متعمدا", &strict));
        assert!(matches(reference, reference, &strict));
    }

    #[test]
    fn all_tokens_ignores_order() {
        assert!(matches("بالنيات الاعمال", NIYYAT, &MatchStrategy::AllTokens));
        assert!(!matches(NIYYAT_LONG, NIYYAT, &MatchStrategy::AllTokens));
    }

    #[test]
    fn phrase_contains_requires_contiguity() {
        assert!(matches("الأعمال بالنيات", NIYYAT_LONG, &MatchStrategy::PhraseContains));
        assert!(!matches("بالنيات الأعمال", NIYYAT_LONG, &MatchStrategy::PhraseContains));
    }

    #[test]
    fn loose_combines_with_or() {
        let loose = MatchStrategy::loose();
        assert!(matches("بالنيات الاعمال", NIYYAT, &loose));
        assert!(matches("الأعمال بالني", NIYYAT, &loose));
        assert!(!matches("الصيام جنه", NIYYAT, &loose));
    }

    #[test]
    fn empty_reference_never_matches() {
        for strategy in [
            MatchStrategy::core(),
            MatchStrategy::AllTokens,
            MatchStrategy::PhraseContains,
            MatchStrategy::loose(),
        ] {
            assert!(!matches("", NIYYAT, &strategy));
            assert!(!matches(" ، ", NIYYAT, &strategy));
        }
        assert_eq!(coverage("", NIYYAT), None);
    }

    #[test]
    fn matching_is_not_symmetric() {
        let strategy = MatchStrategy::core();
        assert!(matches(NIYYAT, NIYYAT_LONG, &strategy));
        assert!(!matches(NIYYAT_LONG, NIYYAT, &strategy));
    }

    #[test]
    fn strategy_serde_shape() {
        let json = serde_json::to_value(MatchStrategy::core()).unwrap();
        assert_eq!(json["kind"], "core");
        assert_eq!(json["short_phrase_max_len"], 4);

        let parsed: MatchStrategy = serde_json::from_str(
            r#"{"kind":"any_of","strategies":[{"kind":"all_tokens"},{"kind":"phrase_contains"}]}"#,
        )
        .unwrap();
        assert_eq!(parsed, MatchStrategy::loose());
    }
}
