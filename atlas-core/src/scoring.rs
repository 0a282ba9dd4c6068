//! Attestation Scorer
//!
//! Folds analyst-supplied path scores into one unit score:
//!
//! `clamp(0.6·max + 0.3·mean + 0.1·min(n, 5) + bonus, 0, 10)`, rounded to
//! one decimal, where `bonus = 1` when a single path scores at least 8.
//!
//! The result is non-decreasing in every path score and always lies in
//! `[0, 10]`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    #[error("path score {0} is outside [0, 10]")]
    OutOfRange(f64),

    #[error("path score must be a finite number")]
    NotFinite,

    #[error("path {0} was scored more than once")]
    DuplicatePath(String),
}

/// Strength of one narration path, in `[0, 10]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct PathScore(f64);

impl PathScore {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 10.0;

    pub fn new(value: f64) -> Result<Self, ScoreError> {
        if !value.is_finite() {
            return Err(ScoreError::NotFinite);
        }
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ScoreError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for PathScore {
    type Error = ScoreError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PathScore> for f64 {
    fn from(score: PathScore) -> Self {
        score.0
    }
}

/// Identifies the weights an aggregate was computed with. Stored scores
/// must only be compared within one version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormulaVersion {
    /// `0.5·max + 0.3·mean + 0.2·strong_paths`, capped at 10.
    V1,
    /// `0.6·max + 0.3·mean + 0.1·min(n, 5) + single-path bonus`.
    V2,
}

impl FormulaVersion {
    pub const CURRENT: FormulaVersion = FormulaVersion::V2;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateScore {
    pub value: f64,
    pub path_count: usize,
    pub formula: FormulaVersion,
}

/// Weights of the current formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttestationScorer {
    pub max_weight: f64,
    pub mean_weight: f64,
    pub count_weight: f64,
    pub count_cap: usize,
    pub single_path_bonus: f64,
    pub single_path_bonus_floor: f64,
}

impl Default for AttestationScorer {
    fn default() -> Self {
        Self {
            max_weight: 0.6,
            mean_weight: 0.3,
            count_weight: 0.1,
            count_cap: 5,
            single_path_bonus: 1.0,
            single_path_bonus_floor: 8.0,
        }
    }
}

impl AttestationScorer {
    pub fn formula(&self) -> FormulaVersion {
        FormulaVersion::CURRENT
    }

    /// `None` when there are no paths to judge.
    pub fn aggregate(&self, scores: &[PathScore]) -> Option<AggregateScore> {
        if scores.is_empty() {
            return None;
        }

        let n = scores.len();
        let max = scores.iter().map(|s| s.0).fold(PathScore::MIN, f64::max);
        let mean = scores.iter().map(|s| s.0).sum::<f64>() / n as f64;
        let bonus = if n == 1 && max >= self.single_path_bonus_floor {
            self.single_path_bonus
        } else {
            0.0
        };

        let raw = self.max_weight * max
            + self.mean_weight * mean
            + self.count_weight * n.min(self.count_cap) as f64
            + bonus;
        let value = (raw.clamp(PathScore::MIN, PathScore::MAX) * 10.0).round() / 10.0;

        Some(AggregateScore {
            value,
            path_count: n,
            formula: self.formula(),
        })
    }
}

/// Aggregate with the default weights.
pub fn aggregate(scores: &[PathScore]) -> Option<AggregateScore> {
    AttestationScorer::default().aggregate(scores)
}

/// Validate keyed path scores and aggregate them.
///
/// Each path may be scored once; every value must lie in `[0, 10]`.
pub fn compute_unit_score<K, I>(path_scores: I) -> Result<Option<AggregateScore>, ScoreError>
where
    K: AsRef<str>,
    I: IntoIterator<Item = (K, f64)>,
{
    let scores: Vec<PathScore> = validate_path_scores(path_scores)?
        .into_iter()
        .map(|(_, score)| score)
        .collect();
    Ok(aggregate(&scores))
}

/// Check keyed path scores without aggregating them, keeping input order.
///
/// Fails on the first key seen twice or the first value outside `[0, 10]`.
pub fn validate_path_scores<K, I>(path_scores: I) -> Result<Vec<(String, PathScore)>, ScoreError>
where
    K: AsRef<str>,
    I: IntoIterator<Item = (K, f64)>,
{
    let mut seen = HashSet::new();
    let mut validated = Vec::new();
    for (key, value) in path_scores {
        let key = key.as_ref();
        if !seen.insert(key.to_owned()) {
            return Err(ScoreError::DuplicatePath(key.to_owned()));
        }
        validated.push((key.to_owned(), PathScore::new(value)?));
    }
    Ok(validated)
}
