//! Configuration
//!
//! JSON config file for the corpus location, match thresholds and extra
//! narration formulas. A missing file section falls back to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use atlas_core::{MatchStrategy, UnitGrouper};
use atlas_text::{FormulaWords, IsnadCanonicalizer};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("match threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f64),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_short_phrase_max_len")]
    pub short_phrase_max_len: usize,
}

fn default_threshold() -> f64 {
    MatchStrategy::DEFAULT_THRESHOLD
}

fn default_short_phrase_max_len() -> usize {
    MatchStrategy::DEFAULT_SHORT_PHRASE_MAX_LEN
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            short_phrase_max_len: default_short_phrase_max_len(),
        }
    }
}

impl MatchingConfig {
    pub fn core_strategy(&self) -> MatchStrategy {
        MatchStrategy::Core {
            threshold: self.threshold,
            short_phrase_max_len: self.short_phrase_max_len,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AtlasConfig {
    /// Corpus file (CSV or JSON).
    #[serde(default)]
    pub corpus_path: Option<PathBuf>,
    #[serde(default)]
    pub matching: MatchingConfig,
    /// Extra narration formulas, one per line, merged with the defaults.
    #[serde(default)]
    pub formula_words_path: Option<PathBuf>,
}

impl AtlasConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_path(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn from_env_or_default() -> Result<Self, ConfigError> {
        match std::env::var("ATLAS_CONFIG") {
            Ok(path) => Self::from_path(path),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.matching.threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        Ok(())
    }

    /// Grouper using the default formulas plus any configured extras.
    pub fn grouper(&self) -> Result<UnitGrouper, ConfigError> {
        let mut formulas = FormulaWords::narration();
        if let Some(path) = &self.formula_words_path {
            formulas.merge(&FormulaWords::from_file(path)?);
        }
        let grouper = UnitGrouper::new(IsnadCanonicalizer::new(formulas));
        debug!(
            formulas = grouper.canonicalizer().formulas().len(),
            "narration formulas loaded"
        );
        Ok(grouper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_core_strategy() {
        let config = AtlasConfig::default();
        assert_eq!(config.matching.core_strategy(), MatchStrategy::core());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas.json");
        fs::write(&path, r#"{"matching": {"threshold": 0.9}}"#).unwrap();

        let config = AtlasConfig::from_path(&path).unwrap();
        assert_eq!(config.matching.threshold, 0.9);
        assert_eq!(config.matching.short_phrase_max_len, 4);
        assert_eq!(config.corpus_path, None);
    }

    #[test]
    fn persist_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas.json");
        let config = AtlasConfig {
            corpus_path: Some(dir.path().join("hadith.csv")),
            ..AtlasConfig::default()
        };
        config.to_path(&path).unwrap();
        assert_eq!(AtlasConfig::from_path(&path).unwrap(), config);
    }

    #[test]
    fn rejects_bad_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas.json");
        fs::write(&path, r#"{"matching": {"threshold": 1.5}}"#).unwrap();
        assert!(matches!(
            AtlasConfig::from_path(&path),
            Err(ConfigError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn grouper_merges_formula_file() {
        let dir = tempfile::tempdir().unwrap();
        let words = dir.path().join("formulas.txt");
        fs::write(&words, "# extra\nحدثني\n").unwrap();
        let config = AtlasConfig {
            formula_words_path: Some(words),
            ..AtlasConfig::default()
        };
        let grouper = config.grouper().unwrap();
        assert_eq!(grouper.canonicalizer().formulas().len(), 6);
        assert_eq!(
            grouper.canonicalizer().canonicalize("حدثني مالك عن نافع").as_deref(),
            Some("مالك نافع")
        );
    }

    #[test]
    fn env_var_names_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas.json");
        fs::write(&path, r#"{"matching": {"short_phrase_max_len": 2}}"#).unwrap();

        // only this test touches ATLAS_CONFIG
        std::env::set_var("ATLAS_CONFIG", &path);
        let config = AtlasConfig::from_env_or_default();
        std::env::remove_var("ATLAS_CONFIG");

        assert_eq!(config.unwrap().matching.short_phrase_max_len, 2);
        assert_eq!(AtlasConfig::from_env_or_default().unwrap(), AtlasConfig::default());
    }
}
