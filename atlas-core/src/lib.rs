//! Narration matching and attestation scoring.
//!
//! Records are matched against a reference text, partitioned into hadith
//! units and narration paths, and analyst-supplied path scores are folded
//! into one bounded unit score.

mod engine;
mod grouping;
mod matcher;
mod pipeline;
mod record;
mod scoring;
mod session;
mod verdict;

pub use engine::{Engine, SearchOptions, SearchResults, UnitAnalysis};
pub use grouping::{HadithUnit, NarrationPath, PathGrouping, UnitGrouper};
pub use matcher::{coverage, matches, MatchStrategy, PreparedText};
pub use pipeline::{QueryPipeline, RecordPredicate};
pub use record::{Corpus, NarrationRecord};
pub use scoring::{
    aggregate, compute_unit_score, validate_path_scores, AggregateScore, AttestationScorer,
    FormulaVersion, PathScore, ScoreError,
};
pub use session::{
    transition, view, AnalysisView, PathView, SessionEvent, SessionState, SessionView,
    UnitSummary,
};
pub use verdict::{
    band, classify, render_band, AnalystVerdict, Band, Ruling, UnitAssessment, RAMP_STEPS,
};

pub use atlas_text::{canonicalize_isnad, normalize, tokenize};
