//! Query pipeline: typed record predicates applied in order over a snapshot.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::matcher::{MatchStrategy, PreparedText};
use crate::record::{Corpus, NarrationRecord};

/// A single typed filter over narration records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RecordPredicate {
    /// Record source is one of `sources`.
    Source { sources: Vec<String> },
    /// Record belongs to one of `unit_ids`.
    Unit { unit_ids: Vec<String> },
    /// Record matn retells `reference` under `strategy`.
    Matn {
        reference: String,
        strategy: MatchStrategy,
    },
    /// At least `min` of the reference tokens occur in the record matn.
    MinCoverage { reference: String, min: f64 },
}

impl RecordPredicate {
    fn name(&self) -> &'static str {
        match self {
            RecordPredicate::Source { .. } => "source",
            RecordPredicate::Unit { .. } => "unit",
            RecordPredicate::Matn { .. } => "matn",
            RecordPredicate::MinCoverage { .. } => "min_coverage",
        }
    }

    fn compile(&self) -> CompiledPredicate<'_> {
        match self {
            RecordPredicate::Source { sources } => CompiledPredicate::Source(sources),
            RecordPredicate::Unit { unit_ids } => CompiledPredicate::Unit(unit_ids),
            RecordPredicate::Matn {
                reference,
                strategy,
            } => CompiledPredicate::Matn(PreparedText::new(reference), strategy),
            RecordPredicate::MinCoverage { reference, min } => {
                CompiledPredicate::MinCoverage(PreparedText::new(reference), *min)
            }
        }
    }
}

enum CompiledPredicate<'p> {
    Source(&'p [String]),
    Unit(&'p [String]),
    Matn(PreparedText, &'p MatchStrategy),
    MinCoverage(PreparedText, f64),
}

impl CompiledPredicate<'_> {
    fn accepts(&self, record: &NarrationRecord) -> bool {
        match self {
            CompiledPredicate::Source(sources) => sources.iter().any(|s| *s == record.source),
            CompiledPredicate::Unit(unit_ids) => unit_ids.iter().any(|u| *u == record.unit_id),
            CompiledPredicate::Matn(reference, strategy) => {
                reference.matches(&PreparedText::new(&record.matn), strategy)
            }
            CompiledPredicate::MinCoverage(reference, min) => reference
                .coverage(&PreparedText::new(&record.matn))
                .is_some_and(|c| c >= *min),
        }
    }
}

/// Ordered list of predicates applied over an immutable snapshot.
///
/// Each stage filters the survivors of the previous one; corpus order is
/// preserved throughout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryPipeline {
    predicates: Vec<RecordPredicate>,
}

impl QueryPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    pub fn then(mut self, predicate: RecordPredicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn apply<'a>(&self, corpus: &'a Corpus) -> Vec<&'a NarrationRecord> {
        let mut survivors: Vec<&'a NarrationRecord> = corpus.records().iter().collect();
        for predicate in &self.predicates {
            let compiled = predicate.compile();
            survivors = survivors
                .into_par_iter()
                .filter(|record| compiled.accepts(record))
                .collect();
            debug!(
                stage = predicate.name(),
                remaining = survivors.len(),
                "pipeline stage applied"
            );
            if survivors.is_empty() {
                break;
            }
        }
        survivors
    }
}
