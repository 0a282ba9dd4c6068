//! Search Engine
//!
//! Read-only facade over one corpus snapshot: multi-line search, unit
//! lookup and unit analysis against the first record's matn.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::grouping::{HadithUnit, UnitGrouper};
use crate::matcher::{MatchStrategy, PreparedText};
use crate::pipeline::{QueryPipeline, RecordPredicate};
use crate::record::{Corpus, NarrationRecord};

/// Options for a search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Strategy used to match each query line against record matns.
    pub strategy: MatchStrategy,
    /// Restrict to these sources; empty means every source.
    pub sources: Vec<String>,
    /// Strategy used to discover the paths of a unit from its reference matn.
    pub unit_strategy: MatchStrategy,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::core(),
            sources: Vec::new(),
            unit_strategy: MatchStrategy::core(),
        }
    }
}

impl SearchOptions {
    /// Loose search: all tokens OR phrase containment.
    pub fn loose() -> Self {
        Self {
            strategy: MatchStrategy::loose(),
            ..Self::default()
        }
    }

    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = sources;
        self
    }

    /// Pipeline for one query line.
    pub fn pipeline(&self, query: &str) -> QueryPipeline {
        let mut pipeline = QueryPipeline::new();
        if !self.sources.is_empty() {
            pipeline = pipeline.then(RecordPredicate::Source {
                sources: self.sources.clone(),
            });
        }
        pipeline.then(RecordPredicate::Matn {
            reference: query.to_owned(),
            strategy: self.strategy.clone(),
        })
    }
}

/// Matches grouped as units, then paths, then records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults<'a> {
    pub queries: Vec<String>,
    pub units: Vec<HadithUnit<'a>>,
}

impl SearchResults<'_> {
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn record_count(&self) -> usize {
        self.units.iter().map(|unit| unit.records.len()).sum()
    }
}

/// One unit narrowed to the records that retell its reference matn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitAnalysis<'a> {
    pub unit: HadithUnit<'a>,
    /// Unit records whose matn does not match the reference.
    pub divergent: Vec<&'a NarrationRecord>,
}

/// Read-only query facade over one corpus snapshot.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    corpus: Corpus,
    grouper: UnitGrouper,
}

impl Engine {
    pub fn new(corpus: Corpus) -> Self {
        Self {
            corpus,
            grouper: UnitGrouper::default(),
        }
    }

    pub fn with_grouper(mut self, grouper: UnitGrouper) -> Self {
        self.grouper = grouper;
        self
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn grouper(&self) -> &UnitGrouper {
        &self.grouper
    }

    /// Engine over a new snapshot with the same settings. Queries running
    /// against `self` keep reading the old snapshot.
    pub fn reload(&self, corpus: Corpus) -> Engine {
        Engine {
            corpus,
            grouper: self.grouper.clone(),
        }
    }

    /// Run every non-empty line of `query_text` as its own query and group
    /// the union of their matches.
    pub fn search(&self, query_text: &str, options: &SearchOptions) -> SearchResults<'_> {
        let queries: Vec<String> = query_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();

        let mut matched: BTreeMap<usize, &NarrationRecord> = BTreeMap::new();
        for query in &queries {
            let hits = options.pipeline(query).apply(&self.corpus);
            debug!(query = %query, hits = hits.len(), "query line matched");
            matched.extend(hits.into_iter().map(|record| (record.position, record)));
        }

        let units = self.grouper.group_units(matched.into_values());
        let results = SearchResults { queries, units };
        info!(
            units = results.unit_count(),
            records = results.record_count(),
            "search complete"
        );
        results
    }

    /// Every record of a unit grouped into paths, without filtering.
    pub fn unit(&self, unit_id: &str) -> Option<HadithUnit<'_>> {
        let records = self.corpus.unit_records(unit_id);
        if records.is_empty() {
            return None;
        }
        Some(self.grouper.build_unit(records))
    }

    /// Take the first record's matn as the unit reference, keep the unit
    /// records that retell it under `strategy`, and group them into paths.
    pub fn analyze_unit(&self, unit_id: &str, strategy: &MatchStrategy) -> Option<UnitAnalysis<'_>> {
        let records = self.corpus.unit_records(unit_id);
        let first = *records.first()?;
        let reference = PreparedText::new(&first.matn);

        let (retellings, divergent): (Vec<_>, Vec<_>) = records
            .into_iter()
            .partition(|record| reference.matches(&PreparedText::new(&record.matn), strategy));

        let mut unit = self.grouper.build_unit(retellings);
        unit.unit_id = first.unit_id.clone();
        unit.reference_matn = &first.matn;

        info!(
            unit = %unit_id,
            paths = unit.paths.len(),
            divergent = divergent.len(),
            "unit analysed"
        );
        Some(UnitAnalysis { unit, divergent })
    }
}
