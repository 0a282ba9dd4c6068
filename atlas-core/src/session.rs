//! Analyst session as an explicit state machine.
//!
//! `transition` is pure and total. `view` derives everything needed to
//! render the current state from the state and a corpus snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{Engine, SearchOptions, SearchResults};
use crate::record::NarrationRecord;
use crate::scoring::{aggregate, PathScore};
use crate::verdict::{band, classify, AnalystVerdict, Band, UnitAssessment};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum SessionState {
    Search {
        query: String,
    },
    Unit {
        query: String,
        unit_id: String,
    },
    Analysis {
        query: String,
        unit_id: String,
        scores: BTreeMap<String, PathScore>,
        verdict: Option<AnalystVerdict>,
    },
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Search {
            query: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    Query { text: String },
    OpenUnit { unit_id: String },
    Analyze,
    ScorePath { path: String, score: PathScore },
    ClearScore { path: String },
    RecordVerdict { verdict: AnalystVerdict },
    Back,
    Reset,
}

/// Next state. Events that do not apply to the current state leave it
/// unchanged.
pub fn transition(state: SessionState, event: SessionEvent) -> SessionState {
    use SessionEvent as E;
    use SessionState as S;

    match (state, event) {
        (_, E::Reset) => S::default(),
        (_, E::Query { text }) => S::Search { query: text },
        (S::Search { query }, E::OpenUnit { unit_id }) => S::Unit { query, unit_id },
        (S::Unit { query, unit_id }, E::Analyze) => S::Analysis {
            query,
            unit_id,
            scores: BTreeMap::new(),
            verdict: None,
        },
        (
            S::Analysis {
                query,
                unit_id,
                mut scores,
                verdict,
            },
            E::ScorePath { path, score },
        ) => {
            scores.insert(path, score);
            S::Analysis {
                query,
                unit_id,
                scores,
                verdict,
            }
        }
        (
            S::Analysis {
                query,
                unit_id,
                mut scores,
                verdict,
            },
            E::ClearScore { path },
        ) => {
            scores.remove(&path);
            S::Analysis {
                query,
                unit_id,
                scores,
                verdict,
            }
        }
        (
            S::Analysis {
                query,
                unit_id,
                scores,
                ..
            },
            E::RecordVerdict { verdict },
        ) => S::Analysis {
            query,
            unit_id,
            scores,
            verdict: Some(verdict),
        },
        (S::Analysis { query, unit_id, .. }, E::Back) => S::Unit { query, unit_id },
        (S::Unit { query, .. }, E::Back) => S::Search { query },
        (state, event) => {
            debug!(?event, "event ignored in current state");
            state
        }
    }
}

/// Every record of a unit, unfiltered.
///
/// Counts here cover divergent retellings too, so `path_count` can exceed
/// the number of paths in the analysis of the same unit, which keeps only
/// records matching the reference matn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitSummary<'a> {
    pub unit_id: String,
    pub reference_matn: &'a str,
    pub record_count: usize,
    /// Paths over all unit records, divergent ones included.
    pub path_count: usize,
    pub records: Vec<&'a NarrationRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathView<'a> {
    pub key: String,
    pub records: Vec<&'a NarrationRecord>,
    pub score: Option<PathScore>,
    pub band: Option<Band>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisView<'a> {
    pub unit_id: String,
    pub reference_matn: &'a str,
    pub paths: Vec<PathView<'a>>,
    pub divergent: Vec<&'a NarrationRecord>,
    pub unattributed: Vec<&'a NarrationRecord>,
    pub assessment: UnitAssessment,
    /// Unit description for the band; absent without a score.
    pub description: Option<&'static str>,
    pub verdict: Option<AnalystVerdict>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum SessionView<'a> {
    Search {
        query: String,
        results: Option<SearchResults<'a>>,
    },
    Unit(UnitSummary<'a>),
    Analysis(AnalysisView<'a>),
    MissingUnit {
        unit_id: String,
    },
}

pub fn view<'a>(state: &SessionState, engine: &'a Engine, options: &SearchOptions) -> SessionView<'a> {
    match state {
        SessionState::Search { query } => {
            let results = if query.trim().is_empty() {
                None
            } else {
                Some(engine.search(query, options))
            };
            SessionView::Search {
                query: query.clone(),
                results,
            }
        }
        SessionState::Unit { unit_id, .. } => match engine.unit(unit_id) {
            Some(unit) => SessionView::Unit(UnitSummary {
                record_count: unit.records.len(),
                path_count: unit.paths.len(),
                unit_id: unit.unit_id,
                reference_matn: unit.reference_matn,
                records: unit.records,
            }),
            None => SessionView::MissingUnit {
                unit_id: unit_id.clone(),
            },
        },
        SessionState::Analysis {
            unit_id,
            scores,
            verdict,
            ..
        } => match engine.analyze_unit(unit_id, &options.unit_strategy) {
            Some(analysis) => {
                let unit = analysis.unit;
                let paths: Vec<PathView<'a>> = unit
                    .paths
                    .into_iter()
                    .map(|path| {
                        let score = scores.get(&path.key).copied();
                        PathView {
                            band: score.map(|s| band(s.value())),
                            score,
                            key: path.key,
                            records: path.records,
                        }
                    })
                    .collect();

                let scored: Vec<PathScore> = paths.iter().filter_map(|p| p.score).collect();
                let assessment = classify(aggregate(&scored).as_ref());
                let description = match &assessment {
                    UnitAssessment::Scored { band, .. } => Some(band.description()),
                    UnitAssessment::InsufficientData => None,
                };

                SessionView::Analysis(AnalysisView {
                    unit_id: unit.unit_id,
                    reference_matn: unit.reference_matn,
                    paths,
                    divergent: analysis.divergent,
                    unattributed: unit.unattributed,
                    assessment,
                    description,
                    verdict: verdict.clone(),
                })
            }
            None => SessionView::MissingUnit {
                unit_id: unit_id.clone(),
            },
        },
    }
}
