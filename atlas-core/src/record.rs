use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One narration of a saying, as loaded from the corpus.
///
/// `position` is the record's index in the snapshot it was loaded into and
/// keeps ordering of otherwise identical rows deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NarrationRecord {
    #[serde(default)]
    pub position: usize,
    pub unit_id: String,
    pub source: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub isnad: String,
    pub matn: String,
}

impl NarrationRecord {
    pub fn new(
        unit_id: impl Into<String>,
        source: impl Into<String>,
        reference: impl Into<String>,
        isnad: impl Into<String>,
        matn: impl Into<String>,
    ) -> Self {
        Self {
            position: 0,
            unit_id: unit_id.into(),
            source: source.into(),
            reference: reference.into(),
            isnad: isnad.into(),
            matn: matn.into(),
        }
    }
}

/// Immutable snapshot of the loaded records.
///
/// Cloning shares the same allocation. Reloading builds a new snapshot, so
/// readers holding the old one are never affected.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    records: Arc<[NarrationRecord]>,
}

impl Corpus {
    /// Build a snapshot, assigning each record its origin position.
    pub fn new(records: Vec<NarrationRecord>) -> Self {
        let records: Vec<NarrationRecord> = records
            .into_iter()
            .enumerate()
            .map(|(position, record)| NarrationRecord { position, ..record })
            .collect();
        Self {
            records: records.into(),
        }
    }

    pub fn records(&self) -> &[NarrationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&NarrationRecord> {
        self.records.get(position)
    }

    /// All records of one unit, in corpus order.
    pub fn unit_records(&self, unit_id: &str) -> Vec<&NarrationRecord> {
        self.records
            .iter()
            .filter(|record| record.unit_id == unit_id)
            .collect()
    }

    /// Distinct sources in first-seen order.
    pub fn sources(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|record| record.source.as_str())
            .filter(|source| seen.insert(*source))
            .collect()
    }

    /// Whether two handles point at the same snapshot.
    pub fn same_snapshot(&self, other: &Corpus) -> bool {
        Arc::ptr_eq(&self.records, &other.records)
    }
}

impl FromIterator<NarrationRecord> for Corpus {
    fn from_iter<I: IntoIterator<Item = NarrationRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Corpus {
        Corpus::new(vec![
            NarrationRecord::new("h1", "bukhari", "1", "حدثنا الحميدي", "انما الاعمال بالنيات"),
            NarrationRecord::new("h2", "muslim", "1907", "حدثنا عبد الله", "من كذب علي"),
            NarrationRecord::new("h1", "muslim", "1907", "حدثنا القعنبي", "انما الاعمال بالنيه"),
        ])
    }

    #[test]
    fn assigns_positions_in_load_order() {
        let corpus = sample();
        let positions: Vec<_> = corpus.records().iter().map(|r| r.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(corpus.get(2).unwrap().isnad, "حدثنا القعنبي");
    }

    #[test]
    fn duplicate_rows_stay_distinct_by_position() {
        let row = NarrationRecord::new("h1", "s", "r", "i", "m");
        let corpus = Corpus::new(vec![row.clone(), row]);
        assert_ne!(corpus.records()[0], corpus.records()[1]);
    }

    #[test]
    fn unit_records_and_sources() {
        let corpus = sample();
        assert_eq!(corpus.unit_records("h1").len(), 2);
        assert!(corpus.unit_records("missing").is_empty());
        assert_eq!(corpus.sources(), vec!["bukhari", "muslim"]);
    }

    #[test]
    fn clones_share_the_snapshot() {
        let corpus = sample();
        let reader = corpus.clone();
        assert!(reader.same_snapshot(&corpus));

        let reloaded: Corpus = corpus.records().iter().cloned().collect();
        assert!(!reloaded.same_snapshot(&corpus));
        assert_eq!(reloaded.len(), corpus.len());
    }
}
