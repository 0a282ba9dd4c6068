//! Unit Grouper
//!
//! Partitions records into hadith units by unit id and, inside a unit, into
//! narration paths by canonical isnad. Groups keep first-seen order.

use std::collections::HashMap;

use atlas_text::IsnadCanonicalizer;
use serde::Serialize;
use tracing::warn;

use crate::record::NarrationRecord;

/// Records of one unit sharing a canonical isnad.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrationPath<'a> {
    pub key: String,
    pub records: Vec<&'a NarrationRecord>,
}

/// Paths of a unit plus the records that could not be attributed to one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PathGrouping<'a> {
    pub paths: Vec<NarrationPath<'a>>,
    pub unattributed: Vec<&'a NarrationRecord>,
}

/// A group of records believed to convey the same saying.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HadithUnit<'a> {
    pub unit_id: String,
    /// Matn of the first record encountered for this unit.
    pub reference_matn: &'a str,
    pub records: Vec<&'a NarrationRecord>,
    pub paths: Vec<NarrationPath<'a>>,
    /// Records without a canonical isnad; they take no part in scoring.
    pub unattributed: Vec<&'a NarrationRecord>,
}

impl<'a> HadithUnit<'a> {
    pub fn path(&self, key: &str) -> Option<&NarrationPath<'a>> {
        self.paths.iter().find(|path| path.key == key)
    }

    pub fn path_keys(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(|path| path.key.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct UnitGrouper {
    canonicalizer: IsnadCanonicalizer,
}

impl UnitGrouper {
    pub fn new(canonicalizer: IsnadCanonicalizer) -> Self {
        Self { canonicalizer }
    }

    pub fn canonicalizer(&self) -> &IsnadCanonicalizer {
        &self.canonicalizer
    }

    /// Group records by unit id. Each unit id appears exactly once in the
    /// result.
    pub fn group_units<'a, I>(&self, records: I) -> Vec<HadithUnit<'a>>
    where
        I: IntoIterator<Item = &'a NarrationRecord>,
    {
        let mut index: HashMap<&'a str, usize> = HashMap::new();
        let mut buckets: Vec<Vec<&'a NarrationRecord>> = Vec::new();

        for record in records {
            let slot = *index.entry(record.unit_id.as_str()).or_insert_with(|| {
                buckets.push(Vec::new());
                buckets.len() - 1
            });
            buckets[slot].push(record);
        }

        buckets
            .into_iter()
            .map(|records| self.build_unit(records))
            .collect()
    }

    /// Group one unit's records by canonical isnad, dropping records that
    /// have none into `unattributed`.
    pub fn group_paths<'a>(&self, records: &[&'a NarrationRecord]) -> PathGrouping<'a> {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut grouping = PathGrouping::default();

        for record in records.iter().copied() {
            let Some(key) = self.canonicalizer.canonicalize(&record.isnad) else {
                warn!(
                    unit = %record.unit_id,
                    position = record.position,
                    "record has no canonical isnad; excluded from paths"
                );
                grouping.unattributed.push(record);
                continue;
            };

            match index.get(&key) {
                Some(&slot) => grouping.paths[slot].records.push(record),
                None => {
                    index.insert(key.clone(), grouping.paths.len());
                    grouping.paths.push(NarrationPath {
                        key,
                        records: vec![record],
                    });
                }
            }
        }

        grouping
    }

    /// Build a unit from records that all share one unit id.
    pub(crate) fn build_unit<'a>(&self, records: Vec<&'a NarrationRecord>) -> HadithUnit<'a> {
        let first = records.first().copied();
        let PathGrouping {
            paths,
            unattributed,
        } = self.group_paths(&records);

        HadithUnit {
            unit_id: first.map(|r| r.unit_id.clone()).unwrap_or_default(),
            reference_matn: first.map(|r| r.matn.as_str()).unwrap_or_default(),
            records,
            paths,
            unattributed,
        }
    }
}
