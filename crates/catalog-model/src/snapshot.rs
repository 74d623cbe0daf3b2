use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::product::{ProductKey, ProductRecord};

/// Where a snapshot was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    /// Bare file name, used to tell the current trigger apart from archived files.
    pub file_name: String,
    pub path: PathBuf,
    pub modified: Option<DateTime<Utc>>,
}

/// One full read of the source catalog.
///
/// Records keep source order; that order is what the front-end displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub source: SourceInfo,
    pub records: Vec<ProductRecord>,
}

impl Snapshot {
    #[must_use]
    pub fn new(source: SourceInfo, records: Vec<ProductRecord>) -> Self {
        Self { source, records }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index the records by composite key.
    #[must_use]
    pub fn index(&self) -> RecordIndex<'_> {
        RecordIndex::build(&self.records)
    }
}

/// Records keyed by `(code, unit)` with map-assignment semantics.
///
/// A key keeps the position of its first occurrence while the record of its
/// last occurrence wins, so iteration follows source order.
#[derive(Debug)]
pub struct RecordIndex<'a> {
    order: Vec<ProductKey>,
    by_key: HashMap<ProductKey, &'a ProductRecord>,
    codes: HashSet<&'a str>,
}

impl<'a> RecordIndex<'a> {
    fn build(records: &'a [ProductRecord]) -> Self {
        let mut order = Vec::with_capacity(records.len());
        let mut by_key = HashMap::with_capacity(records.len());
        let mut codes = HashSet::new();
        for record in records {
            let key = record.key();
            if by_key.insert(key.clone(), record).is_none() {
                order.push(key);
            }
            codes.insert(record.code.as_str());
        }
        Self {
            order,
            by_key,
            codes,
        }
    }

    #[must_use]
    pub fn get(&self, key: &ProductKey) -> Option<&'a ProductRecord> {
        self.by_key.get(key).copied()
    }

    /// Whether the code exists under any unit.
    #[must_use]
    pub fn contains_code(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    /// Number of distinct composite keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate `(key, record)` pairs in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (&ProductKey, &'a ProductRecord)> + '_ {
        self.order
            .iter()
            .filter_map(|key| self.by_key.get(key).map(|record| (key, *record)))
    }
}
