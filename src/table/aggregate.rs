//! The grouped minimum-size aggregator.
//!
//! Every aggregation here is a single pass that folds sizes into a `BTreeMap`
//! with `min`. Keys come from plain extraction closures, so the same machinery
//! serves one-dimensional group-bys (`group_min`) and two-dimensional pivots
//! (`pivot_min`). Ties are not tracked: only the numeric minimum survives.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use crate::types::{BenchmarkRecord, CodecChain, CodecSet, Knockout, Method};

//==================================================================================
// 1. Aggregated Tables
//==================================================================================

/// Minimum observed size for every distinct key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedTable<K: Ord> {
    groups: BTreeMap<K, u64>,
}

impl<K: Ord> Default for AggregatedTable<K> {
    fn default() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }
}

impl<K: Ord> AggregatedTable<K> {
    /// Folds one observation into the table.
    pub fn observe(&mut self, key: K, size: u64) {
        match self.groups.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(size);
            }
            Entry::Occupied(mut slot) => {
                if size < *slot.get() {
                    slot.insert(size);
                }
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<u64> {
        self.groups.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterates in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.groups.iter().map(|(k, &v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.groups.keys()
    }
}

impl<K: Ord + Clone> AggregatedTable<K> {
    /// Aggregates the table again. Since every key is already unique this is
    /// an identity, which the tests rely on.
    pub fn regroup(&self) -> Self {
        group_min(self.iter(), |(k, _)| Some((*k).clone()), |(_, size)| *size)
    }
}

/// A two-dimensional aggregation: rows × columns → minimum size.
///
/// Cells with no matching records are absent, not zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotTable<R: Ord, C: Ord> {
    cells: AggregatedTable<(R, C)>,
    rows: BTreeSet<R>,
    columns: BTreeSet<C>,
}

impl<R: Ord + Clone, C: Ord + Clone> PivotTable<R, C> {
    pub fn get(&self, row: &R, column: &C) -> Option<u64> {
        // `(R, C)` keys force a clone for lookup; pivots are small.
        self.cells.get(&(row.clone(), column.clone()))
    }

    pub fn rows(&self) -> impl Iterator<Item = &R> {
        self.rows.iter()
    }

    pub fn columns(&self) -> impl Iterator<Item = &C> {
        self.columns.iter()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Projects one column into a one-dimensional table keyed by row.
    pub fn column(&self, column: &C) -> AggregatedTable<R> {
        let mut out = AggregatedTable::default();
        for ((row, col), size) in self.cells.iter() {
            if col == column {
                out.observe(row.clone(), size);
            }
        }
        out
    }
}

//==================================================================================
// 2. Aggregation Entry Points
//==================================================================================

/// Computes the minimum size per key over `items`.
///
/// Items for which `key` returns `None` (e.g. a record lacking the requested
/// field) are skipped.
pub fn group_min<I, T, K, F, S>(items: I, key: F, size: S) -> AggregatedTable<K>
where
    I: IntoIterator<Item = T>,
    K: Ord,
    F: Fn(&T) -> Option<K>,
    S: Fn(&T) -> u64,
{
    let mut table = AggregatedTable::default();
    let mut rows = 0usize;
    for item in items {
        rows += 1;
        if let Some(k) = key(&item) {
            table.observe(k, size(&item));
        }
    }
    log_metric!("event" = "group_min", "rows" = rows, "groups" = table.len());
    table
}

/// Group-by-minimum over benchmark records.
pub fn group_records_min<K, F>(records: &[BenchmarkRecord], key: F) -> AggregatedTable<K>
where
    K: Ord,
    F: Fn(&BenchmarkRecord) -> Option<K>,
{
    group_min(records.iter(), |r| key(*r), |r| r.size)
}

/// Pivots `records` into `row_key × column_key → min(size)`.
pub fn pivot_min<R, C, FR, FC>(records: &[BenchmarkRecord], row_key: FR, column_key: FC) -> PivotTable<R, C>
where
    R: Ord + Clone,
    C: Ord + Clone,
    FR: Fn(&BenchmarkRecord) -> Option<R>,
    FC: Fn(&BenchmarkRecord) -> Option<C>,
{
    let cells = group_records_min(records, |r| Some((row_key(r)?, column_key(r)?)));
    let rows = cells.keys().map(|(r, _)| r.clone()).collect();
    let columns = cells.keys().map(|(_, c)| c.clone()).collect();
    PivotTable { cells, rows, columns }
}

//==================================================================================
// 3. Key Extractors
//==================================================================================

pub fn compressor(record: &BenchmarkRecord) -> Option<String> {
    Some(record.compressor.clone())
}

/// The methods of all fields, in layout order.
pub fn method_tuple(record: &BenchmarkRecord) -> Option<Vec<Method>> {
    Some(record.methods())
}

pub fn knockout(record: &BenchmarkRecord) -> Option<Knockout> {
    record.knockout.clone()
}

pub fn field_method(field: &str) -> impl Fn(&BenchmarkRecord) -> Option<Method> + '_ {
    move |r: &BenchmarkRecord| r.field(field).map(|f| f.method.clone())
}

/// Order-sensitive chain of `field`.
pub fn field_codec(field: &str) -> impl Fn(&BenchmarkRecord) -> Option<CodecChain> + '_ {
    move |r: &BenchmarkRecord| r.field(field).map(|f| f.codec.clone())
}

/// Order-insensitive codec identity of `field`.
pub fn field_codec_set(field: &str) -> impl Fn(&BenchmarkRecord) -> Option<CodecSet> + '_ {
    move |r: &BenchmarkRecord| r.field(field).map(|f| f.codec.codec_set())
}
