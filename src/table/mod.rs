//! This module owns the structured benchmark table and everything that reads it:
//! decoding of the compact field notation, normalization of raw TSV rows,
//! restriction filters, and the grouped minimum-size aggregator.
//!
//! Data Flow:
//!
//!   raw TSV rows -> [decoder + normalizer] -> BenchmarkTable
//!                -> [filter] -> BenchmarkTable (narrowed, never mutated in place)
//!                -> [aggregate] -> AggregatedTable / PivotTable

//==================================================================================
// 1. Module Declarations
//==================================================================================

pub mod aggregate;
pub mod decoder;
pub mod filter;
pub mod normalizer;


use crate::types::{BenchmarkRecord, InputLayout};

//==================================================================================
// 2. The Structured Table
//==================================================================================

/// An immutable, in-memory snapshot of one benchmark file.
#[derive(Debug, Clone)]
pub struct BenchmarkTable {
    layout: InputLayout,
    records: Vec<BenchmarkRecord>,
}

impl BenchmarkTable {
    pub fn new(layout: InputLayout, records: Vec<BenchmarkRecord>) -> Self {
        Self { layout, records }
    }

    pub fn layout(&self) -> &InputLayout {
        &self.layout
    }

    pub fn records(&self) -> &[BenchmarkRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn field_names(&self) -> Vec<String> {
        self.layout.field_names().map(str::to_string).collect()
    }

    /// Returns a new table holding only the records `keep` accepts.
    pub fn filtered<F>(&self, keep: F) -> Self
    where
        F: Fn(&BenchmarkRecord) -> bool,
    {
        Self {
            layout: self.layout.clone(),
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}
