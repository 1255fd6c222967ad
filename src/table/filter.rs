//! Restriction filters applied before aggregation.
//!
//! Filters never mutate a table; they produce a narrowed copy. A filter that
//! matches nothing yields `AnalyzeError::EmptyResult`, which reporters treat as
//! a soft failure.

use std::collections::BTreeSet;
use std::fmt;

use super::decoder::parse_chain_list;
use super::BenchmarkTable;
use crate::error::{AnalyzeError, Result};
use crate::types::{BenchmarkRecord, CodecChain};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restriction {
    /// Keep rows produced by one of these compressors.
    Compressors(BTreeSet<String>),
    /// Keep rows where ANY field used one of these exact (order-sensitive) chains.
    Codecs(BTreeSet<CodecChain>),
}

impl Restriction {
    /// Builds a compressor restriction from a comma-separated list, e.g. `GZip,Snappy`.
    pub fn only_compressors(list: &str) -> Result<Self> {
        let names: BTreeSet<String> = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            return Err(AnalyzeError::Config(format!("no compressors in '{}'", list)));
        }
        Ok(Restriction::Compressors(names))
    }

    /// Builds a codec restriction from a list of bracketed chains, e.g. `[1, 2],[4]`.
    pub fn only_codecs(list: &str) -> Result<Self> {
        let chains: BTreeSet<CodecChain> = parse_chain_list(list)?.into_iter().collect();
        if chains.is_empty() {
            return Err(AnalyzeError::Config(format!("no codec chains in '{}'", list)));
        }
        Ok(Restriction::Codecs(chains))
    }

    pub fn matches(&self, record: &BenchmarkRecord) -> bool {
        match self {
            Restriction::Compressors(names) => names.contains(&record.compressor),
            Restriction::Codecs(chains) => record.fields.iter().any(|f| chains.contains(&f.codec)),
        }
    }

    /// Narrows `table` to the matching records.
    pub fn apply(&self, table: &BenchmarkTable) -> Result<BenchmarkTable> {
        let narrowed = table.filtered(|r| self.matches(r));
        log::info!(
            "Restricting to {}: kept {} of {} rows",
            self,
            narrowed.len(),
            table.len()
        );
        if narrowed.is_empty() {
            return Err(AnalyzeError::EmptyResult(self.to_string()));
        }
        Ok(narrowed)
    }
}

impl fmt::Display for Restriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Restriction::Compressors(names) => {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                write!(f, "compressors {{{}}}", names.join(", "))
            }
            Restriction::Codecs(chains) => {
                let chains: Vec<&str> = chains.iter().map(CodecChain::raw).collect();
                write!(f, "codecs {{{}}}", chains.join(", "))
            }
        }
    }
}
