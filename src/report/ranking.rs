//! Ordered top-N views over aggregated tables.

use crate::table::aggregate::AggregatedTable;
use crate::types::CodecChain;

/// `(key, size)` pairs sorted ascending by size, optionally truncated.
///
/// The sort is stable over the table's key order, so equal sizes keep a
/// deterministic order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedComparison<K> {
    entries: Vec<(K, u64)>,
}

impl<K: Ord + Clone> RankedComparison<K> {
    pub fn from_table(table: &AggregatedTable<K>, limit: Option<usize>) -> Self {
        let mut entries: Vec<(K, u64)> = table.iter().map(|(k, size)| (k.clone(), size)).collect();
        entries.sort_by_key(|&(_, size)| size);
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Self { entries }
    }
}

impl<K> RankedComparison<K> {
    pub fn entries(&self) -> &[(K, u64)] {
        &self.entries
    }

    pub fn sizes(&self) -> Vec<u64> {
        self.entries.iter().map(|&(_, size)| size).collect()
    }

    /// The entry at 1-based `rank`.
    pub fn at_rank(&self, rank: usize) -> Option<&(K, u64)> {
        rank.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Two independent rankings shown side by side, aligned by rank position.
///
/// Rank 3 under `Delta` and rank 3 under `Literal` need not be the same codec:
/// each column answers "what is the best option for this method" on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideBySide {
    pub delta: RankedComparison<CodecChain>,
    pub literal: RankedComparison<CodecChain>,
}

impl SideBySide {
    /// Number of rank rows needed to show both columns.
    pub fn depth(&self) -> usize {
        self.delta.len().max(self.literal.len())
    }

    /// Iterates `(rank, delta entry, literal entry)` for ranks `1..=depth`.
    pub fn ranks(&self) -> impl Iterator<Item = (usize, Option<&(CodecChain, u64)>, Option<&(CodecChain, u64)>)> {
        (1..=self.depth()).map(move |rank| (rank, self.delta.at_rank(rank), self.literal.at_rank(rank)))
    }
}
