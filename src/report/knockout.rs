//! Knockout summary: how the best size moves as the harness knocks out more
//! samples, with and without splitting the float, and with and without
//! special-case handling in the split encoding.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::formatter::Grid;
use super::{Report, Section};
use crate::error::Result;
use crate::sink::{Plot, PlotKind, Series};
use crate::table::aggregate::{group_records_min, knockout, AggregatedTable};
use crate::table::normalizer::read_table_from_path;
use crate::table::BenchmarkTable;
use crate::types::{InputLayout, Knockout};

pub const NO_SPLIT: &str = "No Split";
pub const SPLIT_WITH_SPECIAL_CASES: &str = "Split w/ Special Cases";
pub const SPLIT_WITHOUT_SPECIAL_CASES: &str = "Split wout/ Special Cases";

/// Fixed name of the emitted plot.
pub const PLOT_NAME: &str = "special-cases";

/// Minimum size per knockout rate.
pub fn summarise(table: &BenchmarkTable) -> AggregatedTable<Knockout> {
    group_records_min(table.records(), knockout)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnockoutSummary {
    pub no_split: AggregatedTable<Knockout>,
    pub with_special_cases: AggregatedTable<Knockout>,
    pub without_special_cases: AggregatedTable<Knockout>,
}

impl KnockoutSummary {
    /// `split` rows are partitioned on their special-cases flag; rows without
    /// the flag land in neither split column.
    pub fn from_tables(no_split: &BenchmarkTable, split: &BenchmarkTable) -> Self {
        let with = split.filtered(|r| r.special_cases == Some(true));
        let without = split.filtered(|r| r.special_cases == Some(false));
        Self {
            no_split: summarise(no_split),
            with_special_cases: summarise(&with),
            without_special_cases: summarise(&without),
        }
    }

    /// Reads `<root>-nosplit.tsv` and `<root>.tsv`.
    pub fn load(root: &Path) -> Result<Self> {
        let no_split = read_table_from_path(&sibling(root, "-nosplit.tsv"), &InputLayout::nosplit_knockout())?;
        let split = read_table_from_path(&sibling(root, ".tsv"), &InputLayout::split_knockout())?;
        Ok(Self::from_tables(&no_split, &split))
    }

    fn columns(&self) -> [(&'static str, &AggregatedTable<Knockout>); 3] {
        [
            (NO_SPLIT, &self.no_split),
            (SPLIT_WITH_SPECIAL_CASES, &self.with_special_cases),
            (SPLIT_WITHOUT_SPECIAL_CASES, &self.without_special_cases),
        ]
    }

    /// Every knockout rate seen in any of the three datasets, ascending.
    pub fn rates(&self) -> BTreeSet<&Knockout> {
        self.columns().into_iter().flat_map(|(_, t)| t.keys()).collect()
    }

    pub fn to_grid(&self) -> Grid {
        let columns = self.columns();
        let mut grid = Grid::new(std::iter::once("Knockout").chain(columns.iter().map(|(name, _)| *name)));
        for rate in self.rates() {
            let mut row = vec![Some(rate.to_string())];
            row.extend(columns.iter().map(|(_, t)| t.get(rate).map(|s| s.to_string())));
            grid.push_row(row);
        }
        grid
    }

    pub fn to_plot(&self) -> Plot {
        let series = self
            .columns()
            .into_iter()
            .map(|(name, table)| Series {
                label: name.to_string(),
                points: table.iter().map(|(k, size)| (k.rate() as f64, size as f64)).collect(),
            })
            .collect();
        Plot {
            name: PLOT_NAME.to_string(),
            title: "Size by knockout rate".to_string(),
            kind: PlotKind::Line,
            series,
        }
    }

    pub fn to_report(&self) -> Report {
        Report {
            sections: vec![Section::new("Knockout: split and special cases").grid(self.to_grid())],
        }
    }
}

fn sibling(root: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = root.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::normalizer::read_table;
    use std::fs;

    const NOSPLIT_TSV: &str = "GZip\t0.0\tLiteral [1]\t900\n\
                               GZip\t0.5\tDelta [1]\t700\n\
                               Snappy\t0.5\tLiteral [1]\t650\n";

    const SPLIT_TSV: &str = "true\tGZip\t0.0\tDelta\tLiteral [1]\t800\n\
                             true\tGZip\t0.5\tDelta\tDelta [2]\t600\n\
                             false\tGZip\t0.0\tLiteral\tLiteral [1]\t850\n\
                             false\tSnappy\t0.0\tDelta\tLiteral [1]\t820\n\
                             false\tGZip\t0.25\tDelta\tLiteral [1]\t840\n";

    fn summary() -> KnockoutSummary {
        let no_split = read_table(NOSPLIT_TSV.as_bytes(), &InputLayout::nosplit_knockout()).unwrap();
        let split = read_table(SPLIT_TSV.as_bytes(), &InputLayout::split_knockout()).unwrap();
        KnockoutSummary::from_tables(&no_split, &split)
    }

    fn rate(text: &str) -> Knockout {
        Knockout::parse(text).unwrap()
    }

    #[test]
    fn test_summarise_takes_min_per_rate() {
        let summary = summary();
        assert_eq!(summary.no_split.get(&rate("0.5")), Some(650));
        assert_eq!(summary.with_special_cases.get(&rate("0.0")), Some(800));
        assert_eq!(summary.without_special_cases.get(&rate("0.0")), Some(820));
    }

    #[test]
    fn test_grid_marks_missing_rates_as_absent() {
        let grid = summary().to_grid();
        assert_eq!(
            grid.headers,
            vec!["Knockout", NO_SPLIT, SPLIT_WITH_SPECIAL_CASES, SPLIT_WITHOUT_SPECIAL_CASES]
        );
        let keys: Vec<&str> = grid.rows.iter().filter_map(|r| r[0].as_deref()).collect();
        assert_eq!(keys, vec!["0.0", "0.25", "0.5"]);
        // 0.25 only exists in the split-without-special-cases data.
        assert_eq!(grid.rows[1], vec![Some("0.25".to_string()), None, None, Some("840".to_string())]);
    }

    #[test]
    fn test_plot_is_named_and_ordered_by_rate() {
        let plot = summary().to_plot();
        assert_eq!(plot.name, PLOT_NAME);
        assert_eq!(plot.kind, PlotKind::Line);
        assert_eq!(plot.series.len(), 3);
        assert_eq!(plot.series[0].points, vec![(0.0, 900.0), (0.5, 650.0)]);
    }

    #[test]
    fn test_load_reads_both_files_from_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("knockout");
        fs::write(dir.path().join("knockout-nosplit.tsv"), NOSPLIT_TSV).unwrap();
        fs::write(dir.path().join("knockout.tsv"), SPLIT_TSV).unwrap();
        assert_eq!(KnockoutSummary::load(&root).unwrap(), summary());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(KnockoutSummary::load(&dir.path().join("absent")).is_err());
    }
}
