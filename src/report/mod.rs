//! The ranking & comparison reporter.
//!
//! The reporter consumes a `BenchmarkTable`, runs the grouped aggregator, and
//! assembles renderer-agnostic `Section`s. Rendering is a separate, final step
//! through an `OutputFormatter`, so the aggregation and ranking logic is the
//! same for every output mode.
//!
//! Report order for one benchmark file:
//!
//!   1. [codec restriction]        (optional)
//!   2. Compressor dominance      methods × compressor
//!   3. [compressor restriction]   (optional)
//!   4. Delta or literal          per field, low/high cardinality policy
//!   5. Comparing codecs          per field, order-insensitive codec sets
//!   6. Baselines                 (when configured)

pub mod formatter;
pub mod knockout;
pub mod ranking;

use crate::config::AnalyzeConfig;
use crate::error::Result;
use crate::table::aggregate::{
    compressor, field_codec, field_codec_set, field_method, group_records_min, method_tuple,
    pivot_min, PivotTable,
};
use crate::table::filter::Restriction;
use crate::table::BenchmarkTable;
use crate::types::{CodecChain, CodecSet, Method};

use formatter::{Grid, OutputFormatter};
use ranking::{RankedComparison, SideBySide};

//==================================================================================
// 1. Report structure
//==================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub notes: Vec<String>,
    pub grids: Vec<Grid>,
}

impl Section {
    pub(crate) fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            notes: Vec::new(),
            grids: Vec::new(),
        }
    }

    pub(crate) fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub(crate) fn grid(mut self, grid: Grid) -> Self {
        self.grids.push(grid);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub sections: Vec<Section>,
}

impl Report {
    pub fn render(&self, formatter: &dyn OutputFormatter) -> String {
        let mut out = String::new();
        for section in &self.sections {
            out.push_str(&formatter.heading(&section.heading));
            out.push('\n');
            for note in &section.notes {
                out.push_str(&formatter.note(note));
                out.push('\n');
            }
            for grid in &section.grids {
                if grid.is_empty() {
                    out.push_str(&formatter.note("(no rows)"));
                } else {
                    out.push_str(&formatter.grid(grid));
                }
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }

    pub fn section(&self, heading: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.heading == heading)
    }
}

//==================================================================================
// 2. Method comparison policy
//==================================================================================

/// The two presentations of "delta or literal" for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodComparison {
    /// Few distinct chains: the whole `codec × method` pivot.
    FullPivot(PivotTable<CodecChain, Method>),
    /// Many distinct chains: per compressor, independent top-N rankings for
    /// `Delta` and `Literal`, aligned by rank.
    PerCompressor(Vec<(String, SideBySide)>),
}

impl MethodComparison {
    pub fn is_full_pivot(&self) -> bool {
        matches!(self, MethodComparison::FullPivot(_))
    }

    fn to_grids(&self, field: &str) -> Vec<Grid> {
        match self {
            MethodComparison::FullPivot(pivot) => {
                let methods: Vec<&Method> = pivot.columns().collect();
                let mut grid = Grid::new(
                    std::iter::once(format!("{} Codec", field)).chain(methods.iter().map(|m| m.to_string())),
                );
                for chain in pivot.rows() {
                    let mut row = vec![Some(chain.to_string())];
                    row.extend(methods.iter().map(|m| pivot.get(chain, m).map(|s| s.to_string())));
                    grid.push_row(row);
                }
                vec![grid]
            }
            MethodComparison::PerCompressor(per_compressor) => per_compressor
                .iter()
                .map(|(name, side)| {
                    let mut grid = Grid::new(["Rank", "Delta Codec", "Delta Size", "Literal Codec", "Literal Size"])
                        .with_caption(name.clone());
                    for (rank, delta, literal) in side.ranks() {
                        let mut row = vec![Some(rank.to_string())];
                        row.extend(split_entry(delta));
                        row.extend(split_entry(literal));
                        grid.push_row(row);
                    }
                    grid
                })
                .collect(),
        }
    }
}

fn split_entry(entry: Option<&(CodecChain, u64)>) -> [Option<String>; 2] {
    match entry {
        Some((chain, size)) => [Some(chain.to_string()), Some(size.to_string())],
        None => [None, None],
    }
}

//==================================================================================
// 3. The Reporter
//==================================================================================

pub struct Reporter<'a> {
    config: &'a AnalyzeConfig,
}

impl<'a> Reporter<'a> {
    pub fn new(config: &'a AnalyzeConfig) -> Self {
        Self { config }
    }

    /// Runs every report for one benchmark table.
    pub fn analyse(&self, table: &BenchmarkTable) -> Result<Report> {
        let mut report = Report::default();
        let fields = table.field_names();

        let mut table = table.clone();
        if let Some(codecs) = &self.config.only_codecs {
            let restriction = Restriction::only_codecs(&codecs.join(","))?;
            table = self.restrict(&table, &restriction, &mut report)?;
        }

        report.sections.push(self.compressor_dominance(&table));

        if let Some(compressors) = &self.config.only_compressors {
            let restriction = Restriction::only_compressors(&compressors.join(","))?;
            table = self.restrict(&table, &restriction, &mut report)?;
        }

        for field in &fields {
            let comparison = self.method_comparison(&table, field);
            let mut section = Section::new(format!("Delta or literal better for the {}?", field.to_lowercase()));
            if !comparison.is_full_pivot() {
                section = section.note(format!(
                    "More than {} distinct codecs: top {} per compressor, Delta and Literal ranked independently",
                    self.config.low_cardinality_threshold, self.config.top_n
                ));
            }
            for grid in comparison.to_grids(field) {
                section = section.grid(grid);
            }
            report.sections.push(section);
        }

        for field in &fields {
            let ranked = self.codec_comparison(&table, field);
            let mut grid = Grid::new([format!("{} Codec Set", field), "Size".to_string()]);
            for (set, size) in ranked.entries() {
                grid.push_row(vec![Some(set.to_string()), Some(size.to_string())]);
            }
            report
                .sections
                .push(Section::new(format!("Comparing codecs for the {}", field.to_lowercase())).grid(grid));
        }

        if !self.config.baselines.is_empty() {
            report.sections.push(self.baseline_comparison(&table));
        }

        Ok(report)
    }

    /// Applies a restriction, recording it in the report. An empty result is
    /// absorbed: later reports run against an empty table.
    fn restrict(&self, table: &BenchmarkTable, restriction: &Restriction, report: &mut Report) -> Result<BenchmarkTable> {
        let heading = format!("Restricting to {}", restriction);
        match restriction.apply(table) {
            Ok(narrowed) => {
                report.sections.push(
                    Section::new(heading).note(format!("{} of {} rows kept", narrowed.len(), table.len())),
                );
                Ok(narrowed)
            }
            Err(err) if err.is_soft() => {
                log::warn!("{}", err);
                report.sections.push(Section::new(heading).note(err.to_string()));
                Ok(table.filtered(|_| false))
            }
            Err(err) => Err(err),
        }
    }

    /// "GZip should dominate Snappy?": methods of every field × compressor.
    pub fn compressor_dominance(&self, table: &BenchmarkTable) -> Section {
        let fields = table.field_names();
        let pivot = pivot_min(table.records(), method_tuple, compressor);
        let compressors: Vec<&String> = pivot.columns().collect();

        let headers = fields
            .iter()
            .map(|f| format!("{} Method", f))
            .chain(compressors.iter().map(|c| c.to_string()));
        let mut grid = Grid::new(headers);
        for methods in pivot.rows() {
            let mut row: Vec<Option<String>> = methods.iter().map(|m| Some(m.to_string())).collect();
            row.extend(compressors.iter().map(|c| pivot.get(methods, c).map(|s| s.to_string())));
            grid.push_row(row);
        }
        Section::new("GZip should dominate Snappy?").grid(grid)
    }

    /// "Delta or literal better?" for one field, picking the presentation by
    /// the number of distinct codec chains the field uses.
    pub fn method_comparison(&self, table: &BenchmarkTable, field: &str) -> MethodComparison {
        let pivot = pivot_min(table.records(), field_codec(field), field_method(field));
        let distinct = pivot.row_count();
        let full = distinct <= self.config.low_cardinality_threshold;
        log_metric!(
            "event" = "method_comparison",
            "field" = field,
            "distinct_codecs" = distinct,
            "policy" = if full { "full_pivot" } else { "per_compressor" }
        );
        if full {
            return MethodComparison::FullPivot(pivot);
        }

        let limit = Some(self.config.top_n);
        let compressors = group_records_min(table.records(), compressor);
        let per_compressor = compressors
            .keys()
            .map(|name| {
                let records = table.filtered(|r| &r.compressor == name);
                let pivot = pivot_min(records.records(), field_codec(field), field_method(field));
                let side = SideBySide {
                    delta: RankedComparison::from_table(&pivot.column(&Method::Delta), limit),
                    literal: RankedComparison::from_table(&pivot.column(&Method::Literal), limit),
                };
                (name.clone(), side)
            })
            .collect();
        MethodComparison::PerCompressor(per_compressor)
    }

    /// "Comparing codecs": minimum size per order-insensitive codec set,
    /// ascending, untruncated.
    pub fn codec_comparison(&self, table: &BenchmarkTable, field: &str) -> RankedComparison<CodecSet> {
        let grouped = group_records_min(table.records(), field_codec_set(field));
        RankedComparison::from_table(&grouped, None)
    }

    /// Best observed size per configured baseline, and its ratio to the baseline.
    pub fn baseline_comparison(&self, table: &BenchmarkTable) -> Section {
        let best = group_records_min(table.records(), compressor);
        let mut grid = Grid::new(["Baseline", "Compressor", "Baseline Size", "Best Size", "Ratio"]);
        for baseline in &self.config.baselines {
            let observed = best.get(&baseline.compressor);
            let ratio = observed.filter(|_| baseline.size > 0).map(|s| format!("{:.3}", s as f64 / baseline.size as f64));
            grid.push_row(vec![
                Some(baseline.label.clone().unwrap_or_default()),
                Some(baseline.compressor.clone()),
                Some(baseline.size.to_string()),
                observed.map(|s| s.to_string()),
                ratio,
            ]);
        }
        Section::new("Baselines").grid(grid)
    }
}

/// Convenience for callers that only need the rendered text.
pub fn render_analysis(table: &BenchmarkTable, config: &AnalyzeConfig) -> Result<String> {
    config.validate()?;
    let report = Reporter::new(config).analyse(table)?;
    Ok(report.render(config.render.formatter().as_ref()))
}
