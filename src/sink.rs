//! The rendering sink for plotted series.
//!
//! Drawing images is left to an external renderer. Reports describe each plot
//! as a `Plot` (fixed name, title, kind, series) and hand it to a `PlotSink`.
//! `CsvPlotSink` persists the series under the plot's fixed name so the
//! renderer can pick it up.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    Line,
    Scatter,
    /// Kernel density estimate of the series' y values; the renderer does the smoothing.
    Density,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    /// A series plotted against its index.
    pub fn indexed<T: Copy + Into<f64>>(label: &str, values: &[T]) -> Self {
        Self {
            label: label.to_string(),
            points: values
                .iter()
                .enumerate()
                .map(|(i, &v)| (i as f64, v.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    /// Fixed artifact name, e.g. `special-cases`.
    pub name: String,
    pub title: String,
    pub kind: PlotKind,
    pub series: Vec<Series>,
}

pub trait PlotSink {
    fn emit(&mut self, plot: &Plot) -> Result<()>;
}

/// Writes each plot to `<dir>/<name>.csv` with columns `series,x,y`.
pub struct CsvPlotSink {
    dir: PathBuf,
}

impl CsvPlotSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, plot: &Plot) -> PathBuf {
        self.dir.join(format!("{}.csv", plot.name))
    }

    fn ensure_dir(dir: &Path) -> Result<()> {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

impl PlotSink for CsvPlotSink {
    fn emit(&mut self, plot: &Plot) -> Result<()> {
        Self::ensure_dir(&self.dir)?;
        let path = self.path_for(plot);
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(["series", "x", "y"])?;
        for series in &plot.series {
            for (x, y) in &series.points {
                writer.write_record([series.label.clone(), x.to_string(), y.to_string()])?;
            }
        }
        writer.flush()?;
        log::info!("Wrote {:?} plot '{}' to {}", plot.kind, plot.title, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_series() {
        let series = Series::indexed("exponent", &[128u8, 127, 128]);
        assert_eq!(series.points, vec![(0.0, 128.0), (1.0, 127.0), (2.0, 128.0)]);
    }

    #[test]
    fn test_csv_sink_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvPlotSink::new(dir.path().join("plots"));
        let plot = Plot {
            name: "special-cases".to_string(),
            title: "Special cases".to_string(),
            kind: PlotKind::Line,
            series: vec![Series {
                label: "No Split".to_string(),
                points: vec![(0.0, 100.0), (0.5, 80.0)],
            }],
        };
        sink.emit(&plot).unwrap();

        let written = fs::read_to_string(dir.path().join("plots").join("special-cases.csv")).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines, vec!["series,x,y", "No Split,0,100", "No Split,0.5,80"]);
    }
}
