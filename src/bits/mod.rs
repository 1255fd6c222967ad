//! The IEEE-754 bit-field pipeline.
//!
//! Runs independently of the benchmark tables:
//!
//!   price CSV ─► [returns] ─► sanitize ─► bitcast ─► decompose
//!                                                      │
//!                    ┌─────────────────────────────────┤
//!                    ▼                                 ▼
//!   line / density / scatter plots (PlotSink)  quantization gap table (Report)

pub mod decompose;
pub mod series;

use std::io::Read;

use crate::config::BitsConfig;
use crate::error::{AnalyzeError, Result};
use crate::report::formatter::Grid;
use crate::report::{Report, Section};
use crate::sink::{Plot, PlotKind, PlotSink, Series};

use decompose::{
    bitcast, decompose, high_byte_pairs, low_byte_pairs, mantissa_deltas, quantization_profile, BitSample,
    QuantizationProfile,
};

/// Everything derived from one price series.
#[derive(Debug, Clone, PartialEq)]
pub struct BitAnalysis {
    pub samples: Vec<BitSample>,
    pub deltas: Vec<i32>,
    pub profile: QuantizationProfile,
}

impl BitAnalysis {
    /// Fails with a `Format` error when nothing is left after dropping zeros
    /// and NaNs.
    pub fn from_values(raw: &[f32], returns: bool) -> Result<Self> {
        let values = if returns {
            series::sanitize(&series::to_returns(raw))
        } else {
            series::sanitize(raw)
        };

        let samples = decompose(&bitcast(&values));
        let deltas = mantissa_deltas(&samples);
        let profile = quantization_profile(&samples).ok_or_else(|| {
            AnalyzeError::format(
                format!("{} input values", raw.len()),
                "no non-zero, non-NaN values to decompose",
            )
        })?;
        log::info!("Decomposed {} samples ({} deltas)", samples.len(), deltas.len());
        Ok(Self {
            samples,
            deltas,
            profile,
        })
    }

    pub fn plots(&self) -> Vec<Plot> {
        let signs: Vec<u8> = self.samples.iter().map(|s| s.sign).collect();
        let exponents: Vec<u8> = self.samples.iter().map(|s| s.exponent).collect();
        let mantissas: Vec<u32> = self.samples.iter().map(|s| s.mantissa).collect();

        let mut plots = vec![
            line_plot("sign", "Sign", Series::indexed("sign", &signs)),
            line_plot("exponent", "Exponent", Series::indexed("exponent", &exponents)),
            line_plot("mantissa", "Mantissa", Series::indexed("mantissa", &mantissas)),
            line_plot("mantissa-delta", "Mantissa Delta", Series::indexed("mantissa delta", &self.deltas)),
            Plot {
                name: "mantissa-delta-distribution".to_string(),
                title: "Distribution of Mantissa Delta".to_string(),
                kind: PlotKind::Density,
                series: vec![Series::indexed("mantissa delta", &self.deltas)],
            },
        ];

        let wide_mantissas: Vec<i64> = mantissas.iter().map(|&m| m as i64).collect();
        let wide_deltas: Vec<i64> = self.deltas.iter().map(|&d| d as i64).collect();
        for (name, values) in [("mantissa", &wide_mantissas), ("mantissa-delta", &wide_deltas)] {
            plots.push(scatter_plot(
                format!("{}-low-order-bytes", name),
                "low order bytes correlation",
                low_byte_pairs(values),
            ));
            plots.push(scatter_plot(
                format!("{}-high-order-bytes", name),
                "high order bytes correlation",
                high_byte_pairs(values),
            ));
        }
        plots
    }

    pub fn to_report(&self) -> Report {
        let profile = &self.profile;
        let mut grid = Grid::new(["Gap", "Count"]);
        for (gap, count) in &profile.gaps {
            grid.push_row(vec![Some(gap.to_string()), Some(count.to_string())]);
        }
        let section = Section::new("Quantization gaps at the modal exponent")
            .note(format!(
                "Exponent {}: {} distinct mantissas",
                profile.exponent,
                profile.mantissas.len()
            ))
            .grid(grid);
        Report {
            sections: vec![section],
        }
    }
}

fn line_plot(name: &str, title: &str, series: Series) -> Plot {
    Plot {
        name: name.to_string(),
        title: title.to_string(),
        kind: PlotKind::Line,
        series: vec![series],
    }
}

fn scatter_plot(name: String, title: &str, pairs: Vec<(i64, i64)>) -> Plot {
    Plot {
        name,
        title: title.to_string(),
        kind: PlotKind::Scatter,
        series: vec![Series {
            label: "low order vs high order".to_string(),
            points: pairs.into_iter().map(|(x, y)| (x as f64, y as f64)).collect(),
        }],
    }
}

/// Reads the configured price column, emits every plot through `sink`, and
/// returns the gap table.
pub fn run_bits<R: Read>(reader: R, config: &BitsConfig, sink: &mut dyn PlotSink) -> Result<Report> {
    let prices = series::read_price_column(reader, &config.price_column)?;
    let analysis = BitAnalysis::from_values(&prices, config.returns)?;
    for plot in analysis.plots() {
        sink.emit(&plot)?;
    }
    Ok(analysis.to_report())
}
