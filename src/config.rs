// In: src/config.rs

//! The single source of truth for all analysis configuration.
//!
//! This module defines the unified `AnalyzeConfig` struct, which is created once
//! at the application boundary (from an optional JSON file, then overridden by
//! command-line flags) and passed down by reference to the reporter and the
//! bit-field pipeline.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AnalyzeError, Result};

//==================================================================================
// I. Core Configuration Enums & Structs
//==================================================================================

/// Selects how finished tables are rendered.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// **Default:** fixed-width text grids.
    #[default]
    Plain,
    /// Markup tables.
    Html,
}

/// An explicit regression reference: the size a compressor reaches on the
/// unconditioned data set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Baseline {
    pub compressor: String,
    pub size: u64,
    #[serde(default)]
    pub label: Option<String>,
}

impl Baseline {
    pub fn new(compressor: &str, size: u64, label: &str) -> Self {
        Self {
            compressor: compressor.to_string(),
            size,
            label: Some(label.to_string()),
        }
    }

    /// Unconditioned sizes of the float sample data set.
    pub fn reference_floats() -> Vec<Baseline> {
        vec![
            Baseline::new("Snappy", 10_894_227, "floats"),
            Baseline::new("GZip", 7_683_716, "floats"),
        ]
    }

    /// Unconditioned sizes of the same data set widened to doubles.
    pub fn reference_doubles() -> Vec<Baseline> {
        vec![
            Baseline::new("Snappy", 12_375_632, "doubles"),
            Baseline::new("GZip", 8_560_507, "doubles"),
        ]
    }
}

/// Settings for the IEEE-754 bit-field pipeline.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BitsConfig {
    /// Name of the price column in the input CSV.
    #[serde(default = "default_price_column")]
    pub price_column: String,

    /// If true, prices are turned into day-over-day relative returns first.
    #[serde(default)]
    pub returns: bool,
}

impl Default for BitsConfig {
    fn default() -> Self {
        Self {
            price_column: default_price_column(),
            returns: false,
        }
    }
}

//==================================================================================
// II. The Unified AnalyzeConfig
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AnalyzeConfig {
    /// Length of every truncated ranking.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// A field with more distinct codec chains than this is reported per
    /// compressor as two independent top-N rankings instead of a full pivot.
    #[serde(default = "default_low_cardinality_threshold")]
    pub low_cardinality_threshold: usize,

    #[serde(default)]
    pub render: RenderMode,

    /// Bracketed chains, e.g. `["[1, 2]", "[4]"]`. Rows where any field used one
    /// of them are kept.
    #[serde(default)]
    pub only_codecs: Option<Vec<String>>,

    #[serde(default)]
    pub only_compressors: Option<Vec<String>>,

    #[serde(default)]
    pub baselines: Vec<Baseline>,

    /// Directory the plot sink writes into.
    #[serde(default = "default_plot_dir")]
    pub plot_dir: PathBuf,

    #[serde(default)]
    pub bits: BitsConfig,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            low_cardinality_threshold: default_low_cardinality_threshold(),
            render: RenderMode::default(),
            only_codecs: None,
            only_compressors: None,
            baselines: Vec::new(),
            plot_dir: default_plot_dir(),
            bits: BitsConfig::default(),
        }
    }
}

impl AnalyzeConfig {
    /// Loads a JSON config file. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: AnalyzeConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(AnalyzeError::Config("top_n must be at least 1".to_string()));
        }
        if self.bits.price_column.trim().is_empty() {
            return Err(AnalyzeError::Config("bits.price_column must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Helper for `serde` to provide the default ranking length.
fn default_top_n() -> usize {
    10
}

fn default_low_cardinality_threshold() -> usize {
    5
}

fn default_plot_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_price_column() -> String {
    "Adj Close".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_reference_behaviour() {
        let config = AnalyzeConfig::default();
        assert_eq!(config.top_n, 10);
        assert_eq!(config.low_cardinality_threshold, 5);
        assert_eq!(config.render, RenderMode::Plain);
        assert_eq!(config.bits.price_column, "Adj Close");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: AnalyzeConfig = serde_json::from_str(
            r#"{ "render": "html", "baselines": [{ "compressor": "GZip", "size": 7683716 }] }"#,
        )
        .unwrap();
        assert_eq!(config.render, RenderMode::Html);
        assert_eq!(config.top_n, 10);
        assert_eq!(config.baselines[0].size, 7_683_716);
        assert_eq!(config.baselines[0].label, None);
    }

    #[test]
    fn test_zero_top_n_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "top_n": 0 }}"#).unwrap();
        assert!(matches!(
            AnalyzeConfig::from_json_file(file.path()),
            Err(AnalyzeError::Config(_))
        ));
    }

    #[test]
    fn test_reference_baselines() {
        let floats = Baseline::reference_floats();
        assert_eq!(floats.len(), 2);
        assert!(floats.iter().any(|b| b.compressor == "GZip" && b.size == 7_683_716));
        assert!(Baseline::reference_doubles().iter().all(|b| b.label.as_deref() == Some("doubles")));
    }
}
