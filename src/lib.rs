//! This file is the root of the `tambak_analyze` crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of the library (`table`, `report`,
//!     `bits`, etc.) so the Rust compiler knows they exist.
//! 2.  Re-exporting the handful of types a caller needs to read a benchmark
//!     file, analyse it, and render the result.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod bits;
pub mod config;
pub mod error;
pub mod report;
pub mod sink;
pub mod table;
pub mod types;

//==================================================================================
// 2. Public Re-exports
//==================================================================================
pub use config::{AnalyzeConfig, Baseline, BitsConfig, RenderMode};
pub use error::{AnalyzeError, Result};
pub use report::knockout::KnockoutSummary;
pub use report::{render_analysis, Report, Reporter};
pub use sink::{CsvPlotSink, PlotSink};
pub use table::BenchmarkTable;
pub use types::{BenchmarkRecord, CodecChain, CodecSet, InputLayout, Method};
