//! The record normalizer: turns raw, headerless TSV rows into typed
//! `BenchmarkRecord`s.
//!
//! Every encoded field cell is decoded and replaced by its two derived columns
//! (`<Field> Method`, `<Field> Codec`). The codec column keeps the original
//! bracketed text; the order-insensitive set form is only derived when a codec
//! comparison asks for it.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::decoder::decode_field;
use super::BenchmarkTable;
use crate::error::{AnalyzeError, Result};
use crate::types::{BenchmarkRecord, Column, InputLayout, Knockout, NormalizedField};

/// Normalizes one raw row against `layout`. `line` is only used for error reports.
pub fn normalize_row(layout: &InputLayout, cells: &[&str], line: u64) -> Result<BenchmarkRecord> {
    if cells.len() != layout.width() {
        return Err(AnalyzeError::Schema {
            expected: layout.width(),
            found: cells.len(),
            line,
            row: cells.join("\t"),
        });
    }

    let mut compressor = None;
    let mut special_cases = None;
    let mut knockout = None;
    let mut size = None;
    let mut fields = Vec::new();

    for (column, &cell) in layout.columns().iter().zip(cells) {
        match column {
            Column::Compressor => compressor = Some(cell.to_string()),
            Column::SpecialCases => special_cases = Some(parse_flag(cell)?),
            Column::Knockout => knockout = Some(Knockout::parse(cell)?),
            Column::Size => size = Some(parse_size(cell)?),
            Column::Field(name) => {
                let decoded = decode_field(cell)?;
                fields.push(NormalizedField {
                    name: name.clone(),
                    method: decoded.method,
                    codec: decoded.chain,
                });
            }
        }
    }

    // `InputLayout::new` guarantees both columns exist.
    match (compressor, size) {
        (Some(compressor), Some(size)) => Ok(BenchmarkRecord {
            compressor,
            special_cases,
            knockout,
            fields,
            size,
        }),
        _ => Err(AnalyzeError::Config(format!(
            "layout {:?} has no Compressor or Size column",
            layout.columns()
        ))),
    }
}

fn parse_size(cell: &str) -> Result<u64> {
    cell.trim()
        .parse::<u64>()
        .map_err(|e| AnalyzeError::format(cell, format!("size is not a non-negative integer: {}", e)))
}

fn parse_flag(cell: &str) -> Result<bool> {
    match cell.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(AnalyzeError::format(other, "special-cases flag must be 'true' or 'false'")),
    }
}

/// Reads a whole headerless TSV into memory. The first bad row aborts the read.
pub fn read_table<R: Read>(reader: R, layout: &InputLayout) -> Result<BenchmarkTable> {
    let mut tsv = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in tsv.records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        let cells: Vec<&str> = row.iter().collect();
        // Trailing blank lines are skipped by the reader; a lone empty cell is not data.
        if cells.len() == 1 && cells[0].trim().is_empty() {
            continue;
        }
        records.push(normalize_row(layout, &cells, line)?);
    }

    log::info!("Loaded {} benchmark rows ({} columns each)", records.len(), layout.width());
    Ok(BenchmarkTable::new(layout.clone(), records))
}

/// Opens `path` and reads it with [`read_table`].
pub fn read_table_from_path(path: &Path, layout: &InputLayout) -> Result<BenchmarkTable> {
    log::info!("Reading {}", path.display());
    read_table(File::open(path)?, layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Method;

    #[test]
    fn test_normalize_split_row() {
        let layout = InputLayout::fields(&["Exponent", "Mantissa"]).unwrap();
        let record = normalize_row(&layout, &["GZip", "Delta", "Literal [1, 2]", "1234"], 1).unwrap();

        assert_eq!(record.compressor, "GZip");
        assert_eq!(record.size, 1234);
        assert_eq!(record.fields.len(), 2);

        let exponent = record.field("Exponent").unwrap();
        assert_eq!(exponent.method, Method::Delta);
        assert!(exponent.codec.is_identity());
        assert_eq!(exponent.method_column(), "Exponent Method");

        let mantissa = record.field("Mantissa").unwrap();
        assert_eq!(mantissa.method, Method::Literal);
        assert_eq!(mantissa.codec.raw(), "[1, 2]");
        assert_eq!(mantissa.codec_column(), "Mantissa Codec");
    }

    #[test]
    fn test_normalize_knockout_row() {
        let layout = InputLayout::split_knockout();
        let record = normalize_row(
            &layout,
            &["true", "Snappy", "0.5", "Literal", "Delta [1, 1, 1]", "99"],
            7,
        )
        .unwrap();
        assert_eq!(record.special_cases, Some(true));
        assert_eq!(record.knockout.as_ref().map(|k| k.rate()), Some(0.5));
        assert_eq!(record.methods(), vec![Method::Literal, Method::Delta]);
    }

    #[test]
    fn test_column_count_mismatch_is_schema_error() {
        let layout = InputLayout::nosplit_knockout();
        let err = normalize_row(&layout, &["Snappy", "0.0", "9"], 3).unwrap_err();
        assert!(matches!(
            err,
            AnalyzeError::Schema {
                expected: 4,
                found: 3,
                line: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_bad_size_and_flag_are_format_errors() {
        let layout = InputLayout::fields(&["Number"]).unwrap();
        assert!(matches!(
            normalize_row(&layout, &["GZip", "Delta [4]", "-5"], 1),
            Err(AnalyzeError::Format { .. })
        ));
        let layout = InputLayout::split_knockout();
        assert!(matches!(
            normalize_row(&layout, &["yes", "GZip", "0.0", "Delta", "Delta [4]", "5"], 1),
            Err(AnalyzeError::Format { .. })
        ));
    }

    #[test]
    fn test_read_table_from_tsv_text() {
        let tsv = "GZip\tLiteral [1]\t100\nGZip\tDelta [zigzag]\t80\nSnappy\tLiteral [1]\t150\n";
        let layout = InputLayout::fields(&["Number"]).unwrap();
        let table = read_table(tsv.as_bytes(), &layout).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.records()[1].field("Number").unwrap().codec.raw(), "[zigzag]");
    }

    #[test]
    fn test_read_table_aborts_on_first_bad_row() {
        let tsv = "GZip\tLiteral [1]\t100\nGZip\tDelta [zigzag\t80\n";
        let layout = InputLayout::fields(&["Number"]).unwrap();
        assert!(matches!(
            read_table(tsv.as_bytes(), &layout),
            Err(AnalyzeError::Format { .. })
        ));
    }

    #[test]
    fn test_read_table_reports_line_of_short_row() {
        let tsv = "GZip\tLiteral [1]\t100\nGZip\tbogus-row\n";
        let layout = InputLayout::fields(&["Number"]).unwrap();
        let err = read_table(tsv.as_bytes(), &layout).unwrap_err();
        assert!(err.to_string().contains("bogus-row"));
        match err {
            AnalyzeError::Schema { line, found, row, .. } => {
                assert_eq!(line, 2);
                assert_eq!(found, 2);
                assert_eq!(row, "GZip\tbogus-row");
            }
            other => panic!("Expected Schema error, got {:?}", other),
        }
    }
}
