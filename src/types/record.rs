//! The structured benchmark row and the column layouts it is read from.

use std::cmp::Ordering;
use std::fmt;

use super::encoding::{CodecChain, Method};
use crate::error::{AnalyzeError, Result};

//==================================================================================
// 1. Knockout Rate
//==================================================================================

/// The fraction of samples the harness knocked out (replaced by special values)
/// before compressing. Ordered numerically, displayed as written.
#[derive(Debug, Clone)]
pub struct Knockout {
    rate: f32,
    text: String,
}

impl Knockout {
    pub fn parse(text: &str) -> Result<Self> {
        let rate = text
            .trim()
            .parse::<f32>()
            .map_err(|e| AnalyzeError::format(text, format!("knockout rate is not a number: {}", e)))?;
        Ok(Self {
            rate,
            text: text.trim().to_string(),
        })
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }
}

impl PartialEq for Knockout {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Knockout {}

impl PartialOrd for Knockout {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Knockout {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rate.total_cmp(&other.rate)
    }
}

impl fmt::Display for Knockout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

//==================================================================================
// 2. Structured Record
//==================================================================================

/// One encoded field after normalization: the derived `<Field> Method` and
/// `<Field> Codec` columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedField {
    pub name: String,
    pub method: Method,
    pub codec: CodecChain,
}

impl NormalizedField {
    pub fn method_column(&self) -> String {
        format!("{} Method", self.name)
    }

    pub fn codec_column(&self) -> String {
        format!("{} Codec", self.name)
    }
}

/// A single benchmark observation. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkRecord {
    pub compressor: String,
    /// Only present in the split knockout layout.
    pub special_cases: Option<bool>,
    pub knockout: Option<Knockout>,
    /// Fields in layout order.
    pub fields: Vec<NormalizedField>,
    /// Compressed size in bytes.
    pub size: u64,
}

impl BenchmarkRecord {
    pub fn field(&self, name: &str) -> Option<&NormalizedField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The methods of every field, in layout order. Used as a pivot row key.
    pub fn methods(&self) -> Vec<Method> {
        self.fields.iter().map(|f| f.method.clone()).collect()
    }
}

//==================================================================================
// 3. Input Layouts
//==================================================================================

/// One column of a headerless benchmark TSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    SpecialCases,
    Compressor,
    Knockout,
    Field(String),
    Size,
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::SpecialCases => f.write_str("Special Cases"),
            Column::Compressor => f.write_str("Compressor"),
            Column::Knockout => f.write_str("Knockout"),
            Column::Field(name) => f.write_str(name),
            Column::Size => f.write_str("Size"),
        }
    }
}

/// The fixed column order of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLayout {
    columns: Vec<Column>,
}

impl InputLayout {
    /// Validates that the layout names exactly one compressor column, exactly one
    /// size column, and at least one encoded field.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let count = |wanted: &Column| columns.iter().filter(|c| *c == wanted).count();
        if count(&Column::Compressor) != 1 || count(&Column::Size) != 1 {
            return Err(AnalyzeError::Config(format!(
                "layout needs exactly one Compressor and one Size column, got {:?}",
                columns
            )));
        }
        if !columns.iter().any(|c| matches!(c, Column::Field(_))) {
            return Err(AnalyzeError::Config(
                "layout needs at least one encoded field column".to_string(),
            ));
        }
        Ok(Self { columns })
    }

    /// `Compressor, <fields...>, Size`, e.g. from a `Exponent,Mantissa` argument.
    pub fn fields<S: AsRef<str>>(fields: &[S]) -> Result<Self> {
        let mut columns = vec![Column::Compressor];
        for field in fields {
            let name = field.as_ref().trim();
            if name.is_empty() {
                return Err(AnalyzeError::Config("empty field name".to_string()));
            }
            columns.push(Column::Field(name.to_string()));
        }
        columns.push(Column::Size);
        Self::new(columns)
    }

    /// `SpecialCases, Compressor, Knockout, Exponent, Mantissa, Size`.
    pub fn split_knockout() -> Self {
        Self {
            columns: vec![
                Column::SpecialCases,
                Column::Compressor,
                Column::Knockout,
                Column::Field("Exponent".to_string()),
                Column::Field("Mantissa".to_string()),
                Column::Size,
            ],
        }
    }

    /// `Compressor, Knockout, Number, Size`.
    pub fn nosplit_knockout() -> Self {
        Self {
            columns: vec![
                Column::Compressor,
                Column::Knockout,
                Column::Field("Number".to_string()),
                Column::Size,
            ],
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().filter_map(|c| match c {
            Column::Field(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knockout_orders_numerically() {
        let mut rates: Vec<Knockout> = ["0.75", "0.0", "0.5", "0.1"]
            .iter()
            .map(|t| Knockout::parse(t).unwrap())
            .collect();
        rates.sort();
        let shown: Vec<String> = rates.iter().map(|k| k.to_string()).collect();
        assert_eq!(shown, vec!["0.0", "0.1", "0.5", "0.75"]);
    }

    #[test]
    fn test_knockout_rejects_text() {
        assert!(matches!(
            Knockout::parse("lots"),
            Err(AnalyzeError::Format { .. })
        ));
    }

    #[test]
    fn test_field_layout_wraps_compressor_and_size() {
        let layout = InputLayout::fields(&["Exponent", "Mantissa"]).unwrap();
        assert_eq!(layout.width(), 4);
        assert_eq!(layout.columns()[0], Column::Compressor);
        assert_eq!(layout.columns()[3], Column::Size);
        assert_eq!(
            layout.field_names().collect::<Vec<_>>(),
            vec!["Exponent", "Mantissa"]
        );
    }

    #[test]
    fn test_layout_without_fields_is_rejected() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            InputLayout::fields(&empty),
            Err(AnalyzeError::Config(_))
        ));
        assert!(InputLayout::new(vec![Column::Compressor, Column::Size]).is_err());
    }

    #[test]
    fn test_knockout_layouts_match_harness_output() {
        assert_eq!(InputLayout::split_knockout().width(), 6);
        assert_eq!(
            InputLayout::nosplit_knockout().field_names().collect::<Vec<_>>(),
            vec!["Number"]
        );
    }
}
