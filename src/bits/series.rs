//! Price-series preprocessing applied once, upstream of decomposition.

use std::io::Read;

use crate::error::{AnalyzeError, Result};

/// Reads one named column of a headered price CSV. Empty cells and `null`
/// become NaN so [`sanitize`] can drop them later.
pub fn read_price_column<R: Read>(reader: R, column: &str) -> Result<Vec<f32>> {
    let mut csv = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let index = csv
        .headers()?
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| AnalyzeError::Config(format!("price CSV has no '{}' column", column)))?;

    let mut prices = Vec::new();
    for row in csv.records() {
        let row = row?;
        let cell = row.get(index).unwrap_or("").trim();
        let price = match cell {
            "" | "null" => f32::NAN,
            text => text
                .parse::<f32>()
                .map_err(|e| AnalyzeError::format(text, format!("price is not a number: {}", e)))?,
        };
        prices.push(price);
    }
    log::info!("Read {} prices from column '{}'", prices.len(), column);
    Ok(prices)
}

/// Day-over-day relative returns `(y / x) - 1`, one shorter than `prices`.
pub fn to_returns(prices: &[f32]) -> Vec<f32> {
    prices.windows(2).map(|w| (w[1] / w[0]) - 1.0).collect()
}

/// Drops exact zeros and NaNs; they carry no exponent or mantissa signal.
pub fn sanitize(values: &[f32]) -> Vec<f32> {
    values
        .iter()
        .copied()
        .filter(|v| *v != 0.0 && !v.is_nan())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRICES: &str = "Date,Open,Adj Close\n\
                          2015-01-02,1.0,2.0\n\
                          2015-01-05,1.0,\n\
                          2015-01-06,1.0,3.0\n\
                          2015-01-07,1.0,0\n";

    #[test]
    fn test_read_named_column() {
        let prices = read_price_column(PRICES.as_bytes(), "Adj Close").unwrap();
        assert_eq!(prices.len(), 4);
        assert_eq!(prices[0], 2.0);
        assert!(prices[1].is_nan());
        assert_eq!(sanitize(&prices), vec![2.0, 3.0]);
    }

    #[test]
    fn test_missing_column_is_config_error() {
        assert!(matches!(
            read_price_column(PRICES.as_bytes(), "Close"),
            Err(AnalyzeError::Config(_))
        ));
    }

    #[test]
    fn test_returns_are_relative_changes() {
        assert_eq!(to_returns(&[2.0, 3.0, 1.5]), vec![0.5, -0.5]);
        assert!(to_returns(&[2.0]).is_empty());
    }

    #[test]
    fn test_sanitize_drops_negative_zero_too() {
        assert_eq!(sanitize(&[-0.0, 1.0, f32::NAN, -2.0]), vec![1.0, -2.0]);
    }
}
