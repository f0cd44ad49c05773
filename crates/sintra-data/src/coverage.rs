//! Fundamentals coverage inspection.
//!
//! Answers "what can this fundamentals file support on its own?": which price
//! and metric columns exist, how many distinct stocks it covers, how complete
//! the P/E column is, and how P/E relates to earnings growth.

use std::collections::BTreeMap;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use sintra_traits::{Result, stats};

use crate::loader::{numeric_column, present_count, text_column};
use crate::schema::{FundamentalsSchema, column_names};

/// Single-day price columns a fundamentals snapshot may carry.
pub const PRICE_LIKE_COLUMNS: &[&str] = &["previousClose", "open", "dayLow", "dayHigh", "volume"];

/// Fundamental metric columns of interest.
pub const METRIC_COLUMNS: &[&str] = &[
    "trailingPE",
    "earningsQuarterlyGrowth",
    "revenueGrowth",
    "debtToEquity",
    "pegRatio",
    "revenuePerShare",
];

/// Coverage report of a fundamentals frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundamentalsCoverage {
    /// Number of rows
    pub rows: usize,
    /// All columns, in frame order
    pub columns: Vec<String>,
    /// Presence of each price-like column
    pub price_columns: BTreeMap<String, bool>,
    /// Presence of each metric column
    pub metric_columns: BTreeMap<String, bool>,
    /// Distinct symbols after uppercasing and trimming
    pub unique_symbols: usize,
    /// Symbols appearing on more than one row
    pub multi_entry_symbols: usize,
    /// Rows with any previous close cell
    pub previous_close_non_null: usize,
    /// Rows with any P/E cell
    pub pe_non_null: usize,
    /// Rows with a strictly positive P/E
    pub positive_pe: usize,
    /// Rows with positive P/E, numeric earnings growth and previous close
    pub complete_rows: usize,
    /// Pearson correlation of P/E and earnings growth over the complete rows
    pub pe_growth_correlation: Option<f64>,
}

impl FundamentalsCoverage {
    /// Inspect a fundamentals frame.
    ///
    /// # Errors
    ///
    /// Returns [`sintra_traits::StudyError::MissingColumn`] when the ticker or
    /// P/E column cannot be resolved.
    pub fn analyze(frame: &DataFrame, schema: &FundamentalsSchema) -> Result<Self> {
        let columns = column_names(frame);
        let resolved = schema.resolve(frame)?;

        let presence = |names: &[&str]| -> BTreeMap<String, bool> {
            names
                .iter()
                .map(|name| (name.to_string(), columns.iter().any(|c| c == name)))
                .collect()
        };

        let mut symbol_counts: BTreeMap<String, usize> = BTreeMap::new();
        for symbol in text_column(frame, &resolved.ticker)?.into_iter().flatten() {
            let cleaned = symbol.trim().to_uppercase();
            *symbol_counts.entry(cleaned).or_default() += 1;
        }

        let pe = numeric_column(frame, &resolved.trailing_pe)?;
        let growth = match &resolved.earnings_growth {
            Some(name) => numeric_column(frame, name)?,
            None => vec![None; frame.height()],
        };
        let previous_close = match &resolved.previous_close {
            Some(name) => numeric_column(frame, name)?,
            None => vec![None; frame.height()],
        };

        let (complete_pe, complete_growth): (Vec<f64>, Vec<f64>) = pe
            .iter()
            .zip(&growth)
            .zip(&previous_close)
            .filter_map(|((pe, growth), close)| match (pe, growth, close) {
                (Some(pe), Some(growth), Some(_)) if *pe > 0.0 => Some((*pe, *growth)),
                _ => None,
            })
            .unzip();

        // raw cells count as present even when they do not parse
        let pe_non_null = present_count(frame, &resolved.trailing_pe)?;
        let previous_close_non_null = resolved
            .previous_close
            .as_deref()
            .map_or(Ok(0), |name| present_count(frame, name))?;

        let price_columns = presence(PRICE_LIKE_COLUMNS);
        let metric_columns = presence(METRIC_COLUMNS);

        Ok(Self {
            rows: frame.height(),
            columns,
            price_columns,
            metric_columns,
            unique_symbols: symbol_counts.len(),
            multi_entry_symbols: symbol_counts.values().filter(|&&n| n > 1).count(),
            previous_close_non_null,
            pe_non_null,
            positive_pe: pe.iter().flatten().filter(|&&v| v > 0.0).count(),
            complete_rows: complete_pe.len(),
            pe_growth_correlation: stats::pearson(&complete_pe, &complete_growth),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_coverage_counts() {
        let df = df! {
            "symbol" => &["sbin", "SBIN ", "TCS", "INFY", "WIPRO"],
            "trailingPE" => &["9", "9.5", "N/A", "-2", "20"],
            "earningsQuarterlyGrowth" => &["0.1", "0.2", "0.3", "0.4", "0.5"],
            "previousClose" => &["500", "", "3000", "1500", "400"],
            "volume" => &["1", "2", "3", "4", "5"],
        }
        .unwrap();

        let coverage = FundamentalsCoverage::analyze(&df, &FundamentalsSchema::default()).unwrap();
        assert_eq!(coverage.rows, 5);
        assert_eq!(coverage.unique_symbols, 4);
        assert_eq!(coverage.multi_entry_symbols, 1);
        assert_eq!(coverage.previous_close_non_null, 4);
        assert_eq!(coverage.pe_non_null, 4);
        assert_eq!(coverage.positive_pe, 3);
        // sbin (9, 0.1, 500) and WIPRO (20, 0.5, 400)
        assert_eq!(coverage.complete_rows, 2);
        assert_relative_eq!(coverage.pe_growth_correlation.unwrap(), 1.0, epsilon = 1e-12);

        assert!(coverage.price_columns["previousClose"]);
        assert!(!coverage.price_columns["dayHigh"]);
        assert!(coverage.metric_columns["trailingPE"]);
        assert!(!coverage.metric_columns["pegRatio"]);
    }

    #[test]
    fn test_coverage_without_optional_columns() {
        let df = df! {
            "Symbol" => &["A", "B"],
            "PE" => &["10", "12"],
        }
        .unwrap();

        let coverage = FundamentalsCoverage::analyze(&df, &FundamentalsSchema::default()).unwrap();
        assert_eq!(coverage.complete_rows, 0);
        assert!(coverage.pe_growth_correlation.is_none());
        assert_eq!(coverage.previous_close_non_null, 0);
    }

    #[test]
    fn test_unparseable_cells_count_as_present() {
        let df = df! {
            "symbol" => &["A", "B", "C", "D"],
            "trailingPE" => &["12", "Infinity", "n.m.", ""],
            "previousClose" => &["100", "closed", "", "N/A"],
        }
        .unwrap();

        let coverage = FundamentalsCoverage::analyze(&df, &FundamentalsSchema::default()).unwrap();
        assert_eq!(coverage.pe_non_null, 3);
        assert_eq!(coverage.positive_pe, 1);
        assert_eq!(coverage.previous_close_non_null, 2);
    }
}
