//! Common types used throughout the sintra workspace.
//!
//! This module defines the record types flowing through the study pipeline:
//! daily price observations, the fundamentals snapshot and the joined factor
//! rows.

use serde::{Deserialize, Serialize};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A normalized ticker identifier.
///
/// Raw identifiers differ between sources (`SBIN.NS`, `sbin-eq`); after
/// normalization both denote the same economic entity (`SBIN`).
pub type Ticker = String;

/// One daily price observation for a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Normalized ticker
    pub ticker: Ticker,
    /// Trading date
    pub date: Date,
    /// Opening price, when the source carries it
    pub open: Option<f64>,
    /// Daily high, when the source carries it
    pub high: Option<f64>,
    /// Daily low, when the source carries it
    pub low: Option<f64>,
    /// Closing price; `None` when the cell is empty or non-numeric
    pub close: Option<f64>,
    /// Traded volume, when the source carries it
    pub volume: Option<f64>,
}

impl PricePoint {
    /// Create a price point carrying only a close price.
    pub fn from_close(ticker: impl Into<Ticker>, date: Date, close: f64) -> Self {
        Self {
            ticker: ticker.into(),
            date,
            open: None,
            high: None,
            low: None,
            close: Some(close),
            volume: None,
        }
    }
}

/// Point-in-time fundamentals for a ticker.
///
/// Every ratio is optional: a missing or non-numeric cell stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalRecord {
    /// Normalized ticker
    pub ticker: Ticker,
    /// Trailing price to earnings ratio
    pub trailing_pe: Option<f64>,
    /// Quarterly earnings growth
    pub earnings_growth: Option<f64>,
    /// Revenue growth
    pub revenue_growth: Option<f64>,
    /// Debt to equity
    pub debt_to_equity: Option<f64>,
    /// PEG ratio
    pub peg_ratio: Option<f64>,
    /// Previous close at the snapshot date
    pub previous_close: Option<f64>,
}

impl FundamentalRecord {
    /// Create a record carrying only a trailing P/E.
    pub fn with_pe(ticker: impl Into<Ticker>, trailing_pe: Option<f64>) -> Self {
        Self {
            ticker: ticker.into(),
            trailing_pe,
            ..Default::default()
        }
    }

    /// The P/E ratio if it is usable as a value factor.
    ///
    /// Non-finite and non-positive ratios are invalid.
    pub fn valid_pe(&self) -> Option<f64> {
        self.trailing_pe.filter(|pe| pe.is_finite() && *pe > 0.0)
    }
}

/// One row of the joined factor table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorRow {
    /// Normalized ticker
    pub ticker: Ticker,
    /// Price return over the formation year
    pub momentum: f64,
    /// Trailing P/E from the fundamentals snapshot
    pub pe: f64,
    /// Price return over the outcome year
    pub outcome: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_pe() {
        assert_eq!(FundamentalRecord::with_pe("A", Some(12.5)).valid_pe(), Some(12.5));
        assert_eq!(FundamentalRecord::with_pe("A", Some(0.0)).valid_pe(), None);
        assert_eq!(FundamentalRecord::with_pe("A", Some(-3.0)).valid_pe(), None);
        assert_eq!(FundamentalRecord::with_pe("A", Some(f64::NAN)).valid_pe(), None);
        assert_eq!(FundamentalRecord::with_pe("A", None).valid_pe(), None);
    }

    #[test]
    fn test_price_point_from_close() {
        let date = Date::from_ymd_opt(2023, 1, 2).unwrap();
        let point = PricePoint::from_close("SBIN", date, 550.0);
        assert_eq!(point.ticker, "SBIN");
        assert_eq!(point.close, Some(550.0));
        assert!(point.open.is_none());
        assert!(point.volume.is_none());
    }
}
