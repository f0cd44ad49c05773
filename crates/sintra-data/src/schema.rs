//! Column alias resolution.
//!
//! The two input files come from different publishers and name their columns
//! differently (`Date` vs `date`, `Stock` vs `Symbol`, `trailingPE` vs `P/E`).
//! Each logical field carries an ordered alias list; the first alias present
//! in the frame wins. Required fields fail fast when unresolved.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use sintra_traits::{Result, StudyError};

/// Ordered list of accepted column names for one logical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnAliases {
    /// Logical field name used in error messages
    pub field: String,
    /// Accepted column names, first match wins
    pub aliases: Vec<String>,
}

impl ColumnAliases {
    /// Create an alias list for a logical field.
    pub fn new(field: &str, aliases: &[&str]) -> Self {
        Self {
            field: field.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// First alias present in `columns`, if any.
    pub fn resolve(&self, columns: &[String]) -> Option<String> {
        self.aliases
            .iter()
            .find(|alias| columns.iter().any(|c| c == *alias))
            .cloned()
    }

    /// First alias present in `columns`, or [`StudyError::MissingColumn`].
    pub fn require(&self, columns: &[String]) -> Result<String> {
        self.resolve(columns)
            .ok_or_else(|| StudyError::MissingColumn {
                field: self.field.clone(),
                aliases: self.aliases.clone(),
            })
    }
}

/// Column names of a frame, in frame order.
pub fn column_names(frame: &DataFrame) -> Vec<String> {
    frame
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Accepted column names for the price history file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceSchema {
    /// Trading date (required)
    pub date: ColumnAliases,
    /// Stock identifier (required)
    pub ticker: ColumnAliases,
    /// Closing price (required)
    pub close: ColumnAliases,
    /// Opening price
    pub open: ColumnAliases,
    /// Daily high
    pub high: ColumnAliases,
    /// Daily low
    pub low: ColumnAliases,
    /// Traded volume
    pub volume: ColumnAliases,
}

impl Default for PriceSchema {
    fn default() -> Self {
        Self {
            date: ColumnAliases::new("price date", &["Date", "date", "DATE"]),
            ticker: ColumnAliases::new(
                "price stock identifier",
                &["Stock", "STOCK", "Symbol", "SYMBOL", "Ticker", "TICKER"],
            ),
            close: ColumnAliases::new("price close", &["Close", "close", "CLOSE", "Adj Close"]),
            open: ColumnAliases::new("price open", &["Open", "open", "OPEN"]),
            high: ColumnAliases::new("price high", &["High", "high", "HIGH"]),
            low: ColumnAliases::new("price low", &["Low", "low", "LOW"]),
            volume: ColumnAliases::new("price volume", &["Volume", "volume", "VOLUME"]),
        }
    }
}

/// Resolved price columns of one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceColumns {
    /// Date column
    pub date: String,
    /// Ticker column
    pub ticker: String,
    /// Close column
    pub close: String,
    /// Open column, if present
    pub open: Option<String>,
    /// High column, if present
    pub high: Option<String>,
    /// Low column, if present
    pub low: Option<String>,
    /// Volume column, if present
    pub volume: Option<String>,
}

impl PriceSchema {
    /// Resolve every field against the frame's columns.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::MissingColumn`] for the first unresolved
    /// required field (date, ticker, close).
    pub fn resolve(&self, frame: &DataFrame) -> Result<PriceColumns> {
        let columns = column_names(frame);
        Ok(PriceColumns {
            date: self.date.require(&columns)?,
            ticker: self.ticker.require(&columns)?,
            close: self.close.require(&columns)?,
            open: self.open.resolve(&columns),
            high: self.high.resolve(&columns),
            low: self.low.resolve(&columns),
            volume: self.volume.resolve(&columns),
        })
    }
}

/// Accepted column names for the fundamentals snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundamentalsSchema {
    /// Stock identifier (required)
    pub ticker: ColumnAliases,
    /// Trailing P/E (required)
    pub trailing_pe: ColumnAliases,
    /// Quarterly earnings growth
    pub earnings_growth: ColumnAliases,
    /// Revenue growth
    pub revenue_growth: ColumnAliases,
    /// Debt to equity
    pub debt_to_equity: ColumnAliases,
    /// PEG ratio
    pub peg_ratio: ColumnAliases,
    /// Previous close
    pub previous_close: ColumnAliases,
}

impl Default for FundamentalsSchema {
    fn default() -> Self {
        Self {
            ticker: ColumnAliases::new(
                "fundamentals stock identifier",
                &["symbol", "SYMBOL", "Symbol", "Ticker", "TICKER"],
            ),
            trailing_pe: ColumnAliases::new(
                "P/E",
                &["trailingPE", "P/E", "PE", "P_E", "PE_RATIO"],
            ),
            earnings_growth: ColumnAliases::new(
                "earnings growth",
                &["earningsQuarterlyGrowth", "earningsGrowth"],
            ),
            revenue_growth: ColumnAliases::new("revenue growth", &["revenueGrowth"]),
            debt_to_equity: ColumnAliases::new("debt to equity", &["debtToEquity"]),
            peg_ratio: ColumnAliases::new("PEG ratio", &["pegRatio", "trailingPegRatio"]),
            previous_close: ColumnAliases::new("previous close", &["previousClose"]),
        }
    }
}

/// Resolved fundamentals columns of one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundamentalsColumns {
    /// Ticker column
    pub ticker: String,
    /// P/E column
    pub trailing_pe: String,
    /// Earnings growth column, if present
    pub earnings_growth: Option<String>,
    /// Revenue growth column, if present
    pub revenue_growth: Option<String>,
    /// Debt to equity column, if present
    pub debt_to_equity: Option<String>,
    /// PEG ratio column, if present
    pub peg_ratio: Option<String>,
    /// Previous close column, if present
    pub previous_close: Option<String>,
}

impl FundamentalsSchema {
    /// Resolve every field against the frame's columns.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::MissingColumn`] when the ticker or P/E column
    /// cannot be resolved.
    pub fn resolve(&self, frame: &DataFrame) -> Result<FundamentalsColumns> {
        let columns = column_names(frame);
        Ok(FundamentalsColumns {
            ticker: self.ticker.require(&columns)?,
            trailing_pe: self.trailing_pe.require(&columns)?,
            earnings_growth: self.earnings_growth.resolve(&columns),
            revenue_growth: self.revenue_growth.resolve(&columns),
            debt_to_equity: self.debt_to_equity.resolve(&columns),
            peg_ratio: self.peg_ratio.resolve(&columns),
            previous_close: self.previous_close.resolve(&columns),
        })
    }
}
