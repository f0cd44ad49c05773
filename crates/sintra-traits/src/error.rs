//! Error types for the sintra factor study.
//!
//! Every fatal condition of the study pipeline maps to one variant of
//! [`StudyError`]. Degenerate statistics (too few observations for a test)
//! are not errors: they are reported as absent values by the evaluation
//! crates.

use thiserror::Error;

/// The main error type for sintra operations.
#[derive(Debug, Error)]
pub enum StudyError {
    /// None of the accepted aliases for a required column is present.
    #[error("Missing required column for {field}: none of [{}] found", .aliases.join(", "))]
    MissingColumn {
        /// Logical field that could not be resolved (e.g. `price date`).
        field: String,
        /// Aliases that were tried, in order.
        aliases: Vec<String>,
    },

    /// Invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A date cell could not be parsed.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// No ticker is shared by the price and fundamentals sources.
    #[error(
        "Zero common tickers after normalization ({price_tickers} price tickers, \
         {fundamental_tickers} fundamentals tickers); check that both files cover the same universe"
    )]
    EmptyUniverse {
        /// Unique normalized tickers in the price source.
        price_tickers: usize,
        /// Unique normalized tickers in the fundamentals source.
        fundamental_tickers: usize,
    },

    /// The joined factor table has no rows.
    #[error("Factor table is empty after joining momentum, P/E and outcome returns: {0}")]
    EmptyFactorTable(String),

    /// Fundamentals contain several rows for one normalized ticker.
    #[error("Duplicate fundamentals rows after normalization for: {}", .0.join(", "))]
    DuplicateFundamentals(Vec<String>),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// IO error while reading an input file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from a statistical distribution.
    #[error("Statistics error: {0}")]
    Statistics(String),
}

/// A specialized Result type for sintra operations.
pub type Result<T> = std::result::Result<T, StudyError>;
