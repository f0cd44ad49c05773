//! Data layer for the sintra factor study.
//!
//! This crate turns the two raw input files into one reconciled view:
//!
//! - [`normalize_ticker`] maps source-specific identifiers onto one key space
//! - [`PriceSchema`] / [`FundamentalsSchema`] resolve column aliases
//! - [`PriceTable`] / [`FundamentalsTable`] parse CSV files through polars
//! - [`Reconciler`] applies the year window and the common-ticker universe
//! - [`FundamentalsCoverage`] inspects what a fundamentals file can support
//!
//! # Usage
//!
//! ```rust,ignore
//! use sintra_data::{FundamentalsTable, PriceTable, Reconciler};
//!
//! let prices = PriceTable::from_csv(prices_path, &Default::default())?;
//! let fundamentals = FundamentalsTable::from_csv(fundamentals_path, &Default::default())?;
//! let data = Reconciler::new([2023, 2024]).reconcile(&prices, &fundamentals)?;
//! println!("{} common tickers", data.diagnostics.common_tickers);
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod coverage;
pub mod loader;
pub mod normalize;
pub mod reconcile;
pub mod schema;

pub use coverage::FundamentalsCoverage;
pub use loader::{FundamentalsTable, PriceTable, parse_date, parse_number, read_csv};
pub use normalize::normalize_ticker;
pub use reconcile::{DuplicatePolicy, ReconcileDiagnostics, ReconciledData, Reconciler};
pub use schema::{ColumnAliases, FundamentalsSchema, PriceSchema};
