//! Factor calculation for the sintra momentum/value study.
//!
//! This crate turns reconciled prices and fundamentals into the joined
//! factor table:
//! - Momentum: calendar-year price return in the formation year
//! - Value: trailing P/E, valid only when finite and strictly positive
//! - Outcome: calendar-year price return in the outcome year
//!
//! # Example
//!
//! ```ignore
//! use sintra_factors::FactorTableBuilder;
//!
//! let table = FactorTableBuilder::new(2023, 2024).build(&prices, &fundamentals)?;
//! println!("{} stocks", table.len());
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod momentum;
pub mod table;
pub mod value;

pub use momentum::{Exclusion, MomentumFactor, PeriodReturns, PriceHistory};
pub use table::{CorrelationMatrix, FactorSummary, FactorTable, FactorTableBuilder, LegSizes};
pub use value::{ValueFactor, valid_pe_values};
