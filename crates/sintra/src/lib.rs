#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sintra/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! ## Crate Organization
//!
//! - [`traits`] - Shared types, the [`Factor`] trait and [`StudyError`]
//! - [`data`] - Ticker normalization, CSV loading and reconciliation
//! - [`factors`] - Period returns, momentum and value factors, factor table
//! - [`eval`] - Quantile portfolios and hypothesis tests
//! - [`config`] / [`study`] / [`report`] - The end-to-end pipeline

/// Version information for the sintra crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod report;
pub mod study;

// ============================================================================
// Re-exports
// ============================================================================

/// Shared types and the [`Factor`] trait.
pub mod traits {
    pub use sintra_traits::*;
}

/// Data layer: normalization, loading, reconciliation and coverage.
///
/// # Example
///
/// ```
/// use sintra::data::normalize_ticker;
///
/// assert_eq!(normalize_ticker("sbin-eq"), normalize_ticker("SBIN.NS"));
/// ```
pub mod data {
    pub use sintra_data::*;
}

/// Factor calculation: period returns, momentum, value and the factor table.
pub mod factors {
    pub use sintra_factors::*;
}

/// Portfolio construction and inference.
///
/// ## Decision rule
///
/// Each factor's favoured extreme bucket is compared with the disfavoured
/// one by a one-sided Welch t-test:
///
/// ```text
/// momentum: H1  mean(Qn_High)  > mean(Q1_Low)
/// value:    H1  mean(Q1_Value) > mean(Qn_Growth)
/// ```
///
/// The null is rejected when `p < 0.05`.
pub mod eval {
    pub use sintra_eval::*;
}

pub use config::StudyConfig;
pub use report::{FactorReport, StudyReport};
pub use study::Study;
pub use sintra_traits::{Factor, Result, StudyError};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{Factor, Result, Study, StudyConfig, StudyError, StudyReport};
}
