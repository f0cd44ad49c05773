//! Portfolio construction and statistical inference for sintra.
//!
//! This crate evaluates a factor on the joined factor table:
//! - Quantile buckets and per-bucket outcome statistics
//! - Welch t-test of the extreme buckets in the factor's direction
//! - Distribution moments and Shapiro–Wilk normality of the outcomes
//! - Spearman rank IC and a seeded bootstrap of the spread
//!
//! # Example
//!
//! ```rust,ignore
//! use sintra_eval::{InferenceEngine, build_portfolios};
//!
//! let portfolios = build_portfolios(table.rows(), &factor, 5)?;
//! let test = InferenceEngine::default().test_factor(table.rows(), &factor, &portfolios)?;
//! println!("{}", test.conclusion());
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod bootstrap;
pub mod ic;
pub mod inference;
pub mod moments;
pub mod normality;
pub mod portfolio;
pub mod quantile;
pub mod ttest;

// Re-export main types
pub use bootstrap::{BootstrapInterval, bootstrap_spread};
pub use ic::{calculate_ic, factor_ic};
pub use inference::{FactorTest, InferenceConfig, InferenceEngine, SpreadComparison, compare_spreads};
pub use moments::DistributionStats;
pub use normality::{NormalityTest, shapiro_wilk};
pub use portfolio::{Portfolio, PortfolioSet, build_portfolios};
pub use quantile::{Bucket, BucketAssignment, quantile_buckets};
pub use ttest::{SIGNIFICANCE_LEVEL, TestOutcome, WelchTest, welch_t_test};
