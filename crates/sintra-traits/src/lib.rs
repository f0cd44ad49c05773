#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sintra/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and trait definitions for the sintra factor study.
//!
//! This crate provides the foundational abstractions shared by the data,
//! factor and evaluation crates: the record types, the [`Factor`] trait, the
//! [`StudyError`] type and descriptive statistics helpers.

/// The version of the sintra-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod factor;
pub mod stats;
pub mod types;

// Re-exports
pub use error::{Result, StudyError};
pub use factor::{BucketNames, Direction, Factor};
pub use types::{Date, FactorRow, FundamentalRecord, PricePoint, Ticker};
