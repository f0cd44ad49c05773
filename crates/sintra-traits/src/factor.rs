//! Factor trait for cross-sectional factor studies.
//!
//! A factor extracts one value per stock from the joined [`FactorRow`] and
//! states which end of its distribution is expected to outperform. Portfolio
//! construction and hypothesis testing are written against this trait, so the
//! momentum and value factors share one code path.

use crate::FactorRow;
use serde::{Deserialize, Serialize};

/// Which end of the factor distribution is hypothesized to earn more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// High factor values are expected to outperform (momentum).
    HigherIsBetter,
    /// Low factor values are expected to outperform (value via P/E).
    LowerIsBetter,
}

impl Direction {
    /// Spread between the favoured and the disfavoured extreme bucket means.
    ///
    /// `bottom` is the mean of the lowest-value bucket, `top` of the highest.
    #[must_use]
    pub fn spread(&self, bottom: f64, top: f64) -> f64 {
        match self {
            Self::HigherIsBetter => top - bottom,
            Self::LowerIsBetter => bottom - top,
        }
    }
}

/// Names used for the extreme buckets of a factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketNames {
    /// Suffix for the lowest-value bucket (e.g. `Low`, `Value`).
    pub low: &'static str,
    /// Suffix for the highest-value bucket (e.g. `High`, `Growth`).
    pub high: &'static str,
}

impl BucketNames {
    /// Label of the bucket with 1-based `ordinal` out of `count` buckets.
    ///
    /// Extremes get the named suffix (`Q1_Low`, `Q5_High`); middle buckets
    /// are plain ordinals (`Q3`). A single bucket carries the low name.
    #[must_use]
    pub fn label(&self, ordinal: usize, count: usize) -> String {
        if ordinal == 1 {
            format!("Q1_{}", self.low)
        } else if ordinal == count {
            format!("Q{ordinal}_{}", self.high)
        } else {
            format!("Q{ordinal}")
        }
    }
}

/// A cross-sectional factor evaluated on the joined factor table.
pub trait Factor: Send + Sync {
    /// Identifier used in logs and reports (e.g. `momentum_2023`).
    fn name(&self) -> &str;

    /// Expected direction of the factor premium.
    fn direction(&self) -> Direction;

    /// Names of the extreme buckets.
    fn bucket_names(&self) -> BucketNames;

    /// The factor value of one row.
    fn value(&self, row: &FactorRow) -> f64;

    /// Null and alternative hypotheses of the extreme-bucket test, in words.
    fn hypotheses(&self) -> (String, String);
}
