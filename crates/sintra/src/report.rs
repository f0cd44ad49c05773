//! Study report.

use serde::{Deserialize, Serialize};
use sintra_data::ReconcileDiagnostics;
use sintra_eval::{DistributionStats, FactorTest, NormalityTest, PortfolioSet, SpreadComparison};
use sintra_factors::{CorrelationMatrix, FactorSummary, LegSizes};
use sintra_traits::{FactorRow, Result, StudyError};

/// Portfolios and test of one factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorReport {
    /// Quantile portfolios
    pub portfolios: PortfolioSet,
    /// Extreme-bucket test, IC and bootstrap
    pub test: FactorTest,
}

/// Everything one study run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyReport {
    /// Year momentum is measured over
    pub formation_year: i32,
    /// Year returns are explained over
    pub outcome_year: i32,
    /// Buckets requested per factor
    pub buckets: usize,
    /// Counts and samples of the reconciliation
    pub reconciliation: ReconcileDiagnostics,
    /// Sizes of the factor join legs
    pub legs: LegSizes,
    /// The factor table, sorted by ticker
    pub rows: Vec<FactorRow>,
    /// Per-column summary of the factor table
    pub summary: FactorSummary,
    /// Correlations of momentum, P/E and outcome
    pub correlations: CorrelationMatrix,
    /// Momentum factor results
    pub momentum: FactorReport,
    /// Value factor results
    pub value: FactorReport,
    /// Which factor showed the larger spread
    pub comparison: SpreadComparison,
    /// Moments of the outcome returns
    pub outcome_distribution: DistributionStats,
    /// Normality of the outcome returns
    pub normality: NormalityTest,
}

impl StudyReport {
    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::InvalidData`] if a value cannot be serialized.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| StudyError::InvalidData(e.to_string()))
    }

    /// Both factor reports, momentum first.
    pub fn factors(&self) -> [&FactorReport; 2] {
        [&self.momentum, &self.value]
    }
}
