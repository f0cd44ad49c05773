//! Momentum factor.

use sintra_traits::{BucketNames, Direction, Factor, FactorRow};

/// Formation-year price return; winners are expected to keep winning.
#[derive(Debug, Clone)]
pub struct MomentumFactor {
    name: String,
    formation_year: i32,
    outcome_year: i32,
}

impl MomentumFactor {
    /// Momentum measured over `formation_year`, tested against `outcome_year`.
    pub fn new(formation_year: i32, outcome_year: i32) -> Self {
        Self {
            name: format!("momentum_{formation_year}"),
            formation_year,
            outcome_year,
        }
    }

    /// Year the factor is measured over.
    #[must_use]
    pub const fn formation_year(&self) -> i32 {
        self.formation_year
    }
}

impl Factor for MomentumFactor {
    fn name(&self) -> &str {
        &self.name
    }

    fn direction(&self) -> Direction {
        Direction::HigherIsBetter
    }

    fn bucket_names(&self) -> BucketNames {
        BucketNames {
            low: "Low",
            high: "High",
        }
    }

    fn value(&self, row: &FactorRow) -> f64 {
        row.momentum
    }

    fn hypotheses(&self) -> (String, String) {
        (
            format!(
                "high {} momentum stocks do not outperform low momentum stocks in {}",
                self.formation_year, self.outcome_year
            ),
            format!(
                "high {} momentum stocks outperform low momentum stocks in {}",
                self.formation_year, self.outcome_year
            ),
        )
    }
}
