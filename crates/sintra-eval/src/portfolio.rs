//! Quantile portfolios of a factor.
//!
//! Stocks are bucketed on the factor value and each bucket is summarized by
//! the outcome returns of its members.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sintra_traits::stats::{mean, sample_std};
use sintra_traits::{Direction, Factor, FactorRow, Result, Ticker};
use tracing::{debug, info};

use crate::quantile::quantile_buckets;

/// One quantile portfolio with outcome statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    /// Display label (`Q1_Low`, `Q3`, `Q5_Growth`)
    pub label: String,
    /// 1-based ordinal, ascending by factor value
    pub ordinal: usize,
    /// Lower factor edge
    pub lower: f64,
    /// Upper factor edge
    pub upper: f64,
    /// Member tickers
    pub tickers: Vec<Ticker>,
    /// Outcome returns of the members
    pub returns: Vec<f64>,
    /// Mean outcome return
    pub mean: f64,
    /// Sample standard deviation, absent below two members
    pub std: Option<f64>,
    /// Number of members
    pub count: usize,
    /// Standard error of the mean
    pub std_error: Option<f64>,
}

/// All quantile portfolios of one factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSet {
    /// Factor name
    pub factor: String,
    /// Factor direction
    pub direction: Direction,
    /// Buckets requested
    pub requested: usize,
    /// Realized portfolios, ascending by factor value
    pub portfolios: Vec<Portfolio>,
}

impl PortfolioSet {
    /// Lowest-value portfolio.
    pub fn bottom(&self) -> Option<&Portfolio> {
        self.portfolios.first()
    }

    /// Highest-value portfolio.
    pub fn top(&self) -> Option<&Portfolio> {
        self.portfolios.last()
    }

    /// Portfolio the factor expects to outperform.
    pub fn favoured(&self) -> Option<&Portfolio> {
        match self.direction {
            Direction::HigherIsBetter => self.top(),
            Direction::LowerIsBetter => self.bottom(),
        }
    }

    /// Portfolio the factor expects to underperform.
    pub fn disfavoured(&self) -> Option<&Portfolio> {
        match self.direction {
            Direction::HigherIsBetter => self.bottom(),
            Direction::LowerIsBetter => self.top(),
        }
    }

    /// Favoured minus disfavoured mean outcome.
    pub fn spread(&self) -> Option<f64> {
        let bottom = self.bottom()?;
        let top = self.top()?;
        Some(self.direction.spread(bottom.mean, top.mean))
    }

    /// Number of realized portfolios.
    pub fn len(&self) -> usize {
        self.portfolios.len()
    }

    /// Whether no portfolio was realized.
    pub fn is_empty(&self) -> bool {
        self.portfolios.is_empty()
    }
}

/// Bucket `rows` on `factor` into at most `k` portfolios.
///
/// # Errors
///
/// Propagates [`quantile_buckets`] errors for `k == 0` or non-finite
/// factor values.
pub fn build_portfolios(rows: &[FactorRow], factor: &dyn Factor, k: usize) -> Result<PortfolioSet> {
    let values: Vec<(Ticker, f64)> = rows
        .iter()
        .map(|row| (row.ticker.clone(), factor.value(row)))
        .collect();
    let outcomes: BTreeMap<&str, f64> = rows
        .iter()
        .map(|row| (row.ticker.as_str(), row.outcome))
        .collect();

    let assignment = quantile_buckets(&values, k)?;
    let names = factor.bucket_names();
    let count = assignment.len();

    if count < k {
        info!(
            factor = factor.name(),
            requested = k,
            realized = count,
            "Tied factor values merged buckets"
        );
    }

    let portfolios = assignment
        .buckets
        .into_iter()
        .map(|bucket| {
            let tickers: Vec<Ticker> = bucket.members.into_iter().map(|(t, _)| t).collect();
            let returns: Vec<f64> = tickers
                .iter()
                .filter_map(|t| outcomes.get(t.as_str()).copied())
                .collect();
            let std = sample_std(&returns);
            let portfolio = Portfolio {
                label: names.label(bucket.ordinal, count),
                ordinal: bucket.ordinal,
                lower: bucket.lower,
                upper: bucket.upper,
                mean: mean(&returns).unwrap_or_default(),
                std,
                count: returns.len(),
                std_error: std.map(|s| s / (returns.len() as f64).sqrt()),
                tickers,
                returns,
            };
            debug!(
                factor = factor.name(),
                label = %portfolio.label,
                count = portfolio.count,
                mean = portfolio.mean,
                "Portfolio built"
            );
            portfolio
        })
        .collect();

    Ok(PortfolioSet {
        factor: factor.name().to_string(),
        direction: factor.direction(),
        requested: k,
        portfolios,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sintra_traits::BucketNames;

    struct Momentum;

    impl Factor for Momentum {
        fn name(&self) -> &str {
            "momentum_2023"
        }
        fn direction(&self) -> Direction {
            Direction::HigherIsBetter
        }
        fn bucket_names(&self) -> BucketNames {
            BucketNames { low: "Low", high: "High" }
        }
        fn value(&self, row: &FactorRow) -> f64 {
            row.momentum
        }
        fn hypotheses(&self) -> (String, String) {
            (String::new(), String::new())
        }
    }

    fn row(ticker: &str, momentum: f64, outcome: f64) -> FactorRow {
        FactorRow {
            ticker: ticker.to_string(),
            momentum,
            pe: 10.0,
            outcome,
        }
    }

    #[test]
    fn test_singleton_portfolios() {
        let rows = vec![
            row("A", 0.1, 0.05),
            row("B", 0.2, 0.10),
            row("C", 0.3, 0.15),
            row("D", 0.4, 0.20),
            row("E", 0.5, 0.25),
        ];
        let set = build_portfolios(&rows, &Momentum, 5).unwrap();
        assert_eq!(set.len(), 5);
        assert_eq!(set.bottom().unwrap().label, "Q1_Low");
        assert_eq!(set.portfolios[2].label, "Q3");
        assert_eq!(set.top().unwrap().label, "Q5_High");
        assert!(set.portfolios.iter().all(|p| p.count == 1 && p.std.is_none()));
        assert_relative_eq!(set.spread().unwrap(), 0.20, epsilon = 1e-12);
        assert_eq!(set.favoured().unwrap().tickers, vec!["E".to_string()]);
    }

    #[test]
    fn test_bucket_statistics() {
        let rows = vec![
            row("A", 0.1, 0.0),
            row("B", 0.2, 0.2),
            row("C", 0.8, 0.4),
            row("D", 0.9, 0.8),
        ];
        let set = build_portfolios(&rows, &Momentum, 2).unwrap();
        assert_eq!(set.len(), 2);

        let low = set.bottom().unwrap();
        assert_eq!(low.count, 2);
        assert_relative_eq!(low.mean, 0.1);
        let expected_std = 0.02_f64.sqrt();
        assert_relative_eq!(low.std.unwrap(), expected_std, epsilon = 1e-12);
        assert_relative_eq!(low.std_error.unwrap(), expected_std / 2.0_f64.sqrt(), epsilon = 1e-12);

        let high = set.top().unwrap();
        assert_eq!(high.label, "Q2_High");
        assert_relative_eq!(high.mean, 0.6, epsilon = 1e-12);
        assert_relative_eq!(set.spread().unwrap(), 0.5, epsilon = 1e-12);
    }
}
