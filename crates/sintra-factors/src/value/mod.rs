//! Value factor based on the trailing P/E ratio.
//!
//! A low P/E marks a cheap stock. Only finite, strictly positive ratios take
//! part: loss-making companies report a negative or missing P/E, which says
//! nothing about cheapness.

use std::collections::BTreeMap;

use sintra_traits::{BucketNames, Direction, Factor, FactorRow, FundamentalRecord, Ticker};

/// Usable P/E ratio per ticker.
pub fn valid_pe_values(fundamentals: &BTreeMap<Ticker, FundamentalRecord>) -> BTreeMap<Ticker, f64> {
    fundamentals
        .iter()
        .filter_map(|(ticker, record)| record.valid_pe().map(|pe| (ticker.clone(), pe)))
        .collect()
}

/// Trailing P/E; cheap stocks are expected to beat expensive ones.
#[derive(Debug, Clone)]
pub struct ValueFactor {
    outcome_year: i32,
}

impl ValueFactor {
    /// Value factor tested against `outcome_year`.
    #[must_use]
    pub const fn new(outcome_year: i32) -> Self {
        Self { outcome_year }
    }
}

impl Factor for ValueFactor {
    fn name(&self) -> &str {
        "value_pe"
    }

    fn direction(&self) -> Direction {
        Direction::LowerIsBetter
    }

    fn bucket_names(&self) -> BucketNames {
        BucketNames {
            low: "Value",
            high: "Growth",
        }
    }

    fn value(&self, row: &FactorRow) -> f64 {
        row.pe
    }

    fn hypotheses(&self) -> (String, String) {
        (
            format!(
                "low P/E stocks do not outperform high P/E stocks in {}",
                self.outcome_year
            ),
            format!(
                "low P/E stocks outperform high P/E stocks in {}",
                self.outcome_year
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_pe_filter() {
        let mut fundamentals = BTreeMap::new();
        for (ticker, pe) in [
            ("A", Some(12.0)),
            ("B", Some(-4.0)),
            ("C", Some(0.0)),
            ("D", None),
            ("E", Some(f64::INFINITY)),
            ("F", Some(f64::NAN)),
        ] {
            fundamentals.insert(ticker.to_string(), FundamentalRecord::with_pe(ticker, pe));
        }

        let values = valid_pe_values(&fundamentals);
        assert_eq!(values.len(), 1);
        assert_eq!(values["A"], 12.0);
    }

    #[test]
    fn test_value_factor() {
        let factor = ValueFactor::new(2024);
        assert_eq!(factor.direction(), Direction::LowerIsBetter);
        assert_eq!(factor.bucket_names().label(1, 5), "Q1_Value");
        assert_eq!(factor.bucket_names().label(5, 5), "Q5_Growth");

        let row = FactorRow {
            ticker: "TCS".to_string(),
            momentum: 0.1,
            pe: 30.0,
            outcome: -0.05,
        };
        assert_eq!(factor.value(&row), 30.0);
    }
}
