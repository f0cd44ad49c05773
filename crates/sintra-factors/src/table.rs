//! Joined factor table.
//!
//! One row per ticker holding formation-year momentum, trailing P/E and the
//! outcome-year return. A ticker missing any of the three legs is dropped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sintra_traits::stats::{ColumnSummary, pearson};
use sintra_traits::{Factor, FactorRow, FundamentalRecord, PricePoint, Result, StudyError, Ticker};
use tracing::info;

use crate::momentum::{PeriodReturns, PriceHistory};
use crate::value::valid_pe_values;

/// Ticker counts of each join leg.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegSizes {
    /// Tickers with a formation-year return
    pub momentum: usize,
    /// Tickers with a valid P/E
    pub value: usize,
    /// Tickers with an outcome-year return
    pub outcome: usize,
    /// Tickers excluded from momentum
    pub momentum_excluded: usize,
    /// Tickers excluded from the outcome
    pub outcome_excluded: usize,
}

/// Builds a [`FactorTable`] from reconciled inputs.
#[derive(Debug, Clone, Copy)]
pub struct FactorTableBuilder {
    formation_year: i32,
    outcome_year: i32,
    min_points: usize,
}

impl FactorTableBuilder {
    /// Builder for momentum over `formation_year` and returns over `outcome_year`.
    #[must_use]
    pub const fn new(formation_year: i32, outcome_year: i32) -> Self {
        Self {
            formation_year,
            outcome_year,
            min_points: 1,
        }
    }

    /// Require at least `min_points` price observations per year.
    #[must_use]
    pub const fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    /// Inner-join momentum, P/E and outcome by ticker.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::EmptyFactorTable`] when no ticker has all three
    /// legs. The message names each leg's size and the legs that are empty.
    pub fn build(
        &self,
        prices: &[PricePoint],
        fundamentals: &BTreeMap<Ticker, FundamentalRecord>,
    ) -> Result<FactorTable> {
        let history = PriceHistory::from_points(prices);
        let momentum = PeriodReturns::compute(&history, self.formation_year, self.min_points);
        let outcome = PeriodReturns::compute(&history, self.outcome_year, self.min_points);
        let pe = valid_pe_values(fundamentals);

        let legs = LegSizes {
            momentum: momentum.len(),
            value: pe.len(),
            outcome: outcome.len(),
            momentum_excluded: momentum.excluded(),
            outcome_excluded: outcome.excluded(),
        };

        info!(
            momentum = legs.momentum,
            value = legs.value,
            outcome = legs.outcome,
            "Factor legs computed"
        );

        let rows: Vec<FactorRow> = momentum
            .returns
            .iter()
            .filter_map(|(ticker, &momentum)| {
                Some(FactorRow {
                    ticker: ticker.clone(),
                    momentum,
                    pe: *pe.get(ticker)?,
                    outcome: outcome.get(ticker)?,
                })
            })
            .collect();

        if rows.is_empty() {
            return Err(StudyError::EmptyFactorTable(self.describe_empty(&legs)));
        }

        info!(rows = rows.len(), "Factor table built");

        Ok(FactorTable {
            formation_year: self.formation_year,
            outcome_year: self.outcome_year,
            rows,
            legs,
        })
    }

    fn describe_empty(&self, legs: &LegSizes) -> String {
        let sizes = [
            (format!("momentum({})", self.formation_year), legs.momentum),
            ("P/E".to_string(), legs.value),
            (format!("return({})", self.outcome_year), legs.outcome),
        ];
        let listed: Vec<String> = sizes
            .iter()
            .map(|(name, n)| format!("{name}: {n} tickers"))
            .collect();
        let empty: Vec<&str> = sizes
            .iter()
            .filter(|(_, n)| *n == 0)
            .map(|(name, _)| name.as_str())
            .collect();

        if empty.is_empty() {
            format!("{}; legs do not overlap", listed.join(", "))
        } else {
            format!("{}; no data for {}", listed.join(", "), empty.join(", "))
        }
    }
}

/// Per-column summary of the factor table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorSummary {
    /// Formation-year momentum
    pub momentum: ColumnSummary,
    /// Trailing P/E
    pub pe: ColumnSummary,
    /// Outcome-year return
    pub outcome: ColumnSummary,
}

/// Pearson correlations of momentum, P/E and outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// Column names, in matrix order
    pub columns: Vec<String>,
    /// Row-major correlations; `None` where a column is constant
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Correlation between two named columns.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

/// The joined factor table, sorted by ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorTable {
    formation_year: i32,
    outcome_year: i32,
    rows: Vec<FactorRow>,
    legs: LegSizes,
}

impl FactorTable {
    /// Table from rows, sorted by ticker.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::EmptyFactorTable`] for an empty row set and
    /// [`StudyError::InvalidData`] for non-finite values.
    pub fn from_rows(formation_year: i32, outcome_year: i32, mut rows: Vec<FactorRow>) -> Result<Self> {
        if rows.is_empty() {
            return Err(StudyError::EmptyFactorTable("no rows".to_string()));
        }
        if let Some(row) = rows
            .iter()
            .find(|r| !(r.momentum.is_finite() && r.pe.is_finite() && r.outcome.is_finite()))
        {
            return Err(StudyError::InvalidData(format!(
                "non-finite factor value for {}",
                row.ticker
            )));
        }
        rows.sort_by(|a, b| a.ticker.cmp(&b.ticker));
        let legs = LegSizes {
            momentum: rows.len(),
            value: rows.len(),
            outcome: rows.len(),
            ..Default::default()
        };
        Ok(Self {
            formation_year,
            outcome_year,
            rows,
            legs,
        })
    }

    /// Formation year.
    #[must_use]
    pub const fn formation_year(&self) -> i32 {
        self.formation_year
    }

    /// Outcome year.
    #[must_use]
    pub const fn outcome_year(&self) -> i32 {
        self.outcome_year
    }

    /// Rows, sorted by ticker.
    pub fn rows(&self) -> &[FactorRow] {
        &self.rows
    }

    /// Sizes of the join legs.
    #[must_use]
    pub const fn legs(&self) -> &LegSizes {
        &self.legs
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `(ticker, factor value)` pairs for `factor`.
    pub fn factor_values(&self, factor: &dyn Factor) -> Vec<(Ticker, f64)> {
        self.rows
            .iter()
            .map(|row| (row.ticker.clone(), factor.value(row)))
            .collect()
    }

    /// Outcome return per ticker.
    pub fn outcomes(&self) -> BTreeMap<Ticker, f64> {
        self.rows
            .iter()
            .map(|row| (row.ticker.clone(), row.outcome))
            .collect()
    }

    /// Outcome returns in row order.
    pub fn outcome_values(&self) -> Vec<f64> {
        self.rows.iter().map(|row| row.outcome).collect()
    }

    fn columns(&self) -> [(&'static str, Vec<f64>); 3] {
        [
            ("momentum", self.rows.iter().map(|r| r.momentum).collect()),
            ("pe", self.rows.iter().map(|r| r.pe).collect()),
            ("outcome", self.outcome_values()),
        ]
    }

    /// count/mean/std/min/quartiles/max of each column.
    pub fn summary(&self) -> FactorSummary {
        let [(_, momentum), (_, pe), (_, outcome)] = self.columns();
        FactorSummary {
            momentum: ColumnSummary::from_values(&momentum),
            pe: ColumnSummary::from_values(&pe),
            outcome: ColumnSummary::from_values(&outcome),
        }
    }

    /// Pearson correlation matrix of momentum, P/E and outcome.
    pub fn correlations(&self) -> CorrelationMatrix {
        let columns = self.columns();
        let values = columns
            .iter()
            .map(|(_, x)| columns.iter().map(|(_, y)| pearson(x, y)).collect())
            .collect();
        CorrelationMatrix {
            columns: columns.iter().map(|(name, _)| (*name).to_string()).collect(),
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sintra_traits::Date;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    fn yearly(ticker: &str, year: i32, start: f64, end: f64) -> Vec<PricePoint> {
        vec![
            PricePoint::from_close(ticker, date(year, 1, 2), start),
            PricePoint::from_close(ticker, date(year, 12, 29), end),
        ]
    }

    fn fundamentals(entries: &[(&str, Option<f64>)]) -> BTreeMap<Ticker, FundamentalRecord> {
        entries
            .iter()
            .map(|(t, pe)| (t.to_string(), FundamentalRecord::with_pe(*t, *pe)))
            .collect()
    }

    #[test]
    fn test_inner_join() {
        let mut prices = Vec::new();
        prices.extend(yearly("A", 2023, 100.0, 120.0));
        prices.extend(yearly("A", 2024, 120.0, 132.0));
        prices.extend(yearly("B", 2023, 50.0, 40.0));
        prices.extend(yearly("B", 2024, 40.0, 50.0));
        // no outcome year
        prices.extend(yearly("C", 2023, 10.0, 11.0));
        // no valid P/E
        prices.extend(yearly("D", 2023, 10.0, 11.0));
        prices.extend(yearly("D", 2024, 11.0, 12.0));

        let fundamentals = fundamentals(&[
            ("A", Some(10.0)),
            ("B", Some(25.0)),
            ("C", Some(8.0)),
            ("D", Some(-3.0)),
        ]);

        let table = FactorTableBuilder::new(2023, 2024)
            .build(&prices, &fundamentals)
            .unwrap();

        assert_eq!(table.len(), 2);
        let a = &table.rows()[0];
        assert_eq!(a.ticker, "A");
        assert_relative_eq!(a.momentum, 0.2);
        assert_relative_eq!(a.outcome, 0.1);
        assert_eq!(a.pe, 10.0);
        assert_eq!(table.legs().momentum, 4);
        assert_eq!(table.legs().value, 3);
        assert_eq!(table.legs().outcome, 3);
    }

    #[test]
    fn test_empty_join_names_legs() {
        let prices = yearly("A", 2023, 100.0, 120.0);
        let fundamentals = fundamentals(&[("A", Some(10.0))]);

        let err = FactorTableBuilder::new(2023, 2024)
            .build(&prices, &fundamentals)
            .unwrap_err();
        match err {
            StudyError::EmptyFactorTable(message) => {
                assert!(message.contains("momentum(2023): 1 tickers"));
                assert!(message.contains("no data for return(2024)"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_disjoint_legs() {
        let mut prices = yearly("A", 2023, 100.0, 120.0);
        prices.extend(yearly("B", 2024, 100.0, 120.0));
        let fundamentals = fundamentals(&[("A", Some(10.0))]);

        let err = FactorTableBuilder::new(2023, 2024)
            .build(&prices, &fundamentals)
            .unwrap_err();
        assert!(err.to_string().contains("legs do not overlap"));
    }

    #[test]
    fn test_min_points_excludes_single_observation() {
        let mut prices = vec![PricePoint::from_close("A", date(2023, 6, 1), 100.0)];
        prices.extend(yearly("A", 2024, 100.0, 110.0));
        prices.extend(yearly("B", 2023, 100.0, 90.0));
        prices.extend(yearly("B", 2024, 90.0, 99.0));
        let fundamentals = fundamentals(&[("A", Some(10.0)), ("B", Some(12.0))]);

        let lenient = FactorTableBuilder::new(2023, 2024)
            .build(&prices, &fundamentals)
            .unwrap();
        assert_eq!(lenient.len(), 2);
        assert_eq!(lenient.rows()[0].momentum, 0.0);

        let strict = FactorTableBuilder::new(2023, 2024)
            .with_min_points(2)
            .build(&prices, &fundamentals)
            .unwrap();
        assert_eq!(strict.len(), 1);
        assert_eq!(strict.legs().momentum_excluded, 1);
    }

    #[test]
    fn test_summary_and_correlations() {
        let rows = vec![
            FactorRow { ticker: "C".into(), momentum: 0.3, pe: 30.0, outcome: 0.3 },
            FactorRow { ticker: "A".into(), momentum: 0.1, pe: 10.0, outcome: 0.1 },
            FactorRow { ticker: "B".into(), momentum: 0.2, pe: 20.0, outcome: 0.2 },
        ];
        let table = FactorTable::from_rows(2023, 2024, rows).unwrap();
        assert_eq!(table.rows()[0].ticker, "A");

        let summary = table.summary();
        assert_eq!(summary.pe.count, 3);
        assert_relative_eq!(summary.pe.mean.unwrap(), 20.0);
        assert_relative_eq!(summary.pe.median.unwrap(), 20.0);
        assert_relative_eq!(summary.pe.std.unwrap(), 10.0);

        let correlations = table.correlations();
        assert_eq!(correlations.columns, vec!["momentum", "pe", "outcome"]);
        assert_relative_eq!(correlations.get("momentum", "outcome").unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(correlations.get("pe", "pe").unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_from_rows_rejects_non_finite() {
        let rows = vec![FactorRow {
            ticker: "A".into(),
            momentum: f64::NAN,
            pe: 10.0,
            outcome: 0.1,
        }];
        assert!(matches!(
            FactorTable::from_rows(2023, 2024, rows),
            Err(StudyError::InvalidData(_))
        ));
        assert!(matches!(
            FactorTable::from_rows(2023, 2024, Vec::new()),
            Err(StudyError::EmptyFactorTable(_))
        ));
    }
}
