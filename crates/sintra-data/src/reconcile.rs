//! Dataset reconciliation.
//!
//! Restricts the price history to the study's calendar years, normalizes the
//! tickers of both sources and keeps only the stocks present in both.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use sintra_traits::{Date, FundamentalRecord, PricePoint, Result, StudyError, Ticker};
use tracing::{info, warn};

use crate::loader::{FundamentalsTable, PriceTable};
use crate::normalize::normalize_ticker;

/// Number of tickers shown in diagnostic samples.
const SAMPLE_SIZE: usize = 10;

/// What to do when several fundamentals rows normalize to one ticker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Report the tickers and exclude them from the fundamentals view.
    #[default]
    Drop,
    /// Abort with [`StudyError::DuplicateFundamentals`].
    Fail,
}

/// Counts and samples describing one reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconcileDiagnostics {
    /// Calendar years kept
    pub years: Vec<i32>,
    /// Price rows parsed from the source
    pub price_rows: usize,
    /// Price rows dropped at load time (no date)
    pub price_rows_dropped: usize,
    /// Price rows inside the year window
    pub price_rows_in_window: usize,
    /// First date inside the window
    pub first_date: Option<Date>,
    /// Last date inside the window
    pub last_date: Option<Date>,
    /// Unique normalized tickers in the windowed price rows
    pub price_tickers: usize,
    /// Unique normalized tickers in the fundamentals
    pub fundamental_tickers: usize,
    /// Tickers present in both sources
    pub common_tickers: usize,
    /// First tickers of the price universe
    pub price_sample: Vec<Ticker>,
    /// First tickers of the fundamentals universe
    pub fundamental_sample: Vec<Ticker>,
    /// First common tickers
    pub common_sample: Vec<Ticker>,
    /// Common tickers with more than one fundamentals row
    pub duplicate_fundamentals: Vec<Ticker>,
}

/// Both sources restricted to the common universe and the year window.
#[derive(Debug, Clone)]
pub struct ReconciledData {
    /// Price points with normalized tickers
    pub prices: Vec<PricePoint>,
    /// One fundamentals record per common ticker, keyed by normalized ticker
    pub fundamentals: BTreeMap<Ticker, FundamentalRecord>,
    /// Diagnostics
    pub diagnostics: ReconcileDiagnostics,
}

impl ReconciledData {
    /// The common ticker universe.
    pub fn universe(&self) -> BTreeSet<Ticker> {
        self.prices.iter().map(|p| p.ticker.clone()).collect()
    }
}

/// Aligns the price history with the fundamentals snapshot.
#[derive(Debug, Clone)]
pub struct Reconciler {
    years: BTreeSet<i32>,
    duplicate_policy: DuplicatePolicy,
}

impl Reconciler {
    /// Create a reconciler keeping the given calendar years.
    pub fn new(years: impl IntoIterator<Item = i32>) -> Self {
        Self {
            years: years.into_iter().collect(),
            duplicate_policy: DuplicatePolicy::default(),
        }
    }

    /// Set the duplicate fundamentals policy.
    #[must_use]
    pub const fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Reconcile the two sources.
    ///
    /// # Errors
    ///
    /// - [`StudyError::EmptyUniverse`] when no normalized ticker is shared.
    /// - [`StudyError::DuplicateFundamentals`] under [`DuplicatePolicy::Fail`]
    ///   when a common ticker has several fundamentals rows.
    pub fn reconcile(
        &self,
        prices: &PriceTable,
        fundamentals: &FundamentalsTable,
    ) -> Result<ReconciledData> {
        let windowed: Vec<PricePoint> = prices
            .points()
            .iter()
            .filter(|p| self.years.contains(&p.date.year()))
            .map(|p| PricePoint {
                ticker: normalize_ticker(&p.ticker),
                ..p.clone()
            })
            .collect();

        if windowed.is_empty() {
            warn!(years = ?self.years, "no price rows inside the configured years");
        }

        let first_date = windowed.iter().map(|p| p.date).min();
        let last_date = windowed.iter().map(|p| p.date).max();

        let price_universe: BTreeSet<Ticker> = windowed
            .iter()
            .map(|p| p.ticker.clone())
            .filter(|t| !t.is_empty())
            .collect();

        let mut grouped: BTreeMap<Ticker, Vec<FundamentalRecord>> = BTreeMap::new();
        for record in fundamentals.records() {
            let ticker = normalize_ticker(&record.ticker);
            if ticker.is_empty() {
                continue;
            }
            grouped.entry(ticker.clone()).or_default().push(FundamentalRecord {
                ticker,
                ..record.clone()
            });
        }
        let fundamental_universe: BTreeSet<Ticker> = grouped.keys().cloned().collect();

        let common: BTreeSet<Ticker> = price_universe
            .intersection(&fundamental_universe)
            .cloned()
            .collect();

        info!(
            price_tickers = price_universe.len(),
            fundamental_tickers = fundamental_universe.len(),
            common_tickers = common.len(),
            "normalized ticker universes"
        );

        if common.is_empty() {
            return Err(StudyError::EmptyUniverse {
                price_tickers: price_universe.len(),
                fundamental_tickers: fundamental_universe.len(),
            });
        }

        let duplicates: Vec<Ticker> = common
            .iter()
            .filter(|t| grouped.get(*t).is_some_and(|rows| rows.len() > 1))
            .cloned()
            .collect();

        if !duplicates.is_empty() {
            match self.duplicate_policy {
                DuplicatePolicy::Fail => {
                    return Err(StudyError::DuplicateFundamentals(duplicates));
                }
                DuplicatePolicy::Drop => {
                    warn!(
                        count = duplicates.len(),
                        tickers = ?duplicates,
                        "excluding tickers with duplicate fundamentals rows"
                    );
                }
            }
        }

        let fundamentals: BTreeMap<Ticker, FundamentalRecord> = grouped
            .into_iter()
            .filter(|(ticker, rows)| common.contains(ticker) && rows.len() == 1)
            .filter_map(|(ticker, mut rows)| rows.pop().map(|record| (ticker, record)))
            .collect();

        let prices_in_window = windowed.len();
        let kept: Vec<PricePoint> = windowed
            .into_iter()
            .filter(|p| common.contains(&p.ticker))
            .collect();

        let diagnostics = ReconcileDiagnostics {
            years: self.years.iter().copied().collect(),
            price_rows: prices.raw_rows(),
            price_rows_dropped: prices.dropped_rows(),
            price_rows_in_window: prices_in_window,
            first_date,
            last_date,
            price_tickers: price_universe.len(),
            fundamental_tickers: fundamental_universe.len(),
            common_tickers: common.len(),
            price_sample: price_universe.iter().take(SAMPLE_SIZE).cloned().collect(),
            fundamental_sample: fundamental_universe
                .iter()
                .take(SAMPLE_SIZE)
                .cloned()
                .collect(),
            common_sample: common.iter().take(SAMPLE_SIZE).cloned().collect(),
            duplicate_fundamentals: duplicates,
        };

        Ok(ReconciledData {
            prices: kept,
            fundamentals,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(ticker: &str, y: i32, m: u32, d: u32, close: f64) -> PricePoint {
        PricePoint::from_close(ticker, NaiveDate::from_ymd_opt(y, m, d).unwrap(), close)
    }

    fn prices() -> PriceTable {
        PriceTable::new(vec![
            point("SBIN.NS", 2022, 12, 30, 90.0),
            point("SBIN.NS", 2023, 1, 2, 100.0),
            point("SBIN.NS", 2024, 12, 31, 130.0),
            point("tcs-eq", 2023, 1, 2, 3000.0),
            point("INFY.BO", 2023, 6, 1, 1500.0),
            point("ONLYPRICE", 2023, 6, 1, 10.0),
        ])
    }

    fn fundamentals() -> FundamentalsTable {
        FundamentalsTable::new(vec![
            FundamentalRecord::with_pe("SBIN", Some(9.0)),
            FundamentalRecord::with_pe("TCS.NS", Some(30.0)),
            FundamentalRecord::with_pe("infy", Some(25.0)),
            FundamentalRecord::with_pe("ONLYFUND", Some(12.0)),
        ])
    }

    #[test]
    fn test_reconcile_intersection_and_window() {
        let data = Reconciler::new([2023, 2024])
            .reconcile(&prices(), &fundamentals())
            .unwrap();

        let universe: Vec<Ticker> = data.universe().into_iter().collect();
        assert_eq!(universe, vec!["INFY", "SBIN", "TCS"]);
        assert_eq!(data.prices.len(), 4);
        assert!(data.prices.iter().all(|p| p.date.year() >= 2023));
        assert_eq!(data.fundamentals.len(), 3);
        assert_eq!(data.fundamentals["TCS"].trailing_pe, Some(30.0));

        let diag = &data.diagnostics;
        assert_eq!(diag.price_rows, 6);
        assert_eq!(diag.price_rows_in_window, 5);
        assert_eq!(diag.price_tickers, 4);
        assert_eq!(diag.fundamental_tickers, 4);
        assert_eq!(diag.common_tickers, 3);
        assert_eq!(diag.first_date, NaiveDate::from_ymd_opt(2023, 1, 2));
        assert_eq!(diag.last_date, NaiveDate::from_ymd_opt(2024, 12, 31));
    }

    #[test]
    fn test_disjoint_universes_abort() {
        let fundamentals = FundamentalsTable::new(vec![
            FundamentalRecord::with_pe("AAA", Some(9.0)),
            FundamentalRecord::with_pe("BBB", Some(10.0)),
        ]);
        let err = Reconciler::new([2023, 2024])
            .reconcile(&prices(), &fundamentals)
            .unwrap_err();
        assert!(matches!(
            err,
            StudyError::EmptyUniverse {
                price_tickers: 4,
                fundamental_tickers: 2
            }
        ));
    }

    #[test]
    fn test_empty_window_is_not_fatal_by_itself() {
        let err = Reconciler::new([1999])
            .reconcile(&prices(), &fundamentals())
            .unwrap_err();
        // The empty window only warns; the empty universe that follows aborts.
        assert!(matches!(err, StudyError::EmptyUniverse { price_tickers: 0, .. }));
    }

    #[test]
    fn test_duplicates_dropped() {
        let fundamentals = FundamentalsTable::new(vec![
            FundamentalRecord::with_pe("SBIN", Some(9.0)),
            FundamentalRecord::with_pe("SBIN-EQ", Some(9.5)),
            FundamentalRecord::with_pe("TCS", Some(30.0)),
        ]);
        let data = Reconciler::new([2023, 2024])
            .reconcile(&prices(), &fundamentals)
            .unwrap();

        assert_eq!(data.diagnostics.duplicate_fundamentals, vec!["SBIN"]);
        assert!(!data.fundamentals.contains_key("SBIN"));
        assert!(data.fundamentals.contains_key("TCS"));
        // Prices of the duplicated ticker are kept; only its value leg is gone.
        assert!(data.prices.iter().any(|p| p.ticker == "SBIN"));
    }

    #[test]
    fn test_duplicates_fail_policy() {
        let fundamentals = FundamentalsTable::new(vec![
            FundamentalRecord::with_pe("SBIN", Some(9.0)),
            FundamentalRecord::with_pe("sbin.ns", Some(9.0)),
        ]);
        let err = Reconciler::new([2023, 2024])
            .with_duplicate_policy(DuplicatePolicy::Fail)
            .reconcile(&prices(), &fundamentals)
            .unwrap_err();
        assert!(matches!(err, StudyError::DuplicateFundamentals(ref t) if t == &["SBIN"]));
    }

    #[test]
    fn test_empty_tickers_never_join() {
        let prices = PriceTable::new(vec![point("", 2023, 1, 2, 1.0), point("A", 2023, 1, 2, 1.0)]);
        let fundamentals = FundamentalsTable::new(vec![
            FundamentalRecord::with_pe("", Some(9.0)),
            FundamentalRecord::with_pe("A", Some(9.0)),
        ]);
        let data = Reconciler::new([2023])
            .reconcile(&prices, &fundamentals)
            .unwrap();
        assert_eq!(data.diagnostics.common_tickers, 1);
        assert!(data.prices.iter().all(|p| p.ticker == "A"));
    }
}
