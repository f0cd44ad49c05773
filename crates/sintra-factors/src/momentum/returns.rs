//! Calendar-year period returns.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use sintra_traits::{Date, PricePoint, Ticker};
use tracing::debug;

/// Why a ticker has no return for a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exclusion {
    /// No observation inside the year.
    NoData,
    /// Fewer observations than the configured minimum.
    TooFewPoints(usize),
    /// The first or last observation of the year has no close.
    MissingClose,
    /// The first close of the year is zero.
    ZeroStartPrice,
}

/// Close prices per ticker, sorted ascending by date.
///
/// Dated rows without a usable close are kept as `None`.
#[derive(Debug, Clone, Default)]
pub struct PriceHistory {
    series: BTreeMap<Ticker, Vec<(Date, Option<f64>)>>,
}

impl PriceHistory {
    /// Index price points by ticker.
    ///
    /// Each series is sorted by date; points sharing a date keep their input
    /// order.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a PricePoint>) -> Self {
        let mut series: BTreeMap<Ticker, Vec<(Date, Option<f64>)>> = BTreeMap::new();
        for point in points {
            series
                .entry(point.ticker.clone())
                .or_default()
                .push((point.date, point.close));
        }
        for observations in series.values_mut() {
            observations.sort_by_key(|(date, _)| *date);
        }
        Self { series }
    }

    /// Tickers with at least one observation.
    pub fn tickers(&self) -> impl Iterator<Item = &Ticker> {
        self.series.keys()
    }

    /// Number of tickers.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether the history holds no ticker.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Observations of `ticker` inside calendar `year`, ascending by date.
    pub fn observations(&self, ticker: &str, year: i32) -> Vec<(Date, Option<f64>)> {
        self.series
            .get(ticker)
            .map(|series| {
                series
                    .iter()
                    .filter(|(date, _)| date.year() == year)
                    .copied()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Return of `ticker` over calendar `year`: `(last - first) / first`.
    ///
    /// A single observation yields `Some(0.0)`. No observation, a missing
    /// close on the first or last day, or a zero first close yields `None`.
    pub fn period_return(&self, ticker: &str, year: i32) -> Option<f64> {
        self.period_return_with(ticker, year, 1).ok()
    }

    /// Like [`Self::period_return`], requiring at least `min_points`
    /// observations and reporting why a return is missing.
    pub fn period_return_with(
        &self,
        ticker: &str,
        year: i32,
        min_points: usize,
    ) -> Result<f64, Exclusion> {
        let observations = self.observations(ticker, year);
        let (Some(&(_, first)), Some(&(_, last))) = (observations.first(), observations.last())
        else {
            return Err(Exclusion::NoData);
        };
        if observations.len() < min_points {
            return Err(Exclusion::TooFewPoints(observations.len()));
        }
        let (Some(first), Some(last)) = (first, last) else {
            return Err(Exclusion::MissingClose);
        };
        if first == 0.0 {
            return Err(Exclusion::ZeroStartPrice);
        }
        Ok((last - first) / first)
    }
}

/// Returns of every ticker over one year, with exclusion counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodReturns {
    /// Calendar year
    pub year: i32,
    /// Minimum observations required
    pub min_points: usize,
    /// Return per ticker
    pub returns: BTreeMap<Ticker, f64>,
    /// Tickers without observations in the year
    pub no_data: usize,
    /// Tickers below the observation minimum
    pub too_few_points: usize,
    /// Tickers missing the first or last close of the year
    pub missing_close: usize,
    /// Tickers whose first close is zero
    pub zero_start: usize,
}

impl PeriodReturns {
    /// Compute the return of every ticker in `history` over `year`.
    pub fn compute(history: &PriceHistory, year: i32, min_points: usize) -> Self {
        let mut result = Self {
            year,
            min_points,
            returns: BTreeMap::new(),
            no_data: 0,
            too_few_points: 0,
            missing_close: 0,
            zero_start: 0,
        };

        for ticker in history.tickers() {
            match history.period_return_with(ticker, year, min_points) {
                Ok(value) => {
                    result.returns.insert(ticker.clone(), value);
                }
                Err(Exclusion::NoData) => result.no_data += 1,
                Err(Exclusion::TooFewPoints(n)) => {
                    debug!(ticker = %ticker, year, points = n, "Too few price points");
                    result.too_few_points += 1;
                }
                Err(Exclusion::MissingClose) => {
                    debug!(ticker = %ticker, year, "Missing close at period boundary");
                    result.missing_close += 1;
                }
                Err(Exclusion::ZeroStartPrice) => {
                    debug!(ticker = %ticker, year, "Zero start price");
                    result.zero_start += 1;
                }
            }
        }

        result
    }

    /// Return of one ticker, if computed.
    pub fn get(&self, ticker: &str) -> Option<f64> {
        self.returns.get(ticker).copied()
    }

    /// Number of tickers with a return.
    pub fn len(&self) -> usize {
        self.returns.len()
    }

    /// Whether no ticker has a return.
    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    /// Number of excluded tickers, all causes.
    pub const fn excluded(&self) -> usize {
        self.no_data + self.too_few_points + self.missing_close + self.zero_start
    }
}
