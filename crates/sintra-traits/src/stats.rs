//! Descriptive statistics shared by the factor and evaluation crates.
//!
//! All helpers return `None` instead of a sentinel when a statistic is
//! undefined for the given sample (empty input, fewer than two observations,
//! zero variance).

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Minimum threshold for standard deviation to avoid division by zero.
/// Values below this threshold are treated as zero variance.
pub const MIN_STD_THRESHOLD: f64 = 1e-12;

/// Arithmetic mean, `None` for an empty sample.
pub fn mean(values: &[f64]) -> Option<f64> {
    ArrayView1::from(values).mean()
}

/// Sample variance with the N-1 denominator, `None` below two observations.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    Some(ArrayView1::from(values).var(1.0))
}

/// Sample standard deviation with the N-1 denominator.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// Empirical quantile with linear interpolation between order statistics.
///
/// `sorted` must be ascending. For `q` in `[0, 1]` the result lies between
/// `sorted[floor(h)]` and `sorted[ceil(h)]` with `h = (n - 1) * q`.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let frac = h - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Pearson correlation coefficient of two equally long samples.
///
/// Returns `None` when the lengths differ, fewer than two pairs remain, or
/// either side has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let mean_x = mean(x)?;
    let mean_y = mean(y)?;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&a, &b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom < MIN_STD_THRESHOLD {
        return None;
    }
    Some(cov / denom)
}

/// Column summary in the shape of a dataframe `describe()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    /// Number of observations
    pub count: usize,
    /// Mean
    pub mean: Option<f64>,
    /// Sample standard deviation
    pub std: Option<f64>,
    /// Minimum
    pub min: Option<f64>,
    /// First quartile
    pub q25: Option<f64>,
    /// Median
    pub median: Option<f64>,
    /// Third quartile
    pub q75: Option<f64>,
    /// Maximum
    pub max: Option<f64>,
}

impl ColumnSummary {
    /// Summarize a sample. Non-finite values must be filtered by the caller.
    pub fn from_values(values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Self {
            count: values.len(),
            mean: mean(values),
            std: sample_std(values),
            min: sorted.first().copied(),
            q25: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q75: quantile_sorted(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }
}
