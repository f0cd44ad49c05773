//! Distribution diagnostics of the outcome returns.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use sintra_traits::stats::{MIN_STD_THRESHOLD, sample_std, sample_variance};

/// Moments of a sample.
///
/// Variance and standard deviation use the N-1 denominator. Skewness and
/// excess kurtosis are the biased moment estimators (population central
/// moments), so a normal sample has kurtosis near zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionStats {
    /// Number of observations
    pub count: usize,
    /// Mean
    pub mean: Option<f64>,
    /// Sample variance
    pub variance: Option<f64>,
    /// Sample standard deviation
    pub std: Option<f64>,
    /// Moment skewness
    pub skewness: Option<f64>,
    /// Moment excess kurtosis
    pub excess_kurtosis: Option<f64>,
}

impl DistributionStats {
    /// Describe `values`. Undefined moments are `None`.
    pub fn from_values(values: &[f64]) -> Self {
        let view = ArrayView1::from(values);
        let mean = view.mean();

        let (skewness, excess_kurtosis) = match mean {
            Some(mu) => {
                let m2 = view.mapv(|x| (x - mu).powi(2)).mean().unwrap_or_default();
                let m3 = view.mapv(|x| (x - mu).powi(3)).mean().unwrap_or_default();
                let m4 = view.mapv(|x| (x - mu).powi(4)).mean().unwrap_or_default();
                if m2.sqrt() < MIN_STD_THRESHOLD {
                    (None, None)
                } else {
                    (Some(m3 / m2.powf(1.5)), Some(m4 / (m2 * m2) - 3.0))
                }
            }
            None => (None, None),
        };

        Self {
            count: values.len(),
            mean,
            variance: sample_variance(values),
            std: sample_std(values),
            skewness,
            excess_kurtosis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_symmetric_sample() {
        let stats = DistributionStats::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(stats.count, 5);
        assert_relative_eq!(stats.mean.unwrap(), 3.0);
        assert_relative_eq!(stats.variance.unwrap(), 2.5);
        assert_relative_eq!(stats.skewness.unwrap(), 0.0, epsilon = 1e-12);
        // m2 = 2, m4 = 6.8
        assert_relative_eq!(stats.excess_kurtosis.unwrap(), 6.8 / 4.0 - 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_right_skew() {
        let stats = DistributionStats::from_values(&[0.0, 0.0, 0.0, 1.0]);
        // m2 = 3/16, m3 = 3/32
        let expected = (3.0 / 32.0) / (3.0_f64 / 16.0).powf(1.5);
        assert_relative_eq!(stats.skewness.unwrap(), expected, epsilon = 1e-12);
        assert!(stats.skewness.unwrap() > 0.0);
    }

    #[test]
    fn test_degenerate_samples() {
        let empty = DistributionStats::from_values(&[]);
        assert_eq!(empty.count, 0);
        assert!(empty.mean.is_none());
        assert!(empty.skewness.is_none());

        let single = DistributionStats::from_values(&[0.1]);
        assert_relative_eq!(single.mean.unwrap(), 0.1);
        assert!(single.variance.is_none());
        assert!(single.skewness.is_none());

        let constant = DistributionStats::from_values(&[2.0, 2.0, 2.0]);
        assert_relative_eq!(constant.variance.unwrap(), 0.0);
        assert!(constant.excess_kurtosis.is_none());
    }
}
