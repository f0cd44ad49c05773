//! Welch two-sample t-test.

use serde::{Deserialize, Serialize};
use sintra_traits::stats::{MIN_STD_THRESHOLD, mean, sample_variance};
use sintra_traits::{Result, StudyError};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Significance level of every hypothesis test in the study.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Result of the test statistic computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TestOutcome {
    /// The statistic is defined.
    Computed {
        /// t statistic
        statistic: f64,
        /// Welch–Satterthwaite degrees of freedom
        df: f64,
        /// p-value of "first sample mean > second sample mean"
        p_one_sided: f64,
        /// p-value of "means differ"
        p_two_sided: f64,
    },
    /// The statistic is undefined for these samples.
    Skipped {
        /// Why the test was not run
        reason: String,
    },
}

/// Welch test of `favoured` against `other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WelchTest {
    /// Mean of `favoured` minus mean of `other`; absent if a side is empty
    pub mean_difference: Option<f64>,
    /// Observations in `favoured`
    pub favoured_count: usize,
    /// Observations in `other`
    pub other_count: usize,
    /// Statistic and p-values, or the skip reason
    pub outcome: TestOutcome,
}

impl WelchTest {
    /// One-sided p-value, if computed.
    pub const fn p_one_sided(&self) -> Option<f64> {
        match self.outcome {
            TestOutcome::Computed { p_one_sided, .. } => Some(p_one_sided),
            TestOutcome::Skipped { .. } => None,
        }
    }

    /// Whether the null is rejected at [`SIGNIFICANCE_LEVEL`].
    pub fn rejects_null(&self) -> bool {
        self.p_one_sided().is_some_and(|p| p < SIGNIFICANCE_LEVEL)
    }
}

/// Welch t-test with the one-sided alternative `mean(favoured) > mean(other)`.
///
/// Needs at least two observations per side and a non-zero standard error;
/// otherwise the outcome is [`TestOutcome::Skipped`] while the mean
/// difference is still reported.
///
/// # Errors
///
/// Returns [`StudyError::Statistics`] if the t distribution cannot be
/// constructed.
pub fn welch_t_test(favoured: &[f64], other: &[f64]) -> Result<WelchTest> {
    let mean_difference = match (mean(favoured), mean(other)) {
        (Some(a), Some(b)) => Some(a - b),
        _ => None,
    };
    let skipped = |reason: &str| WelchTest {
        mean_difference,
        favoured_count: favoured.len(),
        other_count: other.len(),
        outcome: TestOutcome::Skipped {
            reason: reason.to_string(),
        },
    };

    let (Some(var_a), Some(var_b), Some(diff)) =
        (sample_variance(favoured), sample_variance(other), mean_difference)
    else {
        return Ok(skipped("each side needs at least two observations"));
    };

    let n_a = favoured.len() as f64;
    let n_b = other.len() as f64;
    let se_a = var_a / n_a;
    let se_b = var_b / n_b;
    let se = (se_a + se_b).sqrt();
    if se < MIN_STD_THRESHOLD {
        return Ok(skipped("both samples have zero variance"));
    }

    let statistic = diff / se;
    let df = (se_a + se_b).powi(2)
        / (se_a.powi(2) / (n_a - 1.0) + se_b.powi(2) / (n_b - 1.0));

    let dist =
        StudentsT::new(0.0, 1.0, df).map_err(|e| StudyError::Statistics(e.to_string()))?;
    let p_one_sided = dist.sf(statistic);
    let p_two_sided = (2.0 * dist.sf(statistic.abs())).min(1.0);

    Ok(WelchTest {
        mean_difference,
        favoured_count: favoured.len(),
        other_count: other.len(),
        outcome: TestOutcome::Computed {
            statistic,
            df,
            p_one_sided,
            p_two_sided,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_welch_statistic() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 4.0, 6.0];
        let test = welch_t_test(&a, &b).unwrap();

        // var(a) = 2.5, var(b) = 4.0
        let se_a = 2.5 / 5.0;
        let se_b = 4.0 / 3.0;
        let t = (3.0 - 4.0) / f64::sqrt(se_a + se_b);
        let df = (se_a + se_b).powi(2) / (se_a * se_a / 4.0 + se_b * se_b / 2.0);

        match test.outcome {
            TestOutcome::Computed {
                statistic,
                df: got_df,
                p_one_sided,
                p_two_sided,
            } => {
                assert_relative_eq!(statistic, t, epsilon = 1e-12);
                assert_relative_eq!(got_df, df, epsilon = 1e-12);
                assert!(p_one_sided > 0.5);
                assert_relative_eq!(p_two_sided, 2.0 * (1.0 - p_one_sided), epsilon = 1e-10);
            }
            TestOutcome::Skipped { reason } => panic!("skipped: {reason}"),
        }
        assert_relative_eq!(test.mean_difference.unwrap(), -1.0);
        assert!(!test.rejects_null());
    }

    #[test]
    fn test_clear_difference_rejects() {
        let a = [10.0, 11.0, 12.0, 10.5, 11.5];
        let b = [1.0, 2.0, 1.5, 2.5, 1.0];
        let test = welch_t_test(&a, &b).unwrap();
        assert!(test.rejects_null());
        assert!(test.p_one_sided().unwrap() < 1e-4);
    }

    #[test]
    fn test_singleton_sides_skip() {
        let test = welch_t_test(&[0.25], &[0.05]).unwrap();
        assert!(matches!(test.outcome, TestOutcome::Skipped { .. }));
        assert_relative_eq!(test.mean_difference.unwrap(), 0.20, epsilon = 1e-12);
        assert!(!test.rejects_null());
    }

    #[test]
    fn test_zero_variance_skip() {
        let test = welch_t_test(&[1.0, 1.0, 1.0], &[2.0, 2.0]).unwrap();
        match test.outcome {
            TestOutcome::Skipped { reason } => assert!(reason.contains("zero variance")),
            TestOutcome::Computed { .. } => panic!("expected skip"),
        }
        assert_relative_eq!(test.mean_difference.unwrap(), -1.0);
    }

    #[test]
    fn test_empty_side() {
        let test = welch_t_test(&[], &[1.0, 2.0]).unwrap();
        assert!(test.mean_difference.is_none());
        assert!(test.p_one_sided().is_none());
    }
}
