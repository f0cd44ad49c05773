//! Factor hypothesis tests.
//!
//! For each factor the favoured extreme bucket is tested against the
//! disfavoured one, the spread is bootstrapped and the rank IC over the full
//! cross-section is reported. The two factors are then compared on the size
//! of their spreads.

use serde::{Deserialize, Serialize};
use sintra_traits::{Direction, Factor, FactorRow, Result, StudyError};
use tracing::info;

use crate::bootstrap::{BootstrapInterval, bootstrap_spread};
use crate::ic::factor_ic;
use crate::portfolio::PortfolioSet;
use crate::ttest::{SIGNIFICANCE_LEVEL, WelchTest, welch_t_test};

/// Settings of the inference engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Bootstrap resamples; zero disables the bootstrap
    pub bootstrap_resamples: usize,
    /// Bootstrap seed
    pub seed: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            bootstrap_resamples: 1000,
            seed: 42,
        }
    }
}

/// Everything known about one factor's premium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorTest {
    /// Factor name
    pub factor: String,
    /// Factor direction
    pub direction: Direction,
    /// Null hypothesis in words
    pub null_hypothesis: String,
    /// Alternative hypothesis in words
    pub alternative_hypothesis: String,
    /// Label of the bucket expected to outperform
    pub favoured_label: String,
    /// Label of the bucket expected to underperform
    pub disfavoured_label: String,
    /// Mean outcome of the favoured bucket
    pub favoured_mean: f64,
    /// Mean outcome of the disfavoured bucket
    pub disfavoured_mean: f64,
    /// Favoured minus disfavoured mean outcome
    pub spread: f64,
    /// Welch test of favoured against disfavoured
    pub welch: WelchTest,
    /// Significance level of the decision
    pub significance_level: f64,
    /// Whether the null is rejected
    pub rejected: bool,
    /// Spearman rank IC of factor value and outcome
    pub rank_ic: Option<f64>,
    /// Bootstrap interval of the spread
    pub bootstrap: Option<BootstrapInterval>,
}

impl FactorTest {
    /// One-line verdict.
    pub fn conclusion(&self) -> String {
        match self.welch.p_one_sided() {
            Some(p) if self.rejected => format!(
                "Reject null (p = {p:.4} < {}): {}",
                self.significance_level, self.alternative_hypothesis
            ),
            Some(p) => format!(
                "Fail to reject null (p = {p:.4} >= {})",
                self.significance_level
            ),
            None => "Test not computed".to_string(),
        }
    }
}

/// Which factor showed the larger spread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadComparison {
    /// Factor with the larger absolute spread
    pub stronger: String,
    /// Its spread
    pub stronger_spread: f64,
    /// The other factor
    pub weaker: String,
    /// Its spread
    pub weaker_spread: f64,
}

/// Runs the factor tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct InferenceEngine {
    config: InferenceConfig,
}

impl InferenceEngine {
    /// Engine with the given settings.
    #[must_use]
    pub const fn new(config: InferenceConfig) -> Self {
        Self { config }
    }

    /// Test `factor` on its portfolios.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::InvalidData`] when the portfolio set is empty and
    /// propagates t-distribution errors.
    pub fn test_factor(
        &self,
        rows: &[FactorRow],
        factor: &dyn Factor,
        portfolios: &PortfolioSet,
    ) -> Result<FactorTest> {
        let (Some(favoured), Some(disfavoured)) = (portfolios.favoured(), portfolios.disfavoured())
        else {
            return Err(StudyError::InvalidData(format!(
                "no portfolios for {}",
                factor.name()
            )));
        };

        let welch = welch_t_test(&favoured.returns, &disfavoured.returns)?;
        let rejected = welch.rejects_null();
        let (null_hypothesis, alternative_hypothesis) = factor.hypotheses();
        let bootstrap = bootstrap_spread(
            &favoured.returns,
            &disfavoured.returns,
            self.config.bootstrap_resamples,
            self.config.seed,
        );

        let test = FactorTest {
            factor: factor.name().to_string(),
            direction: factor.direction(),
            null_hypothesis,
            alternative_hypothesis,
            favoured_label: favoured.label.clone(),
            disfavoured_label: disfavoured.label.clone(),
            favoured_mean: favoured.mean,
            disfavoured_mean: disfavoured.mean,
            spread: favoured.mean - disfavoured.mean,
            welch,
            significance_level: SIGNIFICANCE_LEVEL,
            rejected,
            rank_ic: factor_ic(rows, factor),
            bootstrap,
        };

        info!(
            factor = %test.factor,
            spread = test.spread,
            p = ?test.welch.p_one_sided(),
            rejected = test.rejected,
            "Factor tested"
        );

        Ok(test)
    }
}

/// Compare two factors by the absolute size of their spreads.
///
/// This is descriptive only; it makes no significance claim. `first` must
/// be strictly larger to win, so ties go to `second`.
pub fn compare_spreads(first: &FactorTest, second: &FactorTest) -> SpreadComparison {
    let (stronger, weaker) = if first.spread.abs() > second.spread.abs() {
        (first, second)
    } else {
        (second, first)
    };
    SpreadComparison {
        stronger: stronger.factor.clone(),
        stronger_spread: stronger.spread,
        weaker: weaker.factor.clone(),
        weaker_spread: weaker.spread,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::build_portfolios;
    use crate::ttest::TestOutcome;
    use approx::assert_relative_eq;
    use sintra_traits::BucketNames;

    struct Pe;

    impl Factor for Pe {
        fn name(&self) -> &str {
            "value_pe"
        }
        fn direction(&self) -> Direction {
            Direction::LowerIsBetter
        }
        fn bucket_names(&self) -> BucketNames {
            BucketNames { low: "Value", high: "Growth" }
        }
        fn value(&self, row: &FactorRow) -> f64 {
            row.pe
        }
        fn hypotheses(&self) -> (String, String) {
            ("H0".to_string(), "H1".to_string())
        }
    }

    fn rows(data: &[(f64, f64)]) -> Vec<FactorRow> {
        data.iter()
            .enumerate()
            .map(|(i, (pe, outcome))| FactorRow {
                ticker: format!("T{i}"),
                momentum: 0.0,
                pe: *pe,
                outcome: *outcome,
            })
            .collect()
    }

    #[test]
    fn test_value_factor_direction() {
        let rows = rows(&[
            (5.0, 0.30),
            (6.0, 0.35),
            (7.0, 0.32),
            (40.0, 0.01),
            (45.0, -0.02),
            (50.0, 0.00),
        ]);
        let set = build_portfolios(&rows, &Pe, 2).unwrap();
        let test = InferenceEngine::default().test_factor(&rows, &Pe, &set).unwrap();

        assert_eq!(test.favoured_label, "Q1_Value");
        assert_eq!(test.disfavoured_label, "Q2_Growth");
        assert_relative_eq!(test.spread, set.spread().unwrap(), epsilon = 1e-12);
        assert!(test.spread > 0.0);
        assert!(test.rejected);
        assert!(test.conclusion().starts_with("Reject null"));
        assert!(test.rank_ic.unwrap() < 0.0);
        assert!(test.bootstrap.unwrap().excludes_zero());
    }

    #[test]
    fn test_singleton_buckets_skip_test() {
        let rows = rows(&[(5.0, 0.1), (10.0, 0.2), (15.0, 0.3), (20.0, 0.4), (25.0, 0.5)]);
        let set = build_portfolios(&rows, &Pe, 5).unwrap();
        let test = InferenceEngine::new(InferenceConfig {
            bootstrap_resamples: 0,
            seed: 1,
        })
        .test_factor(&rows, &Pe, &set)
        .unwrap();

        assert!(matches!(test.welch.outcome, TestOutcome::Skipped { .. }));
        assert!(!test.rejected);
        assert_relative_eq!(test.spread, 0.1 - 0.5, epsilon = 1e-12);
        assert!(test.bootstrap.is_none());
        assert_eq!(test.conclusion(), "Test not computed");
    }

    #[test]
    fn test_compare_spreads() {
        let rows = rows(&[(5.0, 0.1), (10.0, 0.2), (15.0, 0.3), (20.0, 0.4)]);
        let set = build_portfolios(&rows, &Pe, 2).unwrap();
        let engine = InferenceEngine::default();
        let mut first = engine.test_factor(&rows, &Pe, &set).unwrap();
        let mut second = first.clone();
        first.factor = "momentum_2023".to_string();
        first.spread = 0.05;
        second.spread = -0.12;

        let comparison = compare_spreads(&first, &second);
        assert_eq!(comparison.stronger, "value_pe");
        assert_relative_eq!(comparison.stronger_spread, -0.12);
        assert_eq!(comparison.weaker, "momentum_2023");
    }

    #[test]
    fn test_compare_spreads_tie_goes_to_second() {
        let rows = rows(&[(5.0, 0.1), (10.0, 0.2), (15.0, 0.3), (20.0, 0.4)]);
        let set = build_portfolios(&rows, &Pe, 2).unwrap();
        let mut first = InferenceEngine::default().test_factor(&rows, &Pe, &set).unwrap();
        let mut second = first.clone();
        first.factor = "momentum_2023".to_string();
        first.spread = 0.2;
        second.spread = -0.2;

        let comparison = compare_spreads(&first, &second);
        assert_eq!(comparison.stronger, "value_pe");
        assert_eq!(comparison.weaker, "momentum_2023");
    }
}
