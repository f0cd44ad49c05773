//! Percentile bootstrap of the extreme-bucket spread.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sintra_traits::stats::quantile_sorted;

/// Confidence level of the reported interval.
pub const CONFIDENCE: f64 = 0.95;

/// Bootstrap confidence interval of a mean difference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapInterval {
    /// Lower percentile bound
    pub lower: f64,
    /// Upper percentile bound
    pub upper: f64,
    /// Confidence level
    pub confidence: f64,
    /// Number of resamples drawn
    pub resamples: usize,
    /// Seed of the generator
    pub seed: u64,
}

impl BootstrapInterval {
    /// Whether the interval excludes zero.
    pub fn excludes_zero(&self) -> bool {
        self.lower > 0.0 || self.upper < 0.0
    }
}

/// Percentile interval of `mean(favoured) - mean(other)`.
///
/// Each resample draws both groups with replacement at their original
/// sizes. Returns `None` when a group is empty or `resamples` is zero. The
/// same seed always yields the same interval.
pub fn bootstrap_spread(
    favoured: &[f64],
    other: &[f64],
    resamples: usize,
    seed: u64,
) -> Option<BootstrapInterval> {
    if favoured.is_empty() || other.is_empty() || resamples == 0 {
        return None;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut spreads: Vec<f64> = (0..resamples)
        .map(|_| resample_mean(favoured, &mut rng) - resample_mean(other, &mut rng))
        .collect();
    spreads.sort_by(f64::total_cmp);

    let tail = (1.0 - CONFIDENCE) / 2.0;
    Some(BootstrapInterval {
        lower: quantile_sorted(&spreads, tail)?,
        upper: quantile_sorted(&spreads, 1.0 - tail)?,
        confidence: CONFIDENCE,
        resamples,
        seed,
    })
}

/// Mean of one resample drawn with replacement.
fn resample_mean(sample: &[f64], rng: &mut impl Rng) -> f64 {
    let total: f64 = (0..sample.len())
        .map(|_| sample[rng.gen_range(0..sample.len())])
        .sum();
    total / sample.len() as f64
}
