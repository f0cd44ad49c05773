//! Shapiro–Wilk normality test.
//!
//! Royston's (1995) approximation: the weights come from normal order
//! statistic scores with polynomial corrections for the two outermost
//! coefficients, and the p-value from a normalizing transform of `W`.
//! Valid for 3 to 5000 observations.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use sintra_traits::{Result, StudyError};
use statrs::distribution::{ContinuousCDF, Normal};

/// Smallest sample the test accepts.
pub const MIN_SAMPLE: usize = 3;

/// Largest sample the approximation is valid for.
pub const MAX_SAMPLE: usize = 5000;

const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.5440, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

/// Outcome of a normality test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NormalityTest {
    /// Shapiro–Wilk result.
    ShapiroWilk {
        /// W statistic in `(0, 1]`
        statistic: f64,
        /// p-value of the normality null
        p_value: f64,
    },
    /// The test does not apply to this sample.
    Skipped {
        /// Why the test was not run
        reason: String,
    },
}

impl NormalityTest {
    /// p-value, if the test ran.
    pub const fn p_value(&self) -> Option<f64> {
        match self {
            Self::ShapiroWilk { p_value, .. } => Some(*p_value),
            Self::Skipped { .. } => None,
        }
    }
}

/// Evaluate a polynomial with coefficients in ascending order.
fn poly(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Shapiro–Wilk test of `values`.
///
/// Samples outside `[MIN_SAMPLE, MAX_SAMPLE]`, with non-finite values or
/// with zero range are [`NormalityTest::Skipped`].
///
/// # Errors
///
/// Returns [`StudyError::Statistics`] if the standard normal distribution
/// cannot be constructed.
pub fn shapiro_wilk(values: &[f64]) -> Result<NormalityTest> {
    let skipped = |reason: String| -> Result<NormalityTest> { Ok(NormalityTest::Skipped { reason }) };

    let n = values.len();
    if n < MIN_SAMPLE {
        return skipped(format!("needs at least {MIN_SAMPLE} observations, got {n}"));
    }
    if n > MAX_SAMPLE {
        return skipped(format!("valid for at most {MAX_SAMPLE} observations, got {n}"));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return skipped("sample contains non-finite values".to_string());
    }

    let mut x = values.to_vec();
    x.sort_by(f64::total_cmp);
    if x[n - 1] - x[0] <= 0.0 {
        return skipped("all values are identical".to_string());
    }

    let normal = Normal::new(0.0, 1.0).map_err(|e| StudyError::Statistics(e.to_string()))?;
    let weights = coefficients(n, &normal);

    let mean = x.iter().sum::<f64>() / n as f64;
    let ss: f64 = x.iter().map(|v| (v - mean).powi(2)).sum();
    let numerator: f64 = weights.iter().zip(&x).map(|(a, v)| a * v).sum();
    let w = (numerator * numerator / ss).min(1.0);

    Ok(NormalityTest::ShapiroWilk {
        statistic: w,
        p_value: p_value(w, n, &normal),
    })
}

/// Antisymmetric weights `a_1..a_n` for a sorted sample of size `n`.
fn coefficients(n: usize, normal: &Normal) -> Vec<f64> {
    let mut a = vec![0.0; n];
    if n == 3 {
        a[0] = -0.5_f64.sqrt();
        a[2] = 0.5_f64.sqrt();
        return a;
    }

    let nf = n as f64;
    let m: Vec<f64> = (1..=n)
        .map(|i| normal.inverse_cdf((i as f64 - 0.375) / (nf + 0.25)))
        .collect();
    let summ2: f64 = m.iter().map(|v| v * v).sum();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / nf.sqrt();

    let a_n = m[n - 1] / ssumm2 + poly(&C1, rsn);
    let (first_middle, fac) = if n > 5 {
        let a_n1 = m[n - 2] / ssumm2 + poly(&C2, rsn);
        let fac = ((summ2 - 2.0 * m[n - 1].powi(2) - 2.0 * m[n - 2].powi(2))
            / (1.0 - 2.0 * a_n.powi(2) - 2.0 * a_n1.powi(2)))
        .sqrt();
        a[n - 2] = a_n1;
        a[1] = -a_n1;
        (2, fac)
    } else {
        let fac = ((summ2 - 2.0 * m[n - 1].powi(2)) / (1.0 - 2.0 * a_n.powi(2))).sqrt();
        (1, fac)
    };
    a[n - 1] = a_n;
    a[0] = -a_n;

    for (weight, score) in a
        .iter_mut()
        .zip(&m)
        .take(n - first_middle)
        .skip(first_middle)
    {
        *weight = score / fac;
    }
    a
}

/// Royston's p-value for statistic `w` at sample size `n`.
fn p_value(w: f64, n: usize, normal: &Normal) -> f64 {
    if w >= 1.0 {
        return 1.0;
    }
    let nf = n as f64;

    if n == 3 {
        let p = 6.0 / PI * (w.sqrt().asin() - PI / 3.0);
        return p.clamp(0.0, 1.0);
    }

    let mut y = (1.0 - w).ln();
    let (m, s) = if n <= 11 {
        let gamma = poly(&G, nf);
        if y >= gamma {
            return 1e-99;
        }
        y = -(gamma - y).ln();
        (poly(&C3, nf), poly(&C4, nf).exp())
    } else {
        let ln_n = nf.ln();
        (poly(&C5, ln_n), poly(&C6, ln_n).exp())
    };

    normal.sf((y - m) / s)
}
