//! Information Coefficient (IC) calculations.
//!
//! IC measures the Spearman rank correlation between factor values and
//! subsequent returns. It complements the extreme-bucket comparison by using
//! every stock in the cross-section.

use ndarray::Array1;
use sintra_traits::{Factor, FactorRow};

/// Calculate the rank IC between factor values and outcome returns.
///
/// Pairs with a non-finite member are ignored. Ties share their average
/// rank. Returns `None` when the lengths differ, fewer than two pairs remain
/// or either side is constant.
///
/// # Example
///
/// ```rust
/// use ndarray::array;
/// use sintra_eval::calculate_ic;
///
/// let values = array![1.5, 0.3, -0.8, 2.1];
/// let returns = array![0.02, 0.01, -0.01, 0.03];
/// assert!((calculate_ic(&values, &returns).unwrap() - 1.0).abs() < 1e-10);
/// ```
pub fn calculate_ic(factor_values: &Array1<f64>, outcomes: &Array1<f64>) -> Option<f64> {
    if factor_values.len() != outcomes.len() {
        return None;
    }

    let pairs: Vec<(f64, f64)> = factor_values
        .iter()
        .zip(outcomes.iter())
        .filter(|(v, r)| v.is_finite() && r.is_finite())
        .map(|(&v, &r)| (v, r))
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let value_ranks = compute_ranks(&pairs.iter().map(|(v, _)| *v).collect::<Vec<_>>());
    let outcome_ranks = compute_ranks(&pairs.iter().map(|(_, r)| *r).collect::<Vec<_>>());

    spearman_correlation(&value_ranks, &outcome_ranks)
}

/// Rank IC of `factor` over the rows of a factor table.
pub fn factor_ic(rows: &[FactorRow], factor: &dyn Factor) -> Option<f64> {
    let values: Array1<f64> = rows.iter().map(|row| factor.value(row)).collect();
    let outcomes: Array1<f64> = rows.iter().map(|row| row.outcome).collect();
    calculate_ic(&values, &outcomes)
}

/// Compute ranks of values (handling ties with average rank).
fn compute_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut indexed: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();

    indexed.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut ranks = vec![0.0; n];
    let mut i = 0;

    while i < n {
        let mut j = i;
        // Find ties
        while j < n && indexed[j].1 == indexed[i].1 {
            j += 1;
        }

        let avg_rank = (i + j - 1) as f64 / 2.0;
        for (index, _) in &indexed[i..j] {
            ranks[*index] = avg_rank;
        }

        i = j;
    }

    ranks
}

/// Pearson correlation of two rank vectors.
fn spearman_correlation(ranks_x: &[f64], ranks_y: &[f64]) -> Option<f64> {
    let n = ranks_x.len() as f64;

    let mean_x: f64 = ranks_x.iter().sum::<f64>() / n;
    let mean_y: f64 = ranks_y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;

    for (x, y) in ranks_x.iter().zip(ranks_y) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}
