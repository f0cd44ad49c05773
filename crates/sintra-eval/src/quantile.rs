//! Equal-population quantile buckets.
//!
//! Bucket edges are the empirical quantiles at `i / k`. Repeated edges are
//! merged, so heavily tied data yields fewer than `k` buckets. Each bucket is
//! the half-open interval `(lower, upper]`; the first bucket also holds its
//! lower edge, which is the sample minimum.

use serde::{Deserialize, Serialize};
use sintra_traits::stats::quantile_sorted;
use sintra_traits::{Result, StudyError, Ticker};

/// One realized bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// 1-based ordinal after empty buckets are collapsed
    pub ordinal: usize,
    /// Lower edge (exclusive, except for the first bucket)
    pub lower: f64,
    /// Upper edge (inclusive)
    pub upper: f64,
    /// Members with their factor values, in input order
    pub members: Vec<(Ticker, f64)>,
}

impl Bucket {
    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the bucket has no member.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Result of [`quantile_buckets`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketAssignment {
    /// Number of buckets asked for
    pub requested: usize,
    /// Distinct edges, ascending
    pub edges: Vec<f64>,
    /// Non-empty buckets, ascending by value
    pub buckets: Vec<Bucket>,
}

impl BucketAssignment {
    /// Number of realized buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Whether no bucket was realized.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Ordinal of the bucket holding `ticker`.
    pub fn bucket_of(&self, ticker: &str) -> Option<usize> {
        self.buckets
            .iter()
            .find(|b| b.members.iter().any(|(t, _)| t == ticker))
            .map(|b| b.ordinal)
    }

    /// Total number of assigned observations.
    pub fn assigned(&self) -> usize {
        self.buckets.iter().map(Bucket::len).sum()
    }
}

/// Split `values` into at most `k` equal-population buckets.
///
/// # Errors
///
/// Returns [`StudyError::InvalidData`] when `k` is zero or a value is not
/// finite.
pub fn quantile_buckets(values: &[(Ticker, f64)], k: usize) -> Result<BucketAssignment> {
    if k == 0 {
        return Err(StudyError::InvalidData(
            "bucket count must be at least 1".to_string(),
        ));
    }
    if let Some((ticker, value)) = values.iter().find(|(_, v)| !v.is_finite()) {
        return Err(StudyError::InvalidData(format!(
            "non-finite factor value {value} for {ticker}"
        )));
    }
    if values.is_empty() {
        return Ok(BucketAssignment {
            requested: k,
            edges: Vec::new(),
            buckets: Vec::new(),
        });
    }

    let mut sorted: Vec<f64> = values.iter().map(|(_, v)| *v).collect();
    sorted.sort_by(f64::total_cmp);

    let mut edges: Vec<f64> = (0..=k)
        .filter_map(|i| quantile_sorted(&sorted, i as f64 / k as f64))
        .collect();
    edges.dedup();

    // A constant sample has a single edge; it forms one closed bucket.
    let intervals: Vec<(f64, f64)> = if edges.len() == 1 {
        vec![(edges[0], edges[0])]
    } else {
        edges.windows(2).map(|w| (w[0], w[1])).collect()
    };

    let mut members: Vec<Vec<(Ticker, f64)>> = vec![Vec::new(); intervals.len()];
    for (ticker, value) in values {
        let index = intervals
            .partition_point(|(_, upper)| upper < value)
            .min(intervals.len() - 1);
        members[index].push((ticker.clone(), *value));
    }

    let buckets = intervals
        .into_iter()
        .zip(members)
        .filter(|(_, members)| !members.is_empty())
        .enumerate()
        .map(|(i, ((lower, upper), members))| Bucket {
            ordinal: i + 1,
            lower,
            upper,
            members,
        })
        .collect();

    Ok(BucketAssignment {
        requested: k,
        edges,
        buckets,
    })
}
