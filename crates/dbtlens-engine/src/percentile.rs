//! Percentile rank normalization
//!
//! Converts raw scores into percentile ranks in [0, 100]. A raw score of
//! zero is pinned to percentile 0 regardless of its sort position, so "no
//! signal" always ranks lowest. Raw scores are assumed non-negative; the
//! zero-pinning rule would need revisiting before negative scores are
//! allowed.

use std::collections::HashMap;

/// Rank `(id, raw score)` pairs into a percentile map.
///
/// The sort is stable, so equal raw scores keep their input order; callers
/// that need a deterministic result pass input in a deterministic order.
/// A singleton or empty input yields percentile 0 for every element.
pub fn percentile_ranks<'a>(mut scores: Vec<(&'a str, f64)>) -> HashMap<&'a str, f64> {
    scores.sort_by(|a, b| a.1.total_cmp(&b.1));

    let n = scores.len();
    let mut ranks = HashMap::with_capacity(n);

    for (i, (id, raw)) in scores.into_iter().enumerate() {
        let percentile = if raw == 0.0 || n <= 1 {
            0.0
        } else {
            i as f64 / (n - 1) as f64 * 100.0
        };
        ranks.insert(id, percentile);
    }

    ranks
}
