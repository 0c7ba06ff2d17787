//! Pathway scoring functions.

use std::collections::BTreeSet;

use compath_core::{Error, Result};
use similar::{DiffOp, TextDiff};

/// Overlap coefficient: `|a ∩ b| / min(|a|, |b|)`.
///
/// Symmetric, in `[0, 1]`, and `1.0` exactly when the smaller set is contained
/// in the larger one. Either set being empty is an `InvalidInput` error.
pub fn overlap<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> Result<f64> {
    let smaller = a.len().min(b.len());
    if smaller == 0 { return Err(Error::InvalidInput("empty gene set".to_string())); }
    let intersection = a.intersection(b).count();
    Ok(intersection as f64 / smaller as f64)
}

/// Character-level similarity ratio `2 * M / (|a| + |b|)`.
///
/// `M` counts characters inside the equal runs of a Myers diff between the
/// two strings, i.e. their longest common subsequence. Two empty strings
/// score `1.0`.
pub fn string_similarity(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 { return 1.0; }
    let diff = TextDiff::from_chars(a, b);
    let matches: usize = diff
        .ops()
        .iter()
        .map(|op| match op { DiffOp::Equal { len, .. } => *len, _ => 0 })
        .sum();
    2.0 * matches as f64 / total as f64
}
