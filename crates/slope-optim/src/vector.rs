//! Small helpers for points stored as `&[f64]`.
//!
//! Points are plain coordinate slices; every update produces a new `Vec<f64>`.

use crate::error::{check_dimension, OptimResult};

/// Returns `base + multiplier * direction`.
pub fn axpy(base: &[f64], direction: &[f64], multiplier: f64) -> OptimResult<Vec<f64>> {
    check_dimension(base.len(), direction.len())?;
    Ok(base
        .iter()
        .zip(direction)
        .map(|(b, d)| b + multiplier * d)
        .collect())
}

/// Returns `scalar * point`.
pub fn scale(point: &[f64], scalar: f64) -> Vec<f64> {
    point.iter().map(|x| scalar * x).collect()
}

/// Squared Euclidean norm.
pub fn squared_norm(point: &[f64]) -> f64 {
    point.iter().map(|x| x * x).sum()
}

/// Euclidean norm.
pub fn norm(point: &[f64]) -> f64 {
    squared_norm(point).sqrt()
}

/// Euclidean distance between two points of equal length.
pub fn distance(a: &[f64], b: &[f64]) -> OptimResult<f64> {
    check_dimension(a.len(), b.len())?;
    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt())
}

/// Component-wise clamp. Either side may be absent.
pub fn clamp(point: &[f64], lower: Option<&[f64]>, upper: Option<&[f64]>) -> OptimResult<Vec<f64>> {
    if let Some(lower) = lower {
        check_dimension(point.len(), lower.len())?;
    }
    if let Some(upper) = upper {
        check_dimension(point.len(), upper.len())?;
    }

    Ok(point
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let x = lower.map_or(x, |lo| x.max(lo[i]));
            upper.map_or(x, |hi| x.min(hi[i]))
        })
        .collect())
}

/// Sign with `sign(0) == 0`, unlike [`f64::signum`].
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
