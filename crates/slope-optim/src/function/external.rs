//! Objectives backed by an opaque sampler, e.g. a remote elevation service.

use crate::error::{check_dimension, OptimError, OptimResult};
use crate::function::DifferentiableObjective;

/// Supplies a scalar for a coordinate, or `None` when the lookup failed.
///
/// Retry and timeout policy belong to the sampler; a `None` is final.
pub trait Sampler {
    /// Samples the value at `point`.
    fn sample(&mut self, point: &[f64]) -> Option<f64>;
}

impl<F> Sampler for F
where
    F: FnMut(&[f64]) -> Option<f64>,
{
    fn sample(&mut self, point: &[f64]) -> Option<f64> {
        self(point)
    }
}

/// Adapts a [`Sampler`] to [`DifferentiableObjective`].
///
/// A failed sample surfaces as [`OptimError::ExternalSampleFailure`]. The
/// gradient is the default forward difference, which calls the sampler
/// `arity + 1` times; wrap in [`Cached`](crate::function::Cached) and
/// [`FiniteDifference`](crate::function::FiniteDifference) to share probes.
#[derive(Debug, Clone)]
pub struct ExternalObjective<S> {
    sampler: S,
    arity: usize,
}

impl<S: Sampler> ExternalObjective<S> {
    /// Wraps `sampler` as an objective of the given arity.
    pub fn new(arity: usize, sampler: S) -> Self {
        Self { sampler, arity }
    }
}

impl<S: Sampler> DifferentiableObjective for ExternalObjective<S> {
    fn arity(&self) -> usize {
        self.arity
    }

    fn evaluate(&mut self, point: &[f64]) -> OptimResult<f64> {
        check_dimension(self.arity, point.len())?;
        self.sampler.sample(point).ok_or_else(|| {
            tracing::warn!(?point, "external sampler returned no value");
            OptimError::ExternalSampleFailure {
                point: point.to_vec(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampler_value_passes_through() {
        let mut f = ExternalObjective::new(2, |p: &[f64]| Some(p[0] * 10.0 + p[1]));
        assert_eq!(f.evaluate(&[4.0, 2.0]).unwrap(), 42.0);
    }

    #[test]
    fn test_missing_sample_is_an_error() {
        let mut f = ExternalObjective::new(2, |p: &[f64]| if p[0] > 0.0 { None } else { Some(0.0) });

        assert_eq!(f.evaluate(&[-1.0, 0.0]).unwrap(), 0.0);
        assert_eq!(
            f.evaluate(&[1.0, 0.0]),
            Err(OptimError::ExternalSampleFailure {
                point: vec![1.0, 0.0]
            })
        );
    }

    #[test]
    fn test_failure_propagates_through_gradient() {
        let mut f = ExternalObjective::new(1, |p: &[f64]| if p[0] >= 1.0 { None } else { Some(p[0]) });
        assert!(matches!(
            f.gradient_at(&[1.0 - 1e-9]),
            Err(OptimError::ExternalSampleFailure { .. })
        ));
    }
}
