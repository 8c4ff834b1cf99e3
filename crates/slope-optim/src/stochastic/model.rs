//! Linear regression with a bias term.

use crate::error::{check_dimension, OptimResult};
use crate::stochastic::{HyperFunction, Sample};

/// Signature of a plain per-sample loss.
pub type LossFn = fn(&Sample, &[f64]) -> f64;

/// `ŷ = w₀ + Σ wᵢ·xᵢ` over a fixed number of features.
///
/// Parameters are laid out bias first, so a model over `n` features has
/// `n + 1` parameters and penalties skip index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinearModel {
    feature_count: usize,
}

impl LinearModel {
    /// Creates a model over `feature_count` features.
    pub fn new(feature_count: usize) -> Self {
        Self { feature_count }
    }

    /// Number of features.
    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    /// Number of parameters, bias included.
    pub fn param_count(&self) -> usize {
        self.feature_count + 1
    }

    /// Predicts the target for `features`.
    pub fn predict(&self, features: &[f64], params: &[f64]) -> OptimResult<f64> {
        check_dimension(self.feature_count, features.len())?;
        check_dimension(self.param_count(), params.len())?;
        Ok(linear(features, params))
    }

    /// Squared-error loss over this model's parameters.
    pub fn squared_error(&self) -> HyperFunction<LossFn> {
        HyperFunction::new(self.param_count(), squared_error_loss as LossFn)
            .with_feature_count(self.feature_count)
    }
}

fn linear(features: &[f64], params: &[f64]) -> f64 {
    params[0] + features.iter().zip(&params[1..]).map(|(x, w)| x * w).sum::<f64>()
}

/// `(y − w₀ − Σ wᵢ·xᵢ)²` for one sample.
///
/// Called directly, extra parameters or features beyond the shorter of the
/// two are ignored. Through [`LinearModel::squared_error`] the parameter
/// count is checked on every call and the feature width once per dataset.
pub fn squared_error_loss(sample: &Sample, params: &[f64]) -> f64 {
    if params.is_empty() {
        return sample.target * sample.target;
    }
    let residual = sample.target - linear(&sample.features, params);
    residual * residual
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::DifferentiableObjective;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_predict() {
        let model = LinearModel::new(2);
        assert_eq!(model.param_count(), 3);
        assert_eq!(model.predict(&[2.0, 3.0], &[1.0, 10.0, 100.0]).unwrap(), 321.0);
        assert!(model.predict(&[2.0], &[1.0, 10.0, 100.0]).is_err());
        assert!(model.predict(&[2.0, 3.0], &[1.0, 10.0]).is_err());
    }

    #[test]
    fn test_squared_error() {
        let sample = Sample::new(vec![2.0], 7.0);
        // 7 - (1 + 2*2) = 2
        assert_eq!(squared_error_loss(&sample, &[1.0, 2.0]), 4.0);

        let hyper = LinearModel::new(1).squared_error();
        assert_eq!(hyper.feature_count(), Some(1));
        let mut bound = hyper.bind(&sample);
        let g = bound.gradient_at(&[1.0, 2.0]).unwrap();
        assert_abs_diff_eq!(g[0], -4.0, epsilon = 1e-4);
        assert_abs_diff_eq!(g[1], -8.0, epsilon = 1e-4);
    }
}
