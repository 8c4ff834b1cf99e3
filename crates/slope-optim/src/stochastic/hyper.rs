//! Per-sample losses viewed as objectives over model parameters.

use crate::error::{check_dimension, OptimResult};
use crate::function::DifferentiableObjective;
use crate::stochastic::Sample;

/// A per-sample loss `L(sample, params)`.
///
/// The sample is passed explicitly on every call; [`bind`](Self::bind) fixes
/// it to obtain an ordinary objective over the parameters.
///
/// # Example
///
/// ```rust
/// use slope_optim::function::DifferentiableObjective;
/// use slope_optim::stochastic::{HyperFunction, Sample};
///
/// // (y - w0 - w1 * x)^2
/// let loss = HyperFunction::new(2, |s: &Sample, w: &[f64]| {
///     (s.target - w[0] - w[1] * s.features[0]).powi(2)
/// });
///
/// let sample = Sample::new(vec![2.0], 5.0);
/// let mut bound = loss.bind(&sample);
/// assert_eq!(bound.evaluate(&[1.0, 1.0]).unwrap(), 4.0);
/// ```
#[derive(Debug, Clone)]
pub struct HyperFunction<L> {
    arity: usize,
    feature_count: Option<usize>,
    loss: L,
}

impl<L> HyperFunction<L>
where
    L: Fn(&Sample, &[f64]) -> f64,
{
    /// Creates a loss over `arity` parameters.
    pub fn new(arity: usize, loss: L) -> Self {
        Self {
            arity,
            feature_count: None,
            loss,
        }
    }

    /// Declares the feature width the loss expects.
    ///
    /// Batched objectives reject datasets of any other width.
    #[must_use]
    pub fn with_feature_count(mut self, feature_count: usize) -> Self {
        self.feature_count = Some(feature_count);
        self
    }

    /// Number of model parameters.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Expected feature width, if declared.
    pub fn feature_count(&self) -> Option<usize> {
        self.feature_count
    }

    /// Evaluates the loss of one sample.
    pub fn loss(&self, sample: &Sample, params: &[f64]) -> OptimResult<f64> {
        check_dimension(self.arity, params.len())?;
        Ok((self.loss)(sample, params))
    }

    /// Fixes the sample, yielding an objective over the parameters.
    pub fn bind<'a>(&'a self, sample: &'a Sample) -> BoundSample<'a, L> {
        BoundSample { hyper: self, sample }
    }
}

/// A [`HyperFunction`] with its sample fixed.
///
/// Its gradient is the default forward difference over the parameters.
#[derive(Debug)]
pub struct BoundSample<'a, L> {
    hyper: &'a HyperFunction<L>,
    sample: &'a Sample,
}

impl<L> DifferentiableObjective for BoundSample<'_, L>
where
    L: Fn(&Sample, &[f64]) -> f64,
{
    fn arity(&self) -> usize {
        self.hyper.arity
    }

    fn evaluate(&mut self, point: &[f64]) -> OptimResult<f64> {
        self.hyper.loss(self.sample, point)
    }
}
