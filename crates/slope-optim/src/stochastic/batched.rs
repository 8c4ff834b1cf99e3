//! Minibatch objective over a dataset.

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{check_dimension, require_positive, OptimError, OptimResult};
use crate::function::{forward_difference, DifferentiableObjective, DEFAULT_EPSILON};
use crate::stochastic::{Dataset, HyperFunction, Sample};
use crate::vector::axpy;

/// How per-sample losses and gradients are combined across a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchReduction {
    /// Plain sum; the step size must shrink with the batch size.
    Sum,
    /// Arithmetic mean; scale-free in the batch size.
    #[default]
    Mean,
}

impl BatchReduction {
    fn apply(self, total: f64, batch_size: usize) -> f64 {
        match self {
            Self::Sum => total,
            Self::Mean => total / batch_size as f64,
        }
    }
}

/// A per-sample loss reduced over a random batch, plus a penalty.
///
/// Every call to [`evaluate`](DifferentiableObjective::evaluate) or
/// [`gradient_at`](DifferentiableObjective::gradient_at) draws a fresh batch
/// of `batch_size` distinct samples, so two calls at the same point generally
/// disagree unless the batch covers the whole dataset.
///
/// The gradient reduces the forward-difference gradients of the per-sample
/// losses and adds the penalty's gradient.
#[derive(Debug)]
pub struct BatchedObjective<'a, L, R, G> {
    hyper: &'a HyperFunction<L>,
    dataset: &'a Dataset,
    batch_size: usize,
    regularizer: R,
    rng: G,
    reduction: BatchReduction,
    epsilon: f64,
    times_used: usize,
}

impl<'a, L, R, G> BatchedObjective<'a, L, R, G>
where
    L: Fn(&Sample, &[f64]) -> f64,
    R: DifferentiableObjective,
    G: Rng,
{
    /// Creates a batched objective.
    ///
    /// Fails if `batch_size` is zero or exceeds the dataset, if the penalty's
    /// arity differs from the loss's, or if the loss declares a feature width
    /// the dataset does not have.
    pub fn new(
        hyper: &'a HyperFunction<L>,
        dataset: &'a Dataset,
        batch_size: usize,
        regularizer: R,
        rng: G,
    ) -> OptimResult<Self> {
        if batch_size == 0 || batch_size > dataset.len() {
            return Err(OptimError::invalid_configuration(format!(
                "batch size {batch_size} must be in 1..={}",
                dataset.len()
            )));
        }
        check_dimension(hyper.arity(), regularizer.arity())?;
        if let Some(width) = hyper.feature_count() {
            check_dimension(width, dataset.feature_count())?;
        }

        Ok(Self {
            hyper,
            dataset,
            batch_size,
            regularizer,
            rng,
            reduction: BatchReduction::default(),
            epsilon: DEFAULT_EPSILON,
            times_used: 0,
        })
    }

    /// Sets the batch reduction.
    #[must_use]
    pub fn with_reduction(mut self, reduction: BatchReduction) -> Self {
        self.reduction = reduction;
        self
    }

    /// Sets the forward-difference step used for per-sample gradients.
    pub fn with_epsilon(mut self, epsilon: f64) -> OptimResult<Self> {
        self.epsilon = require_positive("finite difference epsilon", epsilon)?;
        Ok(self)
    }

    /// Number of evaluation and gradient calls so far.
    pub fn times_used(&self) -> usize {
        self.times_used
    }

    /// Samples drawn per call.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// The active reduction.
    pub fn reduction(&self) -> BatchReduction {
        self.reduction
    }

    fn draw(&mut self) -> Vec<usize> {
        self.times_used += 1;
        index::sample(&mut self.rng, self.dataset.len(), self.batch_size).into_vec()
    }
}

impl<L, R, G> DifferentiableObjective for BatchedObjective<'_, L, R, G>
where
    L: Fn(&Sample, &[f64]) -> f64,
    R: DifferentiableObjective,
    G: Rng,
{
    fn arity(&self) -> usize {
        self.hyper.arity()
    }

    fn evaluate(&mut self, point: &[f64]) -> OptimResult<f64> {
        check_dimension(self.arity(), point.len())?;

        let mut total = 0.0;
        for i in self.draw() {
            total += self.hyper.loss(&self.dataset.samples()[i], point)?;
        }

        let penalty = self.regularizer.evaluate(point)?;
        Ok(self.reduction.apply(total, self.batch_size) + penalty)
    }

    fn gradient_at(&mut self, point: &[f64]) -> OptimResult<Vec<f64>> {
        check_dimension(self.arity(), point.len())?;

        let hyper = self.hyper;
        let dataset = self.dataset;
        let samples = dataset.samples();
        let mut total = vec![0.0; point.len()];
        for i in self.draw() {
            let partial = forward_difference(&mut hyper.bind(&samples[i]), point, self.epsilon)?;
            total = axpy(&total, &partial, 1.0)?;
        }

        let reduced: Vec<f64> = total
            .into_iter()
            .map(|g| self.reduction.apply(g, self.batch_size))
            .collect();
        let penalty = self.regularizer.gradient_at(point)?;

        tracing::trace!(batch = self.batch_size, call = self.times_used, "batched gradient");
        axpy(&reduced, &penalty, 1.0)
    }
}
