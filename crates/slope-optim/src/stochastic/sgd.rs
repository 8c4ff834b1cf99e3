//! Stochastic gradient descent driver.

use rand::Rng;
use serde::Serialize;

use crate::convergence::ConvergenceCheck;
use crate::error::{check_dimension, require_positive, OptimResult};
use crate::function::{DifferentiableObjective, DEFAULT_EPSILON};
use crate::optimizer::{GradientOptimizer, RunConfig};
use crate::result::OptimizationResult;
use crate::scheduler::StepScheduler;
use crate::stochastic::{BatchReduction, BatchedObjective, Dataset, HyperFunction, Sample};

/// Result of a stochastic run.
#[derive(Debug, Clone, Serialize)]
pub struct StochasticOutcome {
    /// The descent result over the batched objective.
    pub result: OptimizationResult,
    /// Batched evaluation and gradient calls, each of which drew a batch.
    pub objective_calls: usize,
}

/// Fits the parameters of a [`HyperFunction`] to a [`Dataset`] by gradient
/// descent on a freshly drawn minibatch at every call.
///
/// # Example
///
/// ```rust
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use slope_optim::prelude::*;
///
/// let data = Dataset::from_pairs((0..10).map(|i| {
///     let x = f64::from(i) / 10.0;
///     (vec![x], 2.0 + 3.0 * x)
/// }))
/// .unwrap();
///
/// let sgd = StochasticGradientOptimizer::new(
///     Constant::new(0.3).unwrap(),
///     NeverBreak,
///     LinearModel::new(1).squared_error(),
///     2_000,
/// );
/// let outcome = sgd
///     .optimize(&data, vec![0.0, 0.0], 10, NoRegularization::new(2), StdRng::seed_from_u64(5))
///     .unwrap();
///
/// let w = outcome.result.final_point();
/// assert!((w[0] - 2.0).abs() < 1e-2);
/// assert!((w[1] - 3.0).abs() < 1e-2);
/// ```
#[derive(Debug, Clone)]
pub struct StochasticGradientOptimizer<S, C, L> {
    optimizer: GradientOptimizer<S, C>,
    hyper: HyperFunction<L>,
    reduction: BatchReduction,
    epsilon: f64,
}

impl<S, C, L> StochasticGradientOptimizer<S, C, L>
where
    S: StepScheduler,
    C: ConvergenceCheck,
    L: Fn(&Sample, &[f64]) -> f64,
{
    /// Creates an optimizer that runs at most `limit` iterations.
    pub fn new(scheduler: S, checker: C, hyper: HyperFunction<L>, limit: usize) -> Self {
        Self {
            optimizer: GradientOptimizer::new(scheduler, checker, limit),
            hyper,
            reduction: BatchReduction::default(),
            epsilon: DEFAULT_EPSILON,
        }
    }

    /// Sets the batch reduction.
    #[must_use]
    pub fn with_reduction(mut self, reduction: BatchReduction) -> Self {
        self.reduction = reduction;
        self
    }

    /// Sets the forward-difference step for per-sample gradients.
    pub fn with_epsilon(mut self, epsilon: f64) -> OptimResult<Self> {
        self.epsilon = require_positive("finite difference epsilon", epsilon)?;
        Ok(self)
    }

    /// The per-sample loss.
    pub fn hyper(&self) -> &HyperFunction<L> {
        &self.hyper
    }

    /// The inner descent loop.
    pub fn optimizer(&self) -> &GradientOptimizer<S, C> {
        &self.optimizer
    }

    /// Minimizes the batched loss plus `regularizer`, starting from `initial`.
    ///
    /// Fails if `initial` or the penalty does not match the loss's arity, if
    /// the dataset's feature width differs from the one the loss declares, or
    /// if `batch_size` is not in `1..=dataset.len()`.
    pub fn optimize<R, G>(
        &self,
        dataset: &Dataset,
        initial: Vec<f64>,
        batch_size: usize,
        regularizer: R,
        rng: G,
    ) -> OptimResult<StochasticOutcome>
    where
        R: DifferentiableObjective,
        G: Rng,
    {
        check_dimension(self.hyper.arity(), initial.len())?;

        let mut objective = BatchedObjective::new(&self.hyper, dataset, batch_size, regularizer, rng)?
            .with_reduction(self.reduction)
            .with_epsilon(self.epsilon)?;

        tracing::debug!(
            samples = dataset.len(),
            batch_size,
            reduction = ?self.reduction,
            "starting stochastic descent"
        );

        let result = self
            .optimizer
            .optimize(&mut objective, &RunConfig::default().with_start(initial))?;

        Ok(StochasticOutcome {
            result,
            objective_calls: objective.times_used(),
        })
    }
}
