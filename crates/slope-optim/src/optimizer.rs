//! The gradient descent loop.

use crate::convergence::ConvergenceCheck;
use crate::error::{check_dimension, OptimError, OptimResult};
use crate::function::{DifferentiableObjective, Negated, Tracked};
use crate::result::{OptimizationResult, Trajectory};
use crate::scheduler::StepScheduler;
use crate::vector::{axpy, clamp, norm};

/// Per-run settings: start point, box bounds and direction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunConfig {
    /// Initial iterate; the zero point when absent.
    pub start: Option<Vec<f64>>,
    /// Component-wise lower bound.
    pub lower_bound: Option<Vec<f64>>,
    /// Component-wise upper bound.
    pub upper_bound: Option<Vec<f64>>,
    /// Maximize instead of minimize.
    pub maximize: bool,
}

impl RunConfig {
    /// Sets the starting point.
    #[must_use]
    pub fn with_start(mut self, start: Vec<f64>) -> Self {
        self.start = Some(start);
        self
    }

    /// Sets the lower bound.
    #[must_use]
    pub fn with_lower_bound(mut self, lower: Vec<f64>) -> Self {
        self.lower_bound = Some(lower);
        self
    }

    /// Sets the upper bound.
    #[must_use]
    pub fn with_upper_bound(mut self, upper: Vec<f64>) -> Self {
        self.upper_bound = Some(upper);
        self
    }

    /// Maximizes the objective.
    #[must_use]
    pub fn maximizing(mut self) -> Self {
        self.maximize = true;
        self
    }
}

/// Combines a [`StepScheduler`] and a [`ConvergenceCheck`] into a descent loop.
///
/// Each iteration:
///
/// 1. asks the scheduler for a step (line searches probe the objective here)
/// 2. evaluates the gradient at the current point
/// 3. moves to `clamp(x − step·∇f(x), lower, upper)`
///
/// The loop stops when the checker fires or after `limit` iterations, in which
/// case the result is marked aborted.
///
/// # Example
///
/// ```rust
/// use slope_optim::prelude::*;
///
/// let mut f = DerivableFunction::new(|p: &[f64]| (p[0] - 3.0).powi(2))
///     .with_partial(|p: &[f64]| 2.0 * (p[0] - 3.0));
///
/// let optimizer = GradientOptimizer::new(
///     Constant::new(0.25).unwrap(),
///     BreakChecker::gradient_absolute(1e-12).unwrap(),
///     1_000,
/// );
/// let result = optimizer.optimize(&mut f, &RunConfig::default()).unwrap();
///
/// assert!(!result.aborted());
/// assert!((result.final_point()[0] - 3.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct GradientOptimizer<S, C> {
    scheduler: S,
    checker: C,
    limit: usize,
}

impl<S: StepScheduler, C: ConvergenceCheck> GradientOptimizer<S, C> {
    /// Creates an optimizer that runs at most `limit` iterations.
    pub fn new(scheduler: S, checker: C, limit: usize) -> Self {
        Self {
            scheduler,
            checker,
            limit,
        }
    }

    /// The step-size strategy.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// The break checker.
    pub fn checker(&self) -> &C {
        &self.checker
    }

    /// Maximum number of iterations.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Runs gradient descent (or ascent, with [`RunConfig::maximizing`]).
    ///
    /// Fails with `DimensionMismatch` if the start point or a bound does not
    /// match the objective's arity. Errors raised by the objective, such as a
    /// failed external sample, end the run and are returned as-is.
    pub fn optimize<O>(&self, objective: &mut O, run: &RunConfig) -> OptimResult<OptimizationResult>
    where
        O: DifferentiableObjective + ?Sized,
    {
        let arity = objective.arity();
        let start = match &run.start {
            Some(start) => {
                check_dimension(arity, start.len())?;
                start.clone()
            }
            None => vec![0.0; arity],
        };
        if let Some(lower) = &run.lower_bound {
            check_dimension(arity, lower.len())?;
        }
        if let Some(upper) = &run.upper_bound {
            check_dimension(arity, upper.len())?;
        }

        let mut tracked = Tracked::new(objective);
        tracked.start();
        let outcome = if run.maximize {
            self.descend(&mut Negated::new(&mut tracked), start, run)
        } else {
            self.descend(&mut tracked, start, run)
        };
        tracked.stop();

        let (trajectory, iterations) = outcome?;
        let aborted = iterations == self.limit;
        let stats = tracked.stats();

        tracing::info!(
            scheduler = self.scheduler.name(),
            checker = self.checker.name(),
            iterations,
            aborted,
            evaluations = stats.evaluations,
            gradients = stats.gradients,
            "optimization finished"
        );

        Ok(OptimizationResult {
            trajectory,
            aborted,
            hyperparameters: self.scheduler.hyperparameters(),
            scheduler: self.scheduler.name().to_string(),
            stats,
        })
    }

    fn descend(
        &self,
        objective: &mut dyn DifferentiableObjective,
        start: Vec<f64>,
        run: &RunConfig,
    ) -> OptimResult<(Trajectory, usize)> {
        let lower = run.lower_bound.as_deref();
        let upper = run.upper_bound.as_deref();

        let mut current = start;
        let mut trajectory = Trajectory::new(current.clone());
        let mut iteration = 0;

        while iteration < self.limit && !self.checker.is_done(&trajectory, objective)? {
            let step = self.scheduler.step_value(&current, iteration, objective)?;
            if !step.is_finite() {
                return Err(OptimError::non_finite(self.scheduler.name()));
            }

            let gradient = objective.gradient_at(&current)?;
            if gradient.iter().any(|g| !g.is_finite()) {
                return Err(OptimError::non_finite("gradient"));
            }

            current = clamp(&axpy(&current, &gradient, -step)?, lower, upper)?;
            tracing::debug!(iteration, step, norm = norm(&current), "descent step");

            trajectory.push(current.clone());
            iteration += 1;
        }

        Ok((trajectory, iteration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convergence::{BreakChecker, NeverBreak};
    use crate::function::DerivableFunction;
    use crate::scheduler::{Constant, Dichotomy, SegmentConfig};
    use approx::assert_abs_diff_eq;

    fn sphere() -> DerivableFunction {
        DerivableFunction::new(|p: &[f64]| p[0] * p[0] + p[1] * p[1])
            .with_partial(|p: &[f64]| 2.0 * p[0])
            .with_partial(|p: &[f64]| 2.0 * p[1])
    }

    #[test]
    fn test_converges_on_sphere() {
        let optimizer = GradientOptimizer::new(
            Dichotomy::new(SegmentConfig::default()).unwrap(),
            BreakChecker::argument_absolute(1e-8).unwrap(),
            100,
        );
        let mut f = sphere();
        let result = optimizer
            .optimize(&mut f, &RunConfig::default().with_start(vec![10.0, 10.0]))
            .unwrap();

        assert!(!result.aborted());
        assert_abs_diff_eq!(result.final_point()[0], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(result.final_point()[1], 0.0, epsilon = 1e-6);
        assert_eq!(result.scheduler(), "dichotomy");
        assert!(result.stats().evaluations > 0);
    }

    #[test]
    fn test_zero_start_by_default() {
        let optimizer = GradientOptimizer::new(Constant::new(0.1).unwrap(), NeverBreak, 0);
        let mut f = sphere();
        let result = optimizer.optimize(&mut f, &RunConfig::default()).unwrap();

        assert_eq!(result.trajectory().len(), 1);
        assert_eq!(result.final_point(), &[0.0, 0.0]);
        assert!(result.aborted());
    }

    #[test]
    fn test_limit_sets_aborted() {
        let optimizer = GradientOptimizer::new(Constant::new(0.1).unwrap(), NeverBreak, 7);
        let mut f = sphere();
        let result = optimizer
            .optimize(&mut f, &RunConfig::default().with_start(vec![1.0, 1.0]))
            .unwrap();

        assert!(result.aborted());
        assert_eq!(result.iterations(), 7);
        assert_eq!(result.trajectory().len(), 8);
        assert_eq!(result.stats().gradients, 7);
    }

    #[test]
    fn test_maximize_ascends() {
        // -(x - 2)^2 peaks at x = 2
        let mut f = DerivableFunction::new(|p: &[f64]| -(p[0] - 2.0).powi(2))
            .with_partial(|p: &[f64]| -2.0 * (p[0] - 2.0));
        let optimizer = GradientOptimizer::new(
            Constant::new(0.25).unwrap(),
            BreakChecker::argument_absolute(1e-10).unwrap(),
            1_000,
        );

        let result = optimizer
            .optimize(&mut f, &RunConfig::default().maximizing())
            .unwrap();

        assert!(!result.aborted());
        assert_abs_diff_eq!(result.final_point()[0], 2.0, epsilon = 1e-8);
        // the caller's objective keeps its sign
        assert_abs_diff_eq!(f.evaluate(&[0.0]).unwrap(), -4.0);
    }

    #[test]
    fn test_bounds_clamp_iterates() {
        let mut f = DerivableFunction::new(|p: &[f64]| (p[0] + 3.0).powi(2) + (p[1] - 9.0).powi(2))
            .with_partial(|p: &[f64]| 2.0 * (p[0] + 3.0))
            .with_partial(|p: &[f64]| 2.0 * (p[1] - 9.0));
        let optimizer = GradientOptimizer::new(Constant::new(0.1).unwrap(), NeverBreak, 50);
        let run = RunConfig::default()
            .with_start(vec![2.0, 2.0])
            .with_lower_bound(vec![0.0, 0.0])
            .with_upper_bound(vec![5.0, 5.0]);

        let result = optimizer.optimize(&mut f, &run).unwrap();

        for point in result.trajectory().points() {
            assert!(point.iter().all(|&x| (0.0..=5.0).contains(&x)));
        }
        assert_eq!(result.final_point(), &[0.0, 5.0]);
    }

    #[test]
    fn test_dimension_checks() {
        let optimizer = GradientOptimizer::new(Constant::new(0.1).unwrap(), NeverBreak, 5);
        let mut f = sphere();

        let bad_start = RunConfig::default().with_start(vec![1.0]);
        assert!(matches!(
            optimizer.optimize(&mut f, &bad_start),
            Err(OptimError::DimensionMismatch { expected: 2, actual: 1 })
        ));

        let bad_lower = RunConfig::default().with_lower_bound(vec![0.0, 0.0, 0.0]);
        assert!(optimizer.optimize(&mut f, &bad_lower).is_err());

        let bad_upper = RunConfig::default().with_upper_bound(vec![]);
        assert!(optimizer.optimize(&mut f, &bad_upper).is_err());
    }

    #[test]
    fn test_divergence_is_reported() {
        let mut f = DerivableFunction::new(|p: &[f64]| p[0] * p[0]).with_partial(|p: &[f64]| 2.0 * p[0]);
        let optimizer = GradientOptimizer::new(Constant::new(1e200).unwrap(), NeverBreak, 50);

        let result = optimizer.optimize(&mut f, &RunConfig::default().with_start(vec![1.0]));
        assert!(matches!(result, Err(OptimError::NonFiniteValue { .. })));
    }

    #[test]
    fn test_works_through_trait_object() {
        let optimizer = GradientOptimizer::new(
            Box::new(Constant::new(0.25).unwrap()) as Box<dyn StepScheduler>,
            Box::new(BreakChecker::gradient_absolute(1e-12).unwrap()) as Box<dyn ConvergenceCheck>,
            500,
        );
        let mut f: Box<dyn DifferentiableObjective> = Box::new(sphere());
        let result = optimizer
            .optimize(f.as_mut(), &RunConfig::default().with_start(vec![1.0, -1.0]))
            .unwrap();
        assert!(!result.aborted());
    }
}
