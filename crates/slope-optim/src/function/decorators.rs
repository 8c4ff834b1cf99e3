//! Wrappers that change how an objective is evaluated.

use std::collections::HashMap;

use crate::error::{require_positive, OptimResult};
use crate::function::{forward_difference, DifferentiableObjective};
use crate::result::CallStats;

/// Replaces the gradient of the wrapped objective with forward differences.
///
/// Useful for opaque objectives where the step must be coarser than
/// [`DEFAULT_EPSILON`](crate::function::DEFAULT_EPSILON), e.g. gridded
/// terrain where neighbouring samples are a whole unit apart.
#[derive(Debug, Clone)]
pub struct FiniteDifference<O> {
    inner: O,
    epsilon: f64,
}

impl<O: DifferentiableObjective> FiniteDifference<O> {
    /// Wraps `inner`, differentiating with step `epsilon`.
    pub fn new(inner: O, epsilon: f64) -> OptimResult<Self> {
        let epsilon = require_positive("finite difference epsilon", epsilon)?;
        Ok(Self { inner, epsilon })
    }

    /// The forward-difference step.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Borrows the wrapped objective.
    pub fn inner(&self) -> &O {
        &self.inner
    }

    /// Unwraps the objective.
    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: DifferentiableObjective> DifferentiableObjective for FiniteDifference<O> {
    fn arity(&self) -> usize {
        self.inner.arity()
    }

    fn evaluate(&mut self, point: &[f64]) -> OptimResult<f64> {
        self.inner.evaluate(point)
    }

    fn gradient_at(&mut self, point: &[f64]) -> OptimResult<Vec<f64>> {
        forward_difference(&mut self.inner, point, self.epsilon)
    }
}

/// Negates value and gradient, turning maximization into minimization.
#[derive(Debug, Clone)]
pub struct Negated<O> {
    inner: O,
}

impl<O: DifferentiableObjective> Negated<O> {
    /// Wraps `inner`.
    pub fn new(inner: O) -> Self {
        Self { inner }
    }

    /// Unwraps the objective.
    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: DifferentiableObjective> DifferentiableObjective for Negated<O> {
    fn arity(&self) -> usize {
        self.inner.arity()
    }

    fn evaluate(&mut self, point: &[f64]) -> OptimResult<f64> {
        Ok(-self.inner.evaluate(point)?)
    }

    fn gradient_at(&mut self, point: &[f64]) -> OptimResult<Vec<f64>> {
        Ok(self.inner.gradient_at(point)?.into_iter().map(|g| -g).collect())
    }
}

/// Counts evaluation and gradient calls between [`start`](Self::start) and
/// [`stop`](Self::stop).
///
/// Calls made through the tracker by line searches or break checkers are
/// counted too, since they go through the same wrapper.
#[derive(Debug, Clone)]
pub struct Tracked<O> {
    inner: O,
    active: bool,
    stats: CallStats,
}

impl<O: DifferentiableObjective> Tracked<O> {
    /// Wraps `inner`. Tracking starts inactive.
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            active: false,
            stats: CallStats::default(),
        }
    }

    /// Begins counting.
    pub fn start(&mut self) {
        self.active = true;
    }

    /// Stops counting; totals are kept.
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Whether calls are currently counted.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Totals gathered so far.
    pub fn stats(&self) -> CallStats {
        self.stats
    }

    /// Clears the totals.
    pub fn reset(&mut self) {
        self.stats = CallStats::default();
    }

    /// Unwraps the objective.
    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: DifferentiableObjective> DifferentiableObjective for Tracked<O> {
    fn arity(&self) -> usize {
        self.inner.arity()
    }

    fn evaluate(&mut self, point: &[f64]) -> OptimResult<f64> {
        if self.active {
            self.stats.evaluations += 1;
        }
        self.inner.evaluate(point)
    }

    fn gradient_at(&mut self, point: &[f64]) -> OptimResult<Vec<f64>> {
        if self.active {
            self.stats.gradients += 1;
        }
        self.inner.gradient_at(point)
    }
}

/// Memoizes evaluations keyed by the exact bit pattern of the point.
///
/// There is no eviction: the table grows for the life of the wrapper. That
/// is fine for short runs against an expensive sampler, but do not keep one
/// alive across many long runs.
///
/// Gradients are delegated to the wrapped objective. To let finite-difference
/// probes hit the cache, put the cache inside the differentiator:
/// `FiniteDifference::new(Cached::new(sampler), step)`.
#[derive(Debug, Clone)]
pub struct Cached<O> {
    inner: O,
    memo: HashMap<Vec<u64>, f64>,
    hits: usize,
}

impl<O: DifferentiableObjective> Cached<O> {
    /// Wraps `inner` with an empty cache.
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            memo: HashMap::new(),
            hits: 0,
        }
    }

    /// Number of distinct points stored.
    pub fn len(&self) -> usize {
        self.memo.len()
    }

    /// Returns true if nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }

    /// Number of evaluations answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Unwraps the objective, dropping the cache.
    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: DifferentiableObjective> DifferentiableObjective for Cached<O> {
    fn arity(&self) -> usize {
        self.inner.arity()
    }

    fn evaluate(&mut self, point: &[f64]) -> OptimResult<f64> {
        let key: Vec<u64> = point.iter().map(|x| x.to_bits()).collect();
        if let Some(&value) = self.memo.get(&key) {
            self.hits += 1;
            return Ok(value);
        }

        let value = self.inner.evaluate(point)?;
        self.memo.insert(key, value);
        Ok(value)
    }

    fn gradient_at(&mut self, point: &[f64]) -> OptimResult<Vec<f64>> {
        self.inner.gradient_at(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::{DerivableFunction, Function};
    use approx::assert_abs_diff_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    fn parabola() -> DerivableFunction {
        DerivableFunction::new(|p: &[f64]| (p[0] - 1.0).powi(2))
            .with_partial(|p: &[f64]| 2.0 * (p[0] - 1.0))
    }

    #[test]
    fn test_negated() {
        let mut f = Negated::new(parabola());
        assert_eq!(f.evaluate(&[3.0]).unwrap(), -4.0);
        assert_eq!(f.gradient_at(&[3.0]).unwrap(), vec![-4.0]);
    }

    #[test]
    fn test_tracked_counts_only_while_active() {
        let mut f = Tracked::new(parabola());

        f.evaluate(&[0.0]).unwrap();
        assert_eq!(f.stats(), CallStats::default());

        f.start();
        f.evaluate(&[0.0]).unwrap();
        f.evaluate(&[1.0]).unwrap();
        f.gradient_at(&[1.0]).unwrap();
        f.stop();
        f.evaluate(&[2.0]).unwrap();

        assert_eq!(f.stats().evaluations, 2);
        assert_eq!(f.stats().gradients, 1);
        assert_eq!(f.stats().total(), 3);

        f.reset();
        assert_eq!(f.stats().total(), 0);
    }

    #[test]
    fn test_cached_avoids_repeat_calls() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let inner = Function::new(2, move |p: &[f64]| {
            counter.set(counter.get() + 1);
            p[0] + p[1]
        });

        let mut f = Cached::new(inner);
        assert!(f.is_empty());

        assert_eq!(f.evaluate(&[1.0, 2.0]).unwrap(), 3.0);
        assert_eq!(f.evaluate(&[1.0, 2.0]).unwrap(), 3.0);
        assert_eq!(f.evaluate(&[2.0, 2.0]).unwrap(), 4.0);

        assert_eq!(calls.get(), 2);
        assert_eq!(f.len(), 2);
        assert_eq!(f.hits(), 1);
    }

    #[test]
    fn test_finite_difference_over_cache() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let inner = Function::new(2, move |p: &[f64]| {
            counter.set(counter.get() + 1);
            p[0] * p[0] + 3.0 * p[1]
        });

        let mut f = FiniteDifference::new(Cached::new(inner), 1.0).unwrap();
        let g = f.gradient_at(&[2.0, 0.0]).unwrap();

        assert_abs_diff_eq!(g[0], 5.0);
        assert_abs_diff_eq!(g[1], 3.0);
        assert_eq!(calls.get(), 3);

        f.gradient_at(&[2.0, 0.0]).unwrap();
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_finite_difference_rejects_bad_step() {
        assert!(FiniteDifference::new(parabola(), -1.0).is_err());
        assert!(FiniteDifference::new(parabola(), f64::INFINITY).is_err());
    }
}
