//! Differentiable objectives.
//!
//! Everything the optimizer touches implements [`DifferentiableObjective`]:
//!
//! - [`Function`]: an evaluation rule only; gradients come from forward differences
//! - [`DerivableFunction`]: an evaluation rule plus one analytic partial per coordinate
//! - [`ExternalObjective`]: an opaque [`Sampler`] such as a remote elevation lookup
//!
//! Decorators change behaviour without touching the wrapped objective:
//!
//! - [`FiniteDifference`]: replaces any gradient with forward differences of a chosen step
//! - [`Negated`]: flips the sign of value and gradient (maximization)
//! - [`Tracked`]: counts evaluation and gradient calls while active
//! - [`Cached`]: memoizes evaluations keyed by the exact point
//!
//! Line searches look at an objective through a [`CrossSection`], the 1-D
//! restriction `t ↦ f(x − t·∇f(x))`.

mod cross_section;
mod decorators;
mod external;

pub use cross_section::CrossSection;
pub use decorators::{Cached, FiniteDifference, Negated, Tracked};
pub use external::{ExternalObjective, Sampler};

use crate::error::{check_dimension, require_positive, OptimResult};

/// Default forward-difference step.
pub const DEFAULT_EPSILON: f64 = 1e-8;

/// A scalar objective over points of fixed arity with a gradient.
///
/// Methods take `&mut self` so that implementations can cache, count calls,
/// or draw random minibatches.
pub trait DifferentiableObjective {
    /// Number of coordinates a point must have.
    fn arity(&self) -> usize;

    /// Evaluates the objective at `point`.
    ///
    /// Fails with [`DimensionMismatch`](crate::OptimError::DimensionMismatch)
    /// if `point.len() != self.arity()`.
    fn evaluate(&mut self, point: &[f64]) -> OptimResult<f64>;

    /// Returns the gradient at `point`, one partial derivative per coordinate.
    ///
    /// Defaults to forward differences with [`DEFAULT_EPSILON`].
    fn gradient_at(&mut self, point: &[f64]) -> OptimResult<Vec<f64>> {
        forward_difference(self, point, DEFAULT_EPSILON)
    }
}

impl<T: DifferentiableObjective + ?Sized> DifferentiableObjective for &mut T {
    fn arity(&self) -> usize {
        (**self).arity()
    }

    fn evaluate(&mut self, point: &[f64]) -> OptimResult<f64> {
        (**self).evaluate(point)
    }

    fn gradient_at(&mut self, point: &[f64]) -> OptimResult<Vec<f64>> {
        (**self).gradient_at(point)
    }
}

impl<T: DifferentiableObjective + ?Sized> DifferentiableObjective for Box<T> {
    fn arity(&self) -> usize {
        (**self).arity()
    }

    fn evaluate(&mut self, point: &[f64]) -> OptimResult<f64> {
        (**self).evaluate(point)
    }

    fn gradient_at(&mut self, point: &[f64]) -> OptimResult<Vec<f64>> {
        (**self).gradient_at(point)
    }
}

/// Forward-difference gradient `(f(x + ε·eᵢ) − f(x)) / ε`.
///
/// `f(x)` is evaluated once and shared by every coordinate.
pub fn forward_difference<O>(objective: &mut O, point: &[f64], epsilon: f64) -> OptimResult<Vec<f64>>
where
    O: DifferentiableObjective + ?Sized,
{
    check_dimension(objective.arity(), point.len())?;
    let epsilon = require_positive("finite difference epsilon", epsilon)?;

    let base = objective.evaluate(point)?;
    let mut shifted = point.to_vec();
    let mut gradient = Vec::with_capacity(point.len());

    for i in 0..point.len() {
        shifted[i] = point[i] + epsilon;
        gradient.push((objective.evaluate(&shifted)? - base) / epsilon);
        shifted[i] = point[i];
    }

    Ok(gradient)
}

/// An objective given by an evaluation rule only.
///
/// # Example
///
/// ```rust
/// use slope_optim::function::{DifferentiableObjective, Function};
///
/// let mut f = Function::new(2, |p: &[f64]| p[0] * p[0] + p[1] * p[1]);
/// assert_eq!(f.evaluate(&[1.0, 2.0]).unwrap(), 5.0);
///
/// let g = f.gradient_at(&[1.0, 2.0]).unwrap();
/// assert!((g[0] - 2.0).abs() < 1e-4);
/// ```
pub struct Function<F> {
    arity: usize,
    rule: F,
}

impl<F> Function<F>
where
    F: Fn(&[f64]) -> f64,
{
    /// Creates a function of the given arity.
    pub fn new(arity: usize, rule: F) -> Self {
        Self { arity, rule }
    }
}

impl<F> DifferentiableObjective for Function<F>
where
    F: Fn(&[f64]) -> f64,
{
    fn arity(&self) -> usize {
        self.arity
    }

    fn evaluate(&mut self, point: &[f64]) -> OptimResult<f64> {
        check_dimension(self.arity, point.len())?;
        Ok((self.rule)(point))
    }
}

type Rule = Box<dyn Fn(&[f64]) -> f64>;

/// An objective with an analytic partial derivative per coordinate.
///
/// The arity is the number of partials supplied, so the gradient rule count
/// always matches it.
///
/// # Example
///
/// ```rust
/// use slope_optim::function::{DerivableFunction, DifferentiableObjective};
///
/// let mut f = DerivableFunction::new(|p: &[f64]| p[0] * p[0] + p[1] * p[1])
///     .with_partial(|p: &[f64]| 2.0 * p[0])
///     .with_partial(|p: &[f64]| 2.0 * p[1]);
///
/// assert_eq!(f.arity(), 2);
/// assert_eq!(f.gradient_at(&[1.0, 2.0]).unwrap(), vec![2.0, 4.0]);
/// ```
pub struct DerivableFunction {
    value: Rule,
    partials: Vec<Rule>,
}

impl DerivableFunction {
    /// Creates a function with no partials yet; add one per coordinate.
    pub fn new(value: impl Fn(&[f64]) -> f64 + 'static) -> Self {
        Self {
            value: Box::new(value),
            partials: Vec::new(),
        }
    }

    /// Appends the partial derivative for the next coordinate.
    #[must_use]
    pub fn with_partial(mut self, partial: impl Fn(&[f64]) -> f64 + 'static) -> Self {
        self.partials.push(Box::new(partial));
        self
    }
}

impl std::fmt::Debug for DerivableFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivableFunction")
            .field("arity", &self.partials.len())
            .finish_non_exhaustive()
    }
}

impl DifferentiableObjective for DerivableFunction {
    fn arity(&self) -> usize {
        self.partials.len()
    }

    fn evaluate(&mut self, point: &[f64]) -> OptimResult<f64> {
        check_dimension(self.arity(), point.len())?;
        Ok((self.value)(point))
    }

    fn gradient_at(&mut self, point: &[f64]) -> OptimResult<Vec<f64>> {
        check_dimension(self.arity(), point.len())?;
        Ok(self.partials.iter().map(|partial| partial(point)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OptimError;
    use approx::assert_abs_diff_eq;

    fn sphere() -> DerivableFunction {
        DerivableFunction::new(|p: &[f64]| p[0] * p[0] + p[1] * p[1])
            .with_partial(|p: &[f64]| 2.0 * p[0])
            .with_partial(|p: &[f64]| 2.0 * p[1])
    }

    #[test]
    fn test_analytic_gradient() {
        let mut f = sphere();
        assert_eq!(f.evaluate(&[1.0, 2.0]).unwrap(), 5.0);
        assert_eq!(f.gradient_at(&[3.0, 4.0]).unwrap(), vec![6.0, 8.0]);
    }

    #[test]
    fn test_finite_difference_matches_analytic() {
        let mut f = Function::new(2, |p: &[f64]| p[0] * p[0] + p[1] * p[1]);
        let g = forward_difference(&mut f, &[3.0, 4.0], 1e-6).unwrap();

        assert_abs_diff_eq!(g[0], 6.0, epsilon = 1e-3);
        assert_abs_diff_eq!(g[1], 8.0, epsilon = 1e-3);
    }

    #[test]
    fn test_default_gradient_is_finite_difference() {
        let mut f = Function::new(1, |p: &[f64]| p[0].powi(3));
        let g = f.gradient_at(&[2.0]).unwrap();
        assert_abs_diff_eq!(g[0], 12.0, epsilon = 1e-4);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut f = sphere();
        assert_eq!(
            f.evaluate(&[1.0]),
            Err(OptimError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert!(f.gradient_at(&[1.0, 2.0, 3.0]).is_err());

        let mut g = Function::new(3, |p: &[f64]| p.iter().sum());
        assert!(g.evaluate(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_rejects_non_positive_epsilon() {
        let mut f = Function::new(1, |p: &[f64]| p[0]);
        assert!(matches!(
            forward_difference(&mut f, &[1.0], 0.0),
            Err(OptimError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_trait_object_dispatch() {
        let mut boxed: Box<dyn DifferentiableObjective> = Box::new(sphere());
        assert_eq!(boxed.arity(), 2);
        assert_eq!(boxed.gradient_at(&[1.0, 1.0]).unwrap(), vec![2.0, 2.0]);
    }
}
