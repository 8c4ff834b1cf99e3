//! One-dimensional view of an objective along the negative gradient.

use crate::error::{check_dimension, OptimResult};
use crate::function::DifferentiableObjective;
use crate::vector::{axpy, scale};

/// The restriction `t ↦ f(x − t·∇f(x))` of an objective to the descent ray.
///
/// The gradient is evaluated once, at construction, and reused for every
/// probe along the ray.
pub struct CrossSection<'a, O: DifferentiableObjective + ?Sized> {
    objective: &'a mut O,
    origin: Vec<f64>,
    direction: Vec<f64>,
}

impl<'a, O: DifferentiableObjective + ?Sized> CrossSection<'a, O> {
    /// Builds the cross-section of `objective` through `point`.
    pub fn new(objective: &'a mut O, point: &[f64]) -> OptimResult<Self> {
        check_dimension(objective.arity(), point.len())?;
        let gradient = objective.gradient_at(point)?;

        Ok(Self {
            origin: point.to_vec(),
            direction: scale(&gradient, -1.0),
            objective,
        })
    }

    /// Evaluates the objective at `origin + t·direction`.
    pub fn value_at(&mut self, t: f64) -> OptimResult<f64> {
        let probe = axpy(&self.origin, &self.direction, t)?;
        self.objective.evaluate(&probe)
    }

    /// The point the ray starts from.
    pub fn origin(&self) -> &[f64] {
        &self.origin
    }

    /// The negative gradient at the origin.
    pub fn direction(&self) -> &[f64] {
        &self.direction
    }
}
