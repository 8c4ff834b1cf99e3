//! Parameter penalties added to a batched loss.
//!
//! Every penalty has a fixed arity equal to the parameter count and ignores
//! the bias (intercept) at index 0.

use crate::error::{check_dimension, require_positive, OptimError, OptimResult};
use crate::function::DifferentiableObjective;
use crate::vector::sign;

fn validate(arg_count: usize, lambda: f64) -> OptimResult<f64> {
    if arg_count == 0 {
        return Err(OptimError::invalid_configuration(
            "regularizer needs at least one parameter",
        ));
    }
    require_positive("regularization lambda", lambda)
}

/// Builds a gradient with 0 for the bias and `rule(wᵢ)` elsewhere.
fn penalty_gradient(point: &[f64], rule: impl Fn(f64) -> f64) -> Vec<f64> {
    point
        .iter()
        .enumerate()
        .map(|(i, &w)| if i == 0 { 0.0 } else { rule(w) })
        .collect()
}

/// `λ·Σ|wᵢ|`, gradient `λ·sign(wᵢ)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct L1 {
    arity: usize,
    lambda: f64,
}

impl L1 {
    /// Creates the penalty over `arg_count` parameters.
    pub fn new(arg_count: usize, lambda: f64) -> OptimResult<Self> {
        Ok(Self {
            arity: arg_count,
            lambda: validate(arg_count, lambda)?,
        })
    }
}

impl DifferentiableObjective for L1 {
    fn arity(&self) -> usize {
        self.arity
    }

    fn evaluate(&mut self, point: &[f64]) -> OptimResult<f64> {
        check_dimension(self.arity, point.len())?;
        Ok(self.lambda * point[1..].iter().map(|w| w.abs()).sum::<f64>())
    }

    fn gradient_at(&mut self, point: &[f64]) -> OptimResult<Vec<f64>> {
        check_dimension(self.arity, point.len())?;
        Ok(penalty_gradient(point, |w| self.lambda * sign(w)))
    }
}

/// `λ·Σwᵢ²/2`, gradient `λ·wᵢ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct L2 {
    arity: usize,
    lambda: f64,
}

impl L2 {
    /// Creates the penalty over `arg_count` parameters.
    pub fn new(arg_count: usize, lambda: f64) -> OptimResult<Self> {
        Ok(Self {
            arity: arg_count,
            lambda: validate(arg_count, lambda)?,
        })
    }
}

impl DifferentiableObjective for L2 {
    fn arity(&self) -> usize {
        self.arity
    }

    fn evaluate(&mut self, point: &[f64]) -> OptimResult<f64> {
        check_dimension(self.arity, point.len())?;
        Ok(self.lambda * point[1..].iter().map(|w| w * w).sum::<f64>() / 2.0)
    }

    fn gradient_at(&mut self, point: &[f64]) -> OptimResult<Vec<f64>> {
        check_dimension(self.arity, point.len())?;
        Ok(penalty_gradient(point, |w| self.lambda * w))
    }
}

/// `λ·Σ(wᵢ² + |wᵢ|)/2`, gradient `λ·wᵢ·sign(wᵢ)`.
///
/// The gradient rule is `λ·|wᵢ|`, not the exact derivative
/// `λ·(wᵢ + sign(wᵢ))/2` of the value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Elastic {
    arity: usize,
    lambda: f64,
}

impl Elastic {
    /// Creates the penalty over `arg_count` parameters.
    pub fn new(arg_count: usize, lambda: f64) -> OptimResult<Self> {
        Ok(Self {
            arity: arg_count,
            lambda: validate(arg_count, lambda)?,
        })
    }
}

impl DifferentiableObjective for Elastic {
    fn arity(&self) -> usize {
        self.arity
    }

    fn evaluate(&mut self, point: &[f64]) -> OptimResult<f64> {
        check_dimension(self.arity, point.len())?;
        Ok(self.lambda * point[1..].iter().map(|w| w * w + w.abs()).sum::<f64>() / 2.0)
    }

    fn gradient_at(&mut self, point: &[f64]) -> OptimResult<Vec<f64>> {
        check_dimension(self.arity, point.len())?;
        Ok(penalty_gradient(point, |w| self.lambda * w * sign(w)))
    }
}

/// Zero penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoRegularization {
    arity: usize,
}

impl NoRegularization {
    /// Creates a zero penalty over `arg_count` parameters.
    pub fn new(arg_count: usize) -> Self {
        Self { arity: arg_count }
    }
}

impl DifferentiableObjective for NoRegularization {
    fn arity(&self) -> usize {
        self.arity
    }

    fn evaluate(&mut self, point: &[f64]) -> OptimResult<f64> {
        check_dimension(self.arity, point.len())?;
        Ok(0.0)
    }

    fn gradient_at(&mut self, point: &[f64]) -> OptimResult<Vec<f64>> {
        check_dimension(self.arity, point.len())?;
        Ok(vec![0.0; self.arity])
    }
}
