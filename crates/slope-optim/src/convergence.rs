//! Break checkers: convergence predicates evaluated once per iteration.
//!
//! A [`BreakChecker`] compares a *check value* across the last iterates:
//!
//! | Check value | Quantity tested | Relative divisor |
//! |-------------|-----------------|------------------|
//! | [`CheckValue::Argument`] | `‖xₖ − xₖ₋₁‖` | `‖xₖ‖ + 1` |
//! | [`CheckValue::Function`] | `|f(xₖ) − f(xₖ₋₁)|` | `|f(xₖ)| + 1` |
//! | [`CheckValue::Gradient`] | `‖∇f(xₖ)‖²` | `‖∇f(xₖ)‖² + 1` |
//!
//! The absolute variant stops once the quantity is below `epsilon`, the
//! relative one once it is below `epsilon · divisor`. Because every divisor
//! is at least 1, a relative checker never fires later than its absolute twin.
//!
//! The gradient-relative test scales the squared norm by itself, so
//! `s < ε·(s + 1)` reduces to the fixed threshold `s < ε / (1 − ε)`; it does
//! not adapt to the gradient's scale.

use crate::error::{require_positive, OptimResult};
use crate::function::DifferentiableObjective;
use crate::result::Trajectory;
use crate::vector::{distance, norm, squared_norm};

/// Decides whether the descent loop should stop.
pub trait ConvergenceCheck {
    /// Returns true once the run has converged.
    ///
    /// `objective` is the one being optimized; checkers on function values
    /// or gradients evaluate it.
    fn is_done(
        &self,
        trajectory: &Trajectory,
        objective: &mut dyn DifferentiableObjective,
    ) -> OptimResult<bool>;

    /// Short identifier for reporting.
    fn name(&self) -> &'static str;
}

impl<C: ConvergenceCheck + ?Sized> ConvergenceCheck for Box<C> {
    fn is_done(
        &self,
        trajectory: &Trajectory,
        objective: &mut dyn DifferentiableObjective,
    ) -> OptimResult<bool> {
        (**self).is_done(trajectory, objective)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Quantity a [`BreakChecker`] watches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckValue {
    /// Distance between the last two iterates.
    Argument,
    /// Change in objective value between the last two iterates.
    Function,
    /// Squared gradient norm at the last iterate.
    Gradient,
}

impl CheckValue {
    /// Points the base rule needs before it can say anything.
    fn required_points(self) -> usize {
        match self {
            CheckValue::Argument | CheckValue::Function => 2,
            CheckValue::Gradient => 0,
        }
    }
}

/// Absolute or scale-relative threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tolerance {
    /// Compare against `epsilon`.
    Absolute,
    /// Compare against `epsilon · (scale + 1)`.
    Relative,
}

/// Threshold checker on argument, function value or gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakChecker {
    epsilon: f64,
    value: CheckValue,
    tolerance: Tolerance,
}

impl BreakChecker {
    /// Creates a checker. `epsilon` must be positive.
    pub fn new(value: CheckValue, tolerance: Tolerance, epsilon: f64) -> OptimResult<Self> {
        Ok(Self {
            epsilon: require_positive("break checker epsilon", epsilon)?,
            value,
            tolerance,
        })
    }

    /// Stops when consecutive iterates are closer than `epsilon`.
    pub fn argument_absolute(epsilon: f64) -> OptimResult<Self> {
        Self::new(CheckValue::Argument, Tolerance::Absolute, epsilon)
    }

    /// Stops when consecutive iterates are closer than `epsilon · (‖xₖ‖ + 1)`.
    pub fn argument_relative(epsilon: f64) -> OptimResult<Self> {
        Self::new(CheckValue::Argument, Tolerance::Relative, epsilon)
    }

    /// Stops when consecutive objective values differ by less than `epsilon`.
    pub fn function_absolute(epsilon: f64) -> OptimResult<Self> {
        Self::new(CheckValue::Function, Tolerance::Absolute, epsilon)
    }

    /// Stops when consecutive values differ by less than `epsilon · (|f(xₖ)| + 1)`.
    pub fn function_relative(epsilon: f64) -> OptimResult<Self> {
        Self::new(CheckValue::Function, Tolerance::Relative, epsilon)
    }

    /// Stops when `‖∇f(xₖ)‖² < epsilon`.
    pub fn gradient_absolute(epsilon: f64) -> OptimResult<Self> {
        Self::new(CheckValue::Gradient, Tolerance::Absolute, epsilon)
    }

    /// Stops when `‖∇f(xₖ)‖² < epsilon · (‖∇f(xₖ)‖² + 1)`.
    pub fn gradient_relative(epsilon: f64) -> OptimResult<Self> {
        Self::new(CheckValue::Gradient, Tolerance::Relative, epsilon)
    }

    /// The threshold.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// What is being compared.
    pub fn check_value(&self) -> CheckValue {
        self.value
    }

    /// Absolute or relative.
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Minimum trajectory length before the checker can fire.
    ///
    /// A relative comparison needs the latest point for its divisor, so the
    /// requirement is raised to at least one.
    pub fn required_points(&self) -> usize {
        let base = self.value.required_points();
        match self.tolerance {
            Tolerance::Absolute => base,
            Tolerance::Relative => base.max(1),
        }
    }

    /// Returns `(quantity, scale)` for the current trajectory.
    fn measure(
        &self,
        trajectory: &Trajectory,
        objective: &mut dyn DifferentiableObjective,
    ) -> OptimResult<(f64, f64)> {
        let last = trajectory.last();
        match self.value {
            CheckValue::Argument => {
                let previous = trajectory.previous().unwrap_or(last);
                Ok((distance(last, previous)?, norm(last)))
            }
            CheckValue::Function => {
                let current = objective.evaluate(last)?;
                let previous = match trajectory.previous() {
                    Some(p) => objective.evaluate(p)?,
                    None => current,
                };
                Ok(((current - previous).abs(), current.abs()))
            }
            CheckValue::Gradient => {
                let squared = squared_norm(&objective.gradient_at(last)?);
                Ok((squared, squared))
            }
        }
    }
}

impl ConvergenceCheck for BreakChecker {
    fn is_done(
        &self,
        trajectory: &Trajectory,
        objective: &mut dyn DifferentiableObjective,
    ) -> OptimResult<bool> {
        if trajectory.len() < self.required_points() {
            return Ok(false);
        }

        let (quantity, scale) = self.measure(trajectory, objective)?;
        let threshold = match self.tolerance {
            Tolerance::Absolute => self.epsilon,
            Tolerance::Relative => self.epsilon * (scale + 1.0),
        };

        Ok(quantity < threshold)
    }

    fn name(&self) -> &'static str {
        match (self.value, self.tolerance) {
            (CheckValue::Argument, Tolerance::Absolute) => "argument_absolute",
            (CheckValue::Argument, Tolerance::Relative) => "argument_relative",
            (CheckValue::Function, Tolerance::Absolute) => "function_absolute",
            (CheckValue::Function, Tolerance::Relative) => "function_relative",
            (CheckValue::Gradient, Tolerance::Absolute) => "gradient_absolute",
            (CheckValue::Gradient, Tolerance::Relative) => "gradient_relative",
        }
    }
}

/// Never signals convergence; runs always go to the iteration limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeverBreak;

impl ConvergenceCheck for NeverBreak {
    fn is_done(
        &self,
        _trajectory: &Trajectory,
        _objective: &mut dyn DifferentiableObjective,
    ) -> OptimResult<bool> {
        Ok(false)
    }

    fn name(&self) -> &'static str {
        "never"
    }
}
