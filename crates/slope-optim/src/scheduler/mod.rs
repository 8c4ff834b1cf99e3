//! Step-size schedulers.
//!
//! A scheduler returns the learning rate for the current iteration:
//!
//! - [`Constant`]: a fixed step
//! - [`ExponentialDecay`]: `step0 · exp(−λ·k)`
//! - [`PolynomialDecay`]: `(k + 1)^(−1/2) · (β·k + 1)^(−α)`
//! - [`Dichotomy`]: exact line search by quarter-point bisection
//! - [`GoldenRatio`]: exact line search by golden-section search
//!
//! # Choosing a Scheduler
//!
//! | Scheduler | Probes per step | Adapts to the objective |
//! |-----------|-----------------|-------------------------|
//! | Constant | 0 | No |
//! | Exponential decay | 0 | No |
//! | Polynomial decay | 0 | No |
//! | Dichotomy | ~2 per round + gradient | Yes |
//! | Golden ratio | 1 per round + gradient | Yes |
//!
//! The line-search schedulers minimize `|φ(t)|` over `[−indent, indent]`,
//! where `φ` is the [`CrossSection`](crate::function::CrossSection) through
//! the current point. Minimizing the absolute value lets them pick steps that
//! approach a zero crossing as well as a minimum.

mod decay;
mod segment;

pub use decay::{Constant, ExponentialDecay, PolynomialDecay};
pub use segment::{Dichotomy, GoldenRatio};

use std::collections::BTreeMap;

use crate::error::{require_positive, OptimError, OptimResult};
use crate::function::DifferentiableObjective;

/// Named scheduler parameters, for reporting.
pub type Hyperparameters = BTreeMap<String, f64>;

/// Default bracket half-width for line searches.
pub const DEFAULT_INDENT: f64 = 1.0;

/// Default number of bracket refinements for line searches.
pub const DEFAULT_SEGMENT_ITERATIONS: u32 = 32;

/// Computes the step size for each iteration.
pub trait StepScheduler {
    /// Step size at `point` on iteration `iteration` (0-based).
    fn step_value(
        &self,
        point: &[f64],
        iteration: usize,
        objective: &mut dyn DifferentiableObjective,
    ) -> OptimResult<f64>;

    /// Construction parameters, by name.
    fn hyperparameters(&self) -> Hyperparameters;

    /// Short identifier for reporting.
    fn name(&self) -> &'static str;
}

impl<S: StepScheduler + ?Sized> StepScheduler for Box<S> {
    fn step_value(
        &self,
        point: &[f64],
        iteration: usize,
        objective: &mut dyn DifferentiableObjective,
    ) -> OptimResult<f64> {
        (**self).step_value(point, iteration, objective)
    }

    fn hyperparameters(&self) -> Hyperparameters {
        (**self).hyperparameters()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Bracket settings shared by the line-search schedulers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentConfig {
    /// Half-width of the symmetric search interval `[−indent, indent]`.
    pub indent: f64,
    /// Number of bracket refinements.
    pub iterations: u32,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            iterations: DEFAULT_SEGMENT_ITERATIONS,
        }
    }
}

impl SegmentConfig {
    /// Creates a segment configuration.
    #[must_use]
    pub fn new(indent: f64, iterations: u32) -> Self {
        Self { indent, iterations }
    }

    /// Sets the bracket half-width.
    #[must_use]
    pub fn with_indent(mut self, indent: f64) -> Self {
        self.indent = indent;
        self
    }

    /// Sets the number of refinements.
    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Checks that the bracket is non-degenerate and refined at least once.
    pub fn validate(&self) -> OptimResult<()> {
        require_positive("segment indent", self.indent)?;
        if self.iterations == 0 {
            return Err(OptimError::invalid_configuration(
                "segment iterations must be at least 1",
            ));
        }
        Ok(())
    }

    pub(crate) fn hyperparameters(&self) -> Hyperparameters {
        Hyperparameters::from([
            ("indent".to_string(), self.indent),
            ("iterations".to_string(), f64::from(self.iterations)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::DerivableFunction;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_segment_config() {
        let config = SegmentConfig::default().with_indent(5.0).with_iterations(10);

        assert!((config.indent - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.iterations, 10);
        assert!(config.validate().is_ok());

        assert!(SegmentConfig::new(0.0, 10).validate().is_err());
        assert!(SegmentConfig::new(1.0, 0).validate().is_err());
    }

    #[test]
    fn test_boxed_schedulers_share_interface() {
        let schedulers: Vec<Box<dyn StepScheduler>> = vec![
            Box::new(Constant::new(0.25).unwrap()),
            Box::new(ExponentialDecay::new(0.25, 0.1).unwrap()),
            Box::new(PolynomialDecay::new(0.5, 1.0).unwrap()),
            Box::new(Dichotomy::new(SegmentConfig::default()).unwrap()),
            Box::new(GoldenRatio::new(SegmentConfig::default()).unwrap()),
        ];
        let names: Vec<_> = schedulers.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec!["constant", "exponential_decay", "polynomial_decay", "dichotomy", "golden_ratio"]
        );

        let mut f = DerivableFunction::new(|p: &[f64]| p[0] * p[0]).with_partial(|p: &[f64]| 2.0 * p[0]);
        for scheduler in &schedulers {
            let step = scheduler.step_value(&[1.0], 0, &mut f).unwrap();
            assert!(step.is_finite());
        }

        // exact line search on x^2 from x=1 lands on t = 0.5
        assert_abs_diff_eq!(
            schedulers[3].step_value(&[1.0], 0, &mut f).unwrap(),
            0.5,
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(
            schedulers[4].step_value(&[1.0], 0, &mut f).unwrap(),
            0.5,
            epsilon = 1e-6
        );
    }
}
