//! Fixed learning-rate schedules. None of these look at the objective.

use crate::error::{require_positive, OptimResult};
use crate::function::DifferentiableObjective;
use crate::scheduler::{Hyperparameters, StepScheduler};

/// A constant step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant {
    step: f64,
}

impl Constant {
    /// Creates a constant schedule. `step` must be positive.
    pub fn new(step: f64) -> OptimResult<Self> {
        Ok(Self {
            step: require_positive("step", step)?,
        })
    }
}

impl StepScheduler for Constant {
    fn step_value(
        &self,
        _point: &[f64],
        _iteration: usize,
        _objective: &mut dyn DifferentiableObjective,
    ) -> OptimResult<f64> {
        Ok(self.step)
    }

    fn hyperparameters(&self) -> Hyperparameters {
        Hyperparameters::from([("step".to_string(), self.step)])
    }

    fn name(&self) -> &'static str {
        "constant"
    }
}

/// `step0 · exp(−λ·k)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialDecay {
    step0: f64,
    lambda: f64,
}

impl ExponentialDecay {
    /// Creates the schedule. Both parameters must be positive.
    pub fn new(step0: f64, lambda: f64) -> OptimResult<Self> {
        Ok(Self {
            step0: require_positive("step0", step0)?,
            lambda: require_positive("lambda", lambda)?,
        })
    }
}

impl StepScheduler for ExponentialDecay {
    fn step_value(
        &self,
        _point: &[f64],
        iteration: usize,
        _objective: &mut dyn DifferentiableObjective,
    ) -> OptimResult<f64> {
        Ok(self.step0 * (-self.lambda * iteration as f64).exp())
    }

    fn hyperparameters(&self) -> Hyperparameters {
        Hyperparameters::from([
            ("step0".to_string(), self.step0),
            ("lambda".to_string(), self.lambda),
        ])
    }

    fn name(&self) -> &'static str {
        "exponential_decay"
    }
}

/// `(k + 1)^(−1/2) · (β·k + 1)^(−α)`.
///
/// `α = 1/2, β = 1` is a reasonable default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolynomialDecay {
    alpha: f64,
    beta: f64,
}

impl PolynomialDecay {
    /// Creates the schedule. Both parameters must be positive.
    pub fn new(alpha: f64, beta: f64) -> OptimResult<Self> {
        Ok(Self {
            alpha: require_positive("alpha", alpha)?,
            beta: require_positive("beta", beta)?,
        })
    }
}

impl StepScheduler for PolynomialDecay {
    fn step_value(
        &self,
        _point: &[f64],
        iteration: usize,
        _objective: &mut dyn DifferentiableObjective,
    ) -> OptimResult<f64> {
        let k = iteration as f64;
        // k is shifted by one so the first iteration is defined
        let h0 = 1.0 / (k + 1.0).sqrt();
        Ok(h0 * (self.beta * k + 1.0).powf(-self.alpha))
    }

    fn hyperparameters(&self) -> Hyperparameters {
        Hyperparameters::from([
            ("alpha".to_string(), self.alpha),
            ("beta".to_string(), self.beta),
        ])
    }

    fn name(&self) -> &'static str {
        "polynomial_decay"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OptimError;
    use crate::function::Function;
    use approx::assert_relative_eq;

    fn first(p: &[f64]) -> f64 {
        p[0]
    }

    fn objective() -> Function<fn(&[f64]) -> f64> {
        Function::new(1, first as fn(&[f64]) -> f64)
    }

    #[test]
    fn test_exponential_decay() {
        let s = ExponentialDecay::new(2.0, 0.5).unwrap();
        let mut f = objective();

        assert_relative_eq!(s.step_value(&[0.0], 0, &mut f).unwrap(), 2.0);
        assert_relative_eq!(
            s.step_value(&[0.0], 4, &mut f).unwrap(),
            2.0 * (-2.0f64).exp()
        );
        assert_eq!(s.hyperparameters()["lambda"], 0.5);
    }

    #[test]
    fn test_polynomial_decay() {
        let s = PolynomialDecay::new(0.5, 1.0).unwrap();
        let mut f = objective();

        assert_relative_eq!(s.step_value(&[0.0], 0, &mut f).unwrap(), 1.0);
        // 1/sqrt(4) * (3 + 1)^-0.5
        assert_relative_eq!(s.step_value(&[0.0], 3, &mut f).unwrap(), 0.25);
    }

    #[test]
    fn test_decay_is_monotone() {
        let s = PolynomialDecay::new(0.5, 2.0).unwrap();
        let mut f = objective();
        let steps: Vec<f64> = (0..20)
            .map(|k| s.step_value(&[0.0], k, &mut f).unwrap())
            .collect();
        assert!(steps.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn test_rejects_non_positive_parameters() {
        assert!(matches!(
            ExponentialDecay::new(1.0, 0.0),
            Err(OptimError::InvalidConfiguration { .. })
        ));
        assert!(ExponentialDecay::new(-1.0, 1.0).is_err());
        assert!(PolynomialDecay::new(0.0, 1.0).is_err());
        assert!(PolynomialDecay::new(1.0, -2.0).is_err());
        assert!(Constant::new(0.0).is_err());
    }
}
