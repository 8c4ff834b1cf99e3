//! CLI command implementations.

pub mod fit;
pub mod minimize;

pub use fit::FitArgs;
pub use minimize::MinimizeArgs;

use clap::{Args, ValueEnum};
use slope_optim::prelude::*;

use crate::error::{CliError, CliResult};

/// Parses a comma-separated vector such as `"1.5,-2"`.
pub fn parse_vector(s: &str) -> CliResult<Vec<f64>> {
    s.split(',')
        .map(|part| {
            part.trim().parse::<f64>().map_err(|e| CliError::InvalidVector {
                input: s.to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}

/// Step-size strategy choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchedulerChoice {
    /// Fixed step
    Constant,
    /// step0 · exp(−decay·k)
    Exponential,
    /// (k + 1)^(−1/2) · (β·k + 1)^(−α)
    Polynomial,
    /// Quarter-point bisection line search
    Dichotomy,
    /// Golden-section line search
    Golden,
}

/// Scheduler flags shared by every command.
#[derive(Args, Debug, Clone)]
pub struct SchedulerOptions {
    /// Step-size strategy
    #[arg(long, value_enum, default_value = "golden")]
    pub scheduler: SchedulerChoice,

    /// Step for constant, initial step for exponential
    #[arg(long, default_value = "0.1")]
    pub step: f64,

    /// Exponential decay rate
    #[arg(long, default_value = "0.01")]
    pub decay: f64,

    /// Polynomial decay exponent α
    #[arg(long, default_value = "0.5")]
    pub alpha: f64,

    /// Polynomial decay scale β
    #[arg(long, default_value = "1.0")]
    pub beta: f64,

    /// Line-search bracket half-width
    #[arg(long, default_value = "1.0")]
    pub indent: f64,

    /// Line-search refinements
    #[arg(long, default_value = "32")]
    pub segment_iterations: u32,
}

impl SchedulerOptions {
    /// Builds the configured scheduler.
    pub fn build(&self) -> CliResult<Box<dyn StepScheduler>> {
        let segment = SegmentConfig::new(self.indent, self.segment_iterations);
        let scheduler: Box<dyn StepScheduler> = match self.scheduler {
            SchedulerChoice::Constant => Box::new(Constant::new(self.step)?),
            SchedulerChoice::Exponential => Box::new(ExponentialDecay::new(self.step, self.decay)?),
            SchedulerChoice::Polynomial => Box::new(PolynomialDecay::new(self.alpha, self.beta)?),
            SchedulerChoice::Dichotomy => Box::new(Dichotomy::new(segment)?),
            SchedulerChoice::Golden => Box::new(GoldenRatio::new(segment)?),
        };
        Ok(scheduler)
    }
}

/// Break checker choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CheckerChoice {
    ArgumentAbsolute,
    ArgumentRelative,
    FunctionAbsolute,
    FunctionRelative,
    GradientAbsolute,
    GradientRelative,
    /// Run until the iteration limit
    Never,
}

/// Stopping flags shared by every command.
#[derive(Args, Debug, Clone)]
pub struct CheckerOptions {
    /// Convergence test
    #[arg(long, value_enum, default_value = "argument-absolute")]
    pub checker: CheckerChoice,

    /// Convergence threshold
    #[arg(long, default_value = "1e-8")]
    pub epsilon: f64,

    /// Maximum number of iterations
    #[arg(long, env = "SLOPE_LIMIT", default_value = "1000")]
    pub limit: usize,
}

impl CheckerOptions {
    /// Builds the configured checker.
    pub fn build(&self) -> CliResult<Box<dyn ConvergenceCheck>> {
        let e = self.epsilon;
        let checker: Box<dyn ConvergenceCheck> = match self.checker {
            CheckerChoice::ArgumentAbsolute => Box::new(BreakChecker::argument_absolute(e)?),
            CheckerChoice::ArgumentRelative => Box::new(BreakChecker::argument_relative(e)?),
            CheckerChoice::FunctionAbsolute => Box::new(BreakChecker::function_absolute(e)?),
            CheckerChoice::FunctionRelative => Box::new(BreakChecker::function_relative(e)?),
            CheckerChoice::GradientAbsolute => Box::new(BreakChecker::gradient_absolute(e)?),
            CheckerChoice::GradientRelative => Box::new(BreakChecker::gradient_relative(e)?),
            CheckerChoice::Never => Box::new(NeverBreak),
        };
        Ok(checker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vector() {
        assert_eq!(parse_vector("1.5, -2").unwrap(), vec![1.5, -2.0]);
        assert_eq!(parse_vector("3").unwrap(), vec![3.0]);
        assert!(matches!(parse_vector("1,x"), Err(CliError::InvalidVector { .. })));
        assert!(parse_vector("").is_err());
    }

    #[test]
    fn test_invalid_scheduler_settings_surface() {
        let options = SchedulerOptions {
            scheduler: SchedulerChoice::Constant,
            step: -1.0,
            decay: 0.01,
            alpha: 0.5,
            beta: 1.0,
            indent: 1.0,
            segment_iterations: 32,
        };
        assert!(matches!(options.build(), Err(CliError::Optim(_))));
    }

    #[test]
    fn test_checker_names() {
        let options = CheckerOptions {
            checker: CheckerChoice::GradientRelative,
            epsilon: 1e-6,
            limit: 10,
        };
        assert_eq!(options.build().unwrap().name(), "gradient_relative");
    }
}
