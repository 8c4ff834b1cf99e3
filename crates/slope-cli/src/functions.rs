//! Built-in two-variable test functions.

use clap::ValueEnum;
use slope_optim::function::DerivableFunction;

/// Test functions with analytic gradients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BuiltinFunction {
    /// x² + y², minimum at (0, 0)
    Sphere,
    /// (x − 3)² + (y + 1)², minimum at (3, −1)
    Shifted,
    /// (1 − x)² + 100(y − x²)², minimum at (1, 1)
    Rosenbrock,
    /// (x + 2y − 7)² + (2x + y − 5)², minimum at (1, 3)
    Booth,
}

impl BuiltinFunction {
    /// Number of coordinates.
    pub const ARITY: usize = 2;

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sphere => "sphere",
            Self::Shifted => "shifted",
            Self::Rosenbrock => "rosenbrock",
            Self::Booth => "booth",
        }
    }

    /// Builds the objective.
    pub fn objective(self) -> DerivableFunction {
        match self {
            Self::Sphere => DerivableFunction::new(|p: &[f64]| p[0] * p[0] + p[1] * p[1])
                .with_partial(|p: &[f64]| 2.0 * p[0])
                .with_partial(|p: &[f64]| 2.0 * p[1]),
            Self::Shifted => DerivableFunction::new(|p: &[f64]| (p[0] - 3.0).powi(2) + (p[1] + 1.0).powi(2))
                .with_partial(|p: &[f64]| 2.0 * (p[0] - 3.0))
                .with_partial(|p: &[f64]| 2.0 * (p[1] + 1.0)),
            Self::Rosenbrock => {
                DerivableFunction::new(|p: &[f64]| (1.0 - p[0]).powi(2) + 100.0 * (p[1] - p[0] * p[0]).powi(2))
                    .with_partial(|p: &[f64]| -2.0 * (1.0 - p[0]) - 400.0 * p[0] * (p[1] - p[0] * p[0]))
                    .with_partial(|p: &[f64]| 200.0 * (p[1] - p[0] * p[0]))
            }
            Self::Booth => {
                DerivableFunction::new(|p: &[f64]| (p[0] + 2.0 * p[1] - 7.0).powi(2) + (2.0 * p[0] + p[1] - 5.0).powi(2))
                    .with_partial(|p: &[f64]| 2.0 * (p[0] + 2.0 * p[1] - 7.0) + 4.0 * (2.0 * p[0] + p[1] - 5.0))
                    .with_partial(|p: &[f64]| 4.0 * (p[0] + 2.0 * p[1] - 7.0) + 2.0 * (2.0 * p[0] + p[1] - 5.0))
            }
        }
    }
}
