//! # Slope Optim
//!
//! Iterative gradient-based minimization (and maximization) of multivariate
//! objectives, aimed at small experiments: terrain elevation fitting,
//! regression weights, toy analytic functions.
//!
//! This crate provides:
//!
//! - **Functions**: The [`DifferentiableObjective`] abstraction, finite-difference
//!   gradients, cross-sections along the descent ray, and decorators
//!   (negation, call tracking, caching, external samplers)
//! - **Convergence**: Break checkers on argument, function value or gradient norm
//! - **Schedulers**: Step-size strategies, from decay schedules to exact line search
//! - **Optimizer**: The [`GradientOptimizer`] descent loop with optional box bounds
//! - **Stochastic**: Minibatch objectives over a dataset with L1/L2/Elastic penalties
//!
//! ## Example
//!
//! ```rust
//! use slope_optim::prelude::*;
//!
//! let mut sphere = Function::new(2, |p: &[f64]| p[0] * p[0] + p[1] * p[1]);
//! let optimizer = GradientOptimizer::new(
//!     GoldenRatio::new(SegmentConfig::default()).unwrap(),
//!     BreakChecker::argument_absolute(1e-8).unwrap(),
//!     1_000,
//! );
//!
//! let result = optimizer
//!     .optimize(&mut sphere, &RunConfig::default().with_start(vec![10.0, 10.0]))
//!     .unwrap();
//!
//! assert!(!result.aborted());
//! assert!(result.final_point()[0].abs() < 1e-4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::float_cmp)]

pub mod convergence;
pub mod error;
pub mod function;
pub mod optimizer;
pub mod result;
pub mod scheduler;
pub mod stochastic;
pub mod vector;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::convergence::{BreakChecker, CheckValue, ConvergenceCheck, NeverBreak, Tolerance};
    pub use crate::error::{OptimError, OptimResult};
    pub use crate::function::{
        forward_difference, Cached, CrossSection, DerivableFunction, DifferentiableObjective,
        ExternalObjective, FiniteDifference, Function, Negated, Sampler, Tracked,
        DEFAULT_EPSILON,
    };
    pub use crate::optimizer::{GradientOptimizer, RunConfig};
    pub use crate::result::{CallStats, OptimizationResult, Termination, Trajectory};
    pub use crate::scheduler::{
        Constant, Dichotomy, ExponentialDecay, GoldenRatio, Hyperparameters, PolynomialDecay,
        SegmentConfig, StepScheduler,
    };
    pub use crate::stochastic::{
        squared_error_loss, BatchReduction, BatchedObjective, Dataset, Elastic, HyperFunction,
        LinearModel, NoRegularization, Sample, StochasticGradientOptimizer, StochasticOutcome,
        L1, L2,
    };
}

pub use convergence::{BreakChecker, ConvergenceCheck};
pub use error::{OptimError, OptimResult};
pub use function::DifferentiableObjective;
pub use optimizer::{GradientOptimizer, RunConfig};
pub use result::{OptimizationResult, Trajectory};
pub use scheduler::StepScheduler;
