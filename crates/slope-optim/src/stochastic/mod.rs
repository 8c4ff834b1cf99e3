//! Minibatch stochastic gradient descent over a fixed dataset.
//!
//! - [`HyperFunction`]: a per-sample loss `L(sample, params)` seen as an
//!   objective over `params` once bound to a sample
//! - [`BatchedObjective`]: draws a fresh random batch on every call and
//!   reduces per-sample losses and finite-difference gradients, plus a penalty
//! - [`L1`], [`L2`], [`Elastic`], [`NoRegularization`]: penalties that skip
//!   the bias at index 0
//! - [`StochasticGradientOptimizer`]: runs a [`GradientOptimizer`](crate::GradientOptimizer)
//!   over a batched objective

mod batched;
mod dataset;
mod hyper;
mod model;
mod regularizer;
mod sgd;

pub use batched::{BatchReduction, BatchedObjective};
pub use dataset::{Dataset, Sample};
pub use hyper::{BoundSample, HyperFunction};
pub use model::{squared_error_loss, LinearModel, LossFn};
pub use regularizer::{Elastic, NoRegularization, L1, L2};
pub use sgd::{StochasticGradientOptimizer, StochasticOutcome};
