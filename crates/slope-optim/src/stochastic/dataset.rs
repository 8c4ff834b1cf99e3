//! Read-only training data.

use serde::Serialize;

use crate::error::{OptimError, OptimResult};

/// One record: a feature vector and its target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    /// Feature values.
    pub features: Vec<f64>,
    /// Observed target.
    pub target: f64,
}

impl Sample {
    /// Creates a sample.
    pub fn new(features: Vec<f64>, target: f64) -> Self {
        Self { features, target }
    }
}

/// A non-empty sequence of samples sharing one feature width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    /// Validates and wraps `samples`.
    pub fn new(samples: Vec<Sample>) -> OptimResult<Self> {
        let Some(first) = samples.first() else {
            return Err(OptimError::invalid_configuration("dataset is empty"));
        };

        let width = first.features.len();
        if let Some(bad) = samples.iter().find(|s| s.features.len() != width) {
            return Err(OptimError::dimension_mismatch(width, bad.features.len()));
        }

        Ok(Self { samples })
    }

    /// Builds a dataset from `(features, target)` pairs.
    pub fn from_pairs<I>(pairs: I) -> OptimResult<Self>
    where
        I: IntoIterator<Item = (Vec<f64>, f64)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(features, target)| Sample::new(features, target))
                .collect(),
        )
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed dataset.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of features per sample.
    pub fn feature_count(&self) -> usize {
        self.samples[0].features.len()
    }

    /// All samples, in order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// The sample at `index`.
    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }
}
