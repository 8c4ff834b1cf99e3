//! Exact line search over a symmetric bracket on the cross-section.

use crate::error::OptimResult;
use crate::function::{CrossSection, DifferentiableObjective};
use crate::scheduler::{Hyperparameters, SegmentConfig, StepScheduler};

/// `1/φ`, the golden-section fraction.
const INVERSE_PHI: f64 = 0.618_033_988_749_894_8;

/// Quarter-point bisection on `|φ(t)|`.
///
/// Each round compares the bracket midpoint against its left and right
/// quarter points:
///
/// - left quarter lower: keep the left half
/// - right quarter lower: keep the right half
/// - neither: keep the span between the quarter points
///
/// The bracket halves every round whichever branch is taken, so after `n`
/// rounds the returned midpoint lies within `indent / 2ⁿ` of the minimizer of
/// a unimodal section. This differs from the variant that narrows by 3/4 when
/// the midpoint is kept and by 1/2 on a split. The surviving probe becomes the
/// new midpoint, so a round costs at most two evaluations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dichotomy {
    config: SegmentConfig,
}

impl Dichotomy {
    /// Creates the scheduler, validating the bracket settings.
    pub fn new(config: SegmentConfig) -> OptimResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Runs the search on an existing cross-section and returns the step.
    pub fn search<O>(&self, section: &mut CrossSection<'_, O>) -> OptimResult<f64>
    where
        O: DifferentiableObjective + ?Sized,
    {
        let mut lo = -self.config.indent;
        let mut hi = self.config.indent;
        let mut mid = 0.0;
        let mut at_mid = section.value_at(mid)?.abs();

        for _ in 0..self.config.iterations {
            let quarter = (hi - lo) / 4.0;
            let left = lo + quarter;
            let right = hi - quarter;

            let at_left = section.value_at(left)?.abs();
            if at_left < at_mid {
                hi = mid;
                mid = left;
                at_mid = at_left;
                continue;
            }

            let at_right = section.value_at(right)?.abs();
            if at_right < at_mid {
                lo = mid;
                mid = right;
                at_mid = at_right;
            } else {
                lo = left;
                hi = right;
            }
        }

        tracing::trace!(lo, hi, "dichotomy bracket");
        Ok((lo + hi) / 2.0)
    }
}

impl StepScheduler for Dichotomy {
    fn step_value(
        &self,
        point: &[f64],
        _iteration: usize,
        objective: &mut dyn DifferentiableObjective,
    ) -> OptimResult<f64> {
        let mut section = CrossSection::new(objective, point)?;
        self.search(&mut section)
    }

    fn hyperparameters(&self) -> Hyperparameters {
        self.config.hyperparameters()
    }

    fn name(&self) -> &'static str {
        "dichotomy"
    }
}

/// Golden-section search on `|φ(t)|`.
///
/// Keeps two interior probes at the 0.382 and 0.618 fractions of the
/// bracket; each round drops the side beyond the worse probe and evaluates
/// one new probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoldenRatio {
    config: SegmentConfig,
}

impl GoldenRatio {
    /// Creates the scheduler, validating the bracket settings.
    pub fn new(config: SegmentConfig) -> OptimResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Runs the search on an existing cross-section and returns the step.
    pub fn search<O>(&self, section: &mut CrossSection<'_, O>) -> OptimResult<f64>
    where
        O: DifferentiableObjective + ?Sized,
    {
        let mut lo = -self.config.indent;
        let mut hi = self.config.indent;

        let mut x1 = hi - INVERSE_PHI * (hi - lo);
        let mut x2 = lo + INVERSE_PHI * (hi - lo);
        let mut f1 = section.value_at(x1)?.abs();
        let mut f2 = section.value_at(x2)?.abs();

        for _ in 0..self.config.iterations {
            if f1 < f2 {
                hi = x2;
                x2 = x1;
                f2 = f1;
                x1 = hi - INVERSE_PHI * (hi - lo);
                f1 = section.value_at(x1)?.abs();
            } else {
                lo = x1;
                x1 = x2;
                f1 = f2;
                x2 = lo + INVERSE_PHI * (hi - lo);
                f2 = section.value_at(x2)?.abs();
            }
        }

        tracing::trace!(lo, hi, "golden section bracket");
        Ok((lo + hi) / 2.0)
    }
}

impl StepScheduler for GoldenRatio {
    fn step_value(
        &self,
        point: &[f64],
        _iteration: usize,
        objective: &mut dyn DifferentiableObjective,
    ) -> OptimResult<f64> {
        let mut section = CrossSection::new(objective, point)?;
        self.search(&mut section)
    }

    fn hyperparameters(&self) -> Hyperparameters {
        self.config.hyperparameters()
    }

    fn name(&self) -> &'static str {
        "golden_ratio"
    }
}
