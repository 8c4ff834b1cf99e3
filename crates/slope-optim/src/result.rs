//! Trajectories and the outcome of an optimization run.

use serde::Serialize;

use crate::scheduler::Hyperparameters;

/// Ordered, append-only sequence of iterates.
///
/// Never empty: it starts with the initial point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Trajectory {
    points: Vec<Vec<f64>>,
}

impl Trajectory {
    /// Starts a trajectory at `start`.
    pub fn new(start: Vec<f64>) -> Self {
        Self {
            points: vec![start],
        }
    }

    /// Appends an iterate.
    pub fn push(&mut self, point: Vec<f64>) {
        self.points.push(point);
    }

    /// Number of points, including the start.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The most recent iterate.
    pub fn last(&self) -> &[f64] {
        self.points.last().map(Vec::as_slice).unwrap_or_default()
    }

    /// The iterate before the most recent one, if any.
    pub fn previous(&self) -> Option<&[f64]> {
        self.points
            .len()
            .checked_sub(2)
            .map(|i| self.points[i].as_slice())
    }

    /// The initial point.
    pub fn first(&self) -> &[f64] {
        &self.points[0]
    }

    /// All iterates, in order.
    pub fn points(&self) -> &[Vec<f64>] {
        &self.points
    }

    /// Consumes the trajectory, returning its points.
    pub fn into_points(self) -> Vec<Vec<f64>> {
        self.points
    }
}

/// Evaluation and gradient call counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CallStats {
    /// Calls to `evaluate`.
    pub evaluations: usize,
    /// Calls to `gradient_at`.
    pub gradients: usize,
}

impl CallStats {
    /// Sum of both counters.
    pub fn total(&self) -> usize {
        self.evaluations + self.gradients
    }
}

/// Terminal state of the descent loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The break checker signalled convergence.
    Converged,
    /// The iteration limit was reached first.
    Aborted,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::Converged => write!(f, "converged"),
            Termination::Aborted => write!(f, "iteration limit reached"),
        }
    }
}

/// Result of [`GradientOptimizer::optimize`](crate::optimizer::GradientOptimizer::optimize).
///
/// Built once by the optimizer and read-only afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    pub(crate) trajectory: Trajectory,
    pub(crate) aborted: bool,
    pub(crate) hyperparameters: Hyperparameters,
    pub(crate) scheduler: String,
    pub(crate) stats: CallStats,
}

impl OptimizationResult {
    /// Every iterate, starting point first.
    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// True iff the iteration limit was hit before convergence.
    pub fn aborted(&self) -> bool {
        self.aborted
    }

    /// Scheduler hyperparameters, for reporting.
    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyperparameters
    }

    /// Scheduler name.
    pub fn scheduler(&self) -> &str {
        &self.scheduler
    }

    /// Calls made on the objective during the run.
    pub fn stats(&self) -> CallStats {
        self.stats
    }

    /// Consumes the result, returning the trajectory.
    pub fn into_trajectory(self) -> Trajectory {
        self.trajectory
    }

    /// The last iterate.
    pub fn final_point(&self) -> &[f64] {
        self.trajectory.last()
    }

    /// Number of descent steps taken.
    pub fn iterations(&self) -> usize {
        self.trajectory.len() - 1
    }

    /// Converged or aborted.
    pub fn status(&self) -> Termination {
        if self.aborted {
            Termination::Aborted
        } else {
            Termination::Converged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trajectory_accessors() {
        let mut t = Trajectory::new(vec![0.0, 0.0]);
        assert_eq!(t.len(), 1);
        assert!(!t.is_empty());
        assert!(t.previous().is_none());

        t.push(vec![1.0, 1.0]);
        t.push(vec![2.0, 2.0]);

        assert_eq!(t.first(), &[0.0, 0.0]);
        assert_eq!(t.last(), &[2.0, 2.0]);
        assert_eq!(t.previous(), Some(&[1.0, 1.0][..]));
    }

    #[test]
    fn test_result_serializes() {
        let mut trajectory = Trajectory::new(vec![1.0]);
        trajectory.push(vec![0.5]);

        let result = OptimizationResult {
            trajectory,
            aborted: true,
            hyperparameters: Hyperparameters::from([("step".to_string(), 0.5)]),
            scheduler: "constant".to_string(),
            stats: CallStats {
                evaluations: 3,
                gradients: 1,
            },
        };

        assert_eq!(result.iterations(), 1);
        assert_eq!(result.status(), Termination::Aborted);
        assert!(result.aborted());
        assert_eq!(result.scheduler(), "constant");
        assert_eq!(result.stats().total(), 4);
        assert_eq!(result.trajectory().first(), &[1.0]);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["trajectory"], serde_json::json!([[1.0], [0.5]]));
        assert_eq!(json["stats"]["evaluations"], 3);
        assert_eq!(json["hyperparameters"]["step"], 0.5);
    }
}
