//! Progress events emitted during a solve.
//!
//! [`ConjugateGradientSolver::solve_observed`] hands every [`SolverEvent`] to
//! a caller-supplied sink, enabling progress display or structured logs of
//! the iteration without touching the solver loop.
//!
//! [`ConjugateGradientSolver::solve_observed`]: crate::cg::ConjugateGradientSolver::solve_observed

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::matvec::MatVecKernel;
use crate::types::SolveStatus;

/// Events emitted during a solver invocation.
///
/// Events are tagged with `#[serde(tag = "type")]` so they serialise as
/// `{ "type": "SolveStarted", ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SolverEvent {
    /// Initialisation finished; the initial residual is known.
    SolveStarted {
        /// System dimension.
        dimension: usize,
        /// Mat-vec kernel in use.
        kernel: MatVecKernel,
        /// Worker threads in the pool.
        threads: usize,
        /// Target relative residual.
        tolerance: f64,
        /// Iteration cap.
        max_iterations: usize,
        /// `||r_0|| / ||b||`.
        initial_residual: f64,
    },

    /// One iteration of the solver completed.
    IterationCompleted {
        /// Completed iterations so far (1-based).
        iteration: usize,
        /// Current relative residual.
        relative_residual: f64,
        /// Wall time elapsed since the solve began.
        elapsed: Duration,
    },

    /// The solver reached a terminal state.
    SolveFinished {
        /// Terminal state.
        status: SolveStatus,
        /// Total iterations executed.
        iterations: usize,
        /// Final relative residual.
        relative_residual: f64,
        /// Total wall time.
        wall_time: Duration,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialise_with_type_tag() {
        let event = SolverEvent::SolveFinished {
            status: SolveStatus::Exhausted,
            iterations: 3,
            relative_residual: 0.5,
            wall_time: Duration::from_millis(2),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "SolveFinished");
        assert_eq!(json["status"], "exhausted");
        assert_eq!(json["iterations"], 3);

        let back: SolverEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
