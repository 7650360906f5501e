//! Core types for the CG benchmark.
//!
//! Provides the solver configuration, the terminal [`SolveStatus`], and the
//! [`SolveReport`] returned by every solve.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Problem dimension of the standard benchmark run.
pub const DEFAULT_DIMENSION: usize = 12_288;

/// Relative residual threshold of the standard benchmark run.
pub const DEFAULT_TOLERANCE: f64 = 1e-5;

/// Iteration cap of the standard benchmark run.
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

// ---------------------------------------------------------------------------
// SolverConfig
// ---------------------------------------------------------------------------

/// Parameters of a CG solve.
///
/// The defaults describe the standard benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// The solver stops once `||r|| / ||b|| <= tolerance`.
    pub tolerance: f64,
    /// Maximum number of CG iterations.
    pub max_iterations: usize,
    /// Keep a per-iteration [`ConvergenceInfo`] trail in the report.
    pub record_history: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            record_history: false,
        }
    }
}

impl SolverConfig {
    /// Set the relative residual tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Enable or disable the convergence history.
    pub fn with_history(mut self, record_history: bool) -> Self {
        self.record_history = record_history;
        self
    }
}

// ---------------------------------------------------------------------------
// Solve outcome
// ---------------------------------------------------------------------------

/// Terminal state of a CG run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveStatus {
    /// `relative_residual <= tolerance`, or the residual vanished exactly.
    Converged,
    /// The search direction became degenerate (`z . Az == 0`).
    Diverged,
    /// The iteration cap was reached first.
    Exhausted,
}

impl SolveStatus {
    /// `true` only for [`SolveStatus::Converged`].
    #[inline]
    pub fn is_converged(self) -> bool {
        matches!(self, SolveStatus::Converged)
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveStatus::Converged => write!(f, "converged"),
            SolveStatus::Diverged => write!(f, "diverged"),
            SolveStatus::Exhausted => write!(f, "exhausted"),
        }
    }
}

/// Per-iteration convergence snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceInfo {
    /// Number of completed iterations (0 is the initial residual).
    pub iteration: usize,
    /// `||r|| / ||b||` after that iteration.
    pub relative_residual: f64,
}

/// Result of a solver invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveReport {
    /// Final iterate `x`.
    pub solution: Vec<f64>,
    /// Number of completed iterations.
    pub iterations: usize,
    /// Final `||r|| / ||b||` (with `||b||` replaced by 1 when `b = 0`).
    pub relative_residual: f64,
    /// Why the solver stopped.
    pub status: SolveStatus,
    /// Worker threads in the pool that ran the solve.
    pub threads: usize,
    /// Wall-clock time from initialisation to exit.
    pub wall_time: Duration,
    /// Convergence trail; empty unless [`SolverConfig::record_history`] is set.
    pub history: Vec<ConvergenceInfo>,
}
