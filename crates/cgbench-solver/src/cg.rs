//! Conjugate Gradient solver for the implicit benchmark system.
//!
//! Solves `A x = b` where `A` is the [`ImplicitMatrix`] (2 on the diagonal,
//! 1 elsewhere). Every vector loop runs as a fork-join region on the caller's
//! [`WorkerPool`]; one region finishes before the next begins.
//!
//! # Algorithm
//!
//! Plain, unpreconditioned CG:
//!
//! ```text
//! r = b - A*x
//! z = r
//!
//! while ||r|| / ||b|| > eps and k < max_iterations:
//!     Az     = A * z
//!     rr     = r . r
//!     denom  = Az . z            (stop, Diverged, if 0)
//!     alpha  = rr / denom
//!     x      = x + alpha * z
//!     r_new  = r - alpha * Az
//!     rr_new = r_new . r_new     (stop, Converged, if rr was 0)
//!     beta   = rr_new / rr
//!     z      = r_new + beta * z
//!     r      = r_new
//!     k     += 1
//! ```
//!
//! `||b||` is replaced by `1` when `b = 0`, so the relative residual is
//! always defined.
//!
//! # Convergence
//!
//! `A = I + 1 1^T` has only two distinct eigenvalues (`1` and `n + 1`), so in
//! exact arithmetic CG terminates in at most two iterations. Without restarts
//! or preconditioning, CG can lose orthogonality of its search directions on
//! ill-conditioned systems; the benchmark matrix has condition number `n + 1`
//! and is not affected.

use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::error::SolverError;
use crate::events::SolverEvent;
use crate::matvec::ImplicitMatrix;
use crate::pool::WorkerPool;
use crate::types::{ConvergenceInfo, SolveReport, SolveStatus, SolverConfig};
use crate::validation::validate_system;
use crate::vector_ops::{dot, norm2, residual, update_direction, update_solution};

// ═══════════════════════════════════════════════════════════════════════════
// Iteration state
// ═══════════════════════════════════════════════════════════════════════════

/// Outcome of a single CG step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// `x`, `r` and `z` were updated; the iteration counter advanced.
    Advanced,
    /// `z . Az == 0`: no progress is possible along `z`.
    DegenerateDirection,
    /// `r . r == 0`: the residual is exactly zero, `beta` would be NaN.
    ResidualVanished,
}

/// Working vectors and scalars carried across CG iterations.
///
/// Every vector is owned here and never aliased.
#[derive(Debug)]
struct CgState {
    x: Vec<f64>,
    r: Vec<f64>,
    z: Vec<f64>,
    r_new: Vec<f64>,
    az: Vec<f64>,
    b_norm: f64,
    iterations: usize,
    relative_residual: f64,
}

impl CgState {
    /// INIT: `r = b - A x0`, `z = r`, relative residual of `x0`.
    fn init(pool: &WorkerPool, matrix: &ImplicitMatrix, rhs: &[f64], x0: Vec<f64>) -> Self {
        let n = matrix.dim();

        let mut ax = vec![0.0f64; n];
        matrix.apply(pool, &x0, &mut ax);

        let mut r = vec![0.0f64; n];
        residual(pool, rhs, &ax, &mut r);
        let z = r.clone();

        let mut b_norm = norm2(pool, rhs);
        if b_norm == 0.0 {
            b_norm = 1.0;
        }
        let relative_residual = norm2(pool, &r) / b_norm;

        // Ax is dead from here on; reuse its storage for Az.
        Self {
            x: x0,
            r,
            z,
            r_new: vec![0.0f64; n],
            az: ax,
            b_norm,
            iterations: 0,
            relative_residual,
        }
    }

    /// One ITERATING step.
    ///
    /// `probe` sees the freshly computed `z . Az` and returns the value the
    /// step actually uses.
    fn step(
        &mut self,
        pool: &WorkerPool,
        matrix: &ImplicitMatrix,
        probe: &mut dyn FnMut(usize, f64) -> f64,
    ) -> Step {
        matrix.apply(pool, &self.z, &mut self.az);

        let rr = dot(pool, &self.r, &self.r);
        let denom = probe(self.iterations, dot(pool, &self.az, &self.z));
        if denom == 0.0 {
            return Step::DegenerateDirection;
        }

        let alpha = rr / denom;
        update_solution(
            pool,
            alpha,
            &self.z,
            &self.az,
            &self.r,
            &mut self.x,
            &mut self.r_new,
        );

        let rr_new = dot(pool, &self.r_new, &self.r_new);
        if rr == 0.0 {
            self.relative_residual = rr_new.sqrt() / self.b_norm;
            return Step::ResidualVanished;
        }

        let beta = rr_new / rr;
        update_direction(pool, beta, &self.r_new, &mut self.z, &mut self.r);

        self.iterations += 1;
        self.relative_residual = rr_new.sqrt() / self.b_norm;

        trace!(
            iteration = self.iterations,
            alpha,
            beta,
            relative_residual = self.relative_residual,
            "CG step"
        );

        Step::Advanced
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// ConjugateGradientSolver
// ═══════════════════════════════════════════════════════════════════════════

/// Conjugate Gradient solver.
///
/// Stores only the configuration; every solve allocates its own state, so one
/// solver can be reused across problems and pools.
#[derive(Debug, Clone, Default)]
pub struct ConjugateGradientSolver {
    config: SolverConfig,
}

impl ConjugateGradientSolver {
    /// Create a solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    #[inline]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve `A x = b` starting from `x0 = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidInput`] if `rhs` does not match the
    /// matrix dimension, contains non-finite values, or the configuration is
    /// out of range. Numerical outcomes are reported in
    /// [`SolveReport::status`], never as errors.
    pub fn solve(
        &self,
        pool: &WorkerPool,
        matrix: &ImplicitMatrix,
        rhs: &[f64],
    ) -> Result<SolveReport, SolverError> {
        self.solve_with_guess(pool, matrix, rhs, &vec![0.0; matrix.dim()])
    }

    /// Solve `A x = b` starting from a caller-supplied `x0`.
    pub fn solve_with_guess(
        &self,
        pool: &WorkerPool,
        matrix: &ImplicitMatrix,
        rhs: &[f64],
        x0: &[f64],
    ) -> Result<SolveReport, SolverError> {
        self.run(pool, matrix, rhs, x0, &mut |_, denom| denom, &mut |_| {})
    }

    /// Like [`solve_with_guess`](Self::solve_with_guess), with `probe` able to
    /// replace the step denominator `z . Az` before it is checked for zero.
    ///
    /// `probe(iteration, denom)` receives the number of completed iterations
    /// and the computed value. This is the only way to reach the
    /// degenerate-direction exit on an SPD matrix.
    pub fn solve_with_probe<P>(
        &self,
        pool: &WorkerPool,
        matrix: &ImplicitMatrix,
        rhs: &[f64],
        x0: &[f64],
        mut probe: P,
    ) -> Result<SolveReport, SolverError>
    where
        P: FnMut(usize, f64) -> f64,
    {
        self.run(pool, matrix, rhs, x0, &mut probe, &mut |_| {})
    }

    /// Like [`solve_with_guess`](Self::solve_with_guess), reporting progress
    /// to `observer`.
    pub fn solve_observed<O>(
        &self,
        pool: &WorkerPool,
        matrix: &ImplicitMatrix,
        rhs: &[f64],
        x0: &[f64],
        mut observer: O,
    ) -> Result<SolveReport, SolverError>
    where
        O: FnMut(&SolverEvent),
    {
        self.run(pool, matrix, rhs, x0, &mut |_, denom| denom, &mut observer)
    }

    fn run(
        &self,
        pool: &WorkerPool,
        matrix: &ImplicitMatrix,
        rhs: &[f64],
        x0: &[f64],
        probe: &mut dyn FnMut(usize, f64) -> f64,
        observer: &mut dyn FnMut(&SolverEvent),
    ) -> Result<SolveReport, SolverError> {
        validate_system(matrix, rhs, x0, &self.config)?;

        let tolerance = self.config.tolerance;
        let max_iterations = self.config.max_iterations;
        let start_time = Instant::now();

        let mut state = CgState::init(pool, matrix, rhs, x0.to_vec());

        debug!(
            "CG: n={}, kernel={}, threads={}, tol={:.2e}, max_iter={}, rel0={:.6e}",
            matrix.dim(),
            matrix.kernel(),
            pool.threads(),
            tolerance,
            max_iterations,
            state.relative_residual,
        );
        observer(&SolverEvent::SolveStarted {
            dimension: matrix.dim(),
            kernel: matrix.kernel(),
            threads: pool.threads(),
            tolerance,
            max_iterations,
            initial_residual: state.relative_residual,
        });

        let mut history = Vec::new();
        if self.config.record_history {
            history.push(ConvergenceInfo {
                iteration: 0,
                relative_residual: state.relative_residual,
            });
        }

        let status = loop {
            if state.relative_residual <= tolerance {
                break SolveStatus::Converged;
            }
            if state.iterations >= max_iterations {
                break SolveStatus::Exhausted;
            }

            match state.step(pool, matrix, probe) {
                Step::Advanced => {
                    if self.config.record_history {
                        history.push(ConvergenceInfo {
                            iteration: state.iterations,
                            relative_residual: state.relative_residual,
                        });
                    }
                    observer(&SolverEvent::IterationCompleted {
                        iteration: state.iterations,
                        relative_residual: state.relative_residual,
                        elapsed: start_time.elapsed(),
                    });
                }
                Step::DegenerateDirection => {
                    warn!(
                        "CG: z.Az = 0 at iteration {}, stopping with rel = {:.6e}",
                        state.iterations, state.relative_residual,
                    );
                    break SolveStatus::Diverged;
                }
                Step::ResidualVanished => {
                    debug!("CG: r.r = 0 at iteration {}", state.iterations);
                    break SolveStatus::Converged;
                }
            }
        };

        let wall_time = start_time.elapsed();

        match status {
            SolveStatus::Exhausted => debug!(
                "CG: non-convergence after {} iterations, rel = {:.6e}",
                state.iterations, state.relative_residual,
            ),
            _ => debug!(
                "CG {status} after {} iterations: rel = {:.6e}, {:?}",
                state.iterations, state.relative_residual, wall_time,
            ),
        }
        observer(&SolverEvent::SolveFinished {
            status,
            iterations: state.iterations,
            relative_residual: state.relative_residual,
            wall_time,
        });

        Ok(SolveReport {
            solution: state.x,
            iterations: state.iterations,
            relative_residual: state.relative_residual,
            status,
            threads: pool.threads(),
            wall_time,
            history,
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════
