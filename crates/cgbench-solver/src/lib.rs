//! Fork-join parallel Conjugate Gradient benchmark solver.
//!
//! Solves `A x = b` for the implicit `n x n` matrix with `2` on the diagonal
//! and `1` everywhere else, using plain Conjugate Gradient. Every vector loop
//! (dot products, the mat-vec, the elementwise updates) runs as a fork-join
//! region on one shared [`WorkerPool`](pool::WorkerPool).
//!
//! # Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`pool`] | worker pool, block partition, parallel-for and reduction |
//! | [`vector_ops`] | `dot`, `norm2`, fused CG vector updates |
//! | [`matvec`] | [`ImplicitMatrix`](matvec::ImplicitMatrix) and its kernels |
//! | [`cg`] | [`ConjugateGradientSolver`](cg::ConjugateGradientSolver) |
//! | [`problem`] | benchmark right-hand sides and initial guesses |
//!
//! # Example
//!
//! ```rust
//! use cgbench_solver::cg::ConjugateGradientSolver;
//! use cgbench_solver::matvec::{ImplicitMatrix, MatVecKernel};
//! use cgbench_solver::pool::WorkerPool;
//! use cgbench_solver::problem::Variant;
//! use cgbench_solver::types::{SolveStatus, SolverConfig};
//!
//! let pool = WorkerPool::new(Some(2)).unwrap();
//! let matrix = ImplicitMatrix::new(64, MatVecKernel::Naive);
//! let rhs = Variant::AllEqual.build_rhs(&pool, &matrix);
//!
//! let solver = ConjugateGradientSolver::new(SolverConfig::default());
//! let report = solver.solve(&pool, &matrix, &rhs).unwrap();
//!
//! assert_eq!(report.status, SolveStatus::Converged);
//! assert!(report.relative_residual <= 1e-5);
//! assert!(report.solution.iter().all(|&x| (x - 1.0).abs() < 1e-6));
//! ```

pub mod cg;
pub mod error;
pub mod events;
pub mod matvec;
pub mod pool;
pub mod problem;
pub mod types;
pub mod validation;
pub mod vector_ops;

pub use cg::ConjugateGradientSolver;
pub use error::{SolverError, ValidationError};
pub use matvec::{ImplicitMatrix, MatVecKernel};
pub use pool::WorkerPool;
pub use types::{SolveReport, SolveStatus, SolverConfig};
