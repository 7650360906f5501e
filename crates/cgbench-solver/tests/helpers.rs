//! Shared test helpers for the cgbench-solver integration test suite.
//!
//! Provides a deterministic random vector generator, the dense O(n^2)
//! reference product, and floating-point comparison utilities.

#![allow(dead_code)]

use cgbench_solver::matvec::ImplicitMatrix;
use cgbench_solver::pool::WorkerPool;

// ---------------------------------------------------------------------------
// Random number generator (simple LCG for deterministic reproducibility)
// ---------------------------------------------------------------------------

/// A minimal linear congruential generator for deterministic test data.
pub struct Lcg {
    state: u64,
}

impl Lcg {
    /// Create a new LCG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Generate the next u64 value.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Generate a uniform f64 in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Generate a uniform f64 in [lo, hi).
    pub fn next_f64_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// Random vector with entries in [-1, 1).
pub fn random_vector(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = Lcg::new(seed);
    (0..n).map(|_| rng.next_f64_range(-1.0, 1.0)).collect()
}

// ---------------------------------------------------------------------------
// Pools
// ---------------------------------------------------------------------------

/// Pool with an explicit worker count.
pub fn pool(threads: usize) -> WorkerPool {
    WorkerPool::new(Some(threads)).expect("worker pool")
}

// ---------------------------------------------------------------------------
// Dense reference
// ---------------------------------------------------------------------------

/// `y = A x` evaluated entry by entry, serially, from [`ImplicitMatrix::entry`].
pub fn dense_apply(matrix: &ImplicitMatrix, x: &[f64]) -> Vec<f64> {
    let n = matrix.dim();
    (0..n)
        .map(|i| (0..n).map(|j| matrix.entry(i, j) * x[j]).sum())
        .collect()
}

/// `r = b - A x` using the dense reference product.
pub fn compute_residual(matrix: &ImplicitMatrix, x: &[f64], rhs: &[f64]) -> Vec<f64> {
    dense_apply(matrix, x)
        .iter()
        .zip(rhs)
        .map(|(ax, b)| b - ax)
        .collect()
}

// ---------------------------------------------------------------------------
// Norms and comparisons
// ---------------------------------------------------------------------------

/// Serial L2 norm.
pub fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// `||a - b|| / max(||b||, 1)`.
pub fn relative_error(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len());
    let diff: Vec<f64> = a.iter().zip(b).map(|(x, y)| x - y).collect();
    l2_norm(&diff) / l2_norm(b).max(1.0)
}

/// Assert elementwise `|a - b| <= rel_tol * max(|a|, |b|, 1)`.
pub fn assert_close(a: &[f64], b: &[f64], rel_tol: f64) {
    assert_eq!(a.len(), b.len(), "length mismatch");
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        let scale = x.abs().max(y.abs()).max(1.0);
        assert!(
            (x - y).abs() <= rel_tol * scale,
            "index {i}: {x} vs {y} (rel_tol {rel_tol})"
        );
    }
}
