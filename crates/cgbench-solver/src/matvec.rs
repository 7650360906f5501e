//! Matrix-vector product with the implicit benchmark matrix.
//!
//! The matrix `A` has `2` on the diagonal and `1` everywhere else. It is
//! never stored: [`ImplicitMatrix`] only knows its dimension and which kernel
//! evaluates `y = A x`.
//!
//! `A = I + 1 1^T`, so it is symmetric positive definite with eigenvalue
//! `n + 1` on the all-ones vector and `1` on its orthogonal complement.
//! Every row therefore reduces to `y[i] = x[i] + sum_j x[j]`.
//!
//! # Kernels
//!
//! | Kernel | Cost | Form |
//! |--------|------|------|
//! | [`MatVecKernel::Naive`] | O(n^2) | `y[i] = sum_j a_ij x[j]`, straight from the definition |
//! | [`MatVecKernel::RowSum`] | O(n) | `y[i] = x[i] + total`, `total` reduced once |
//!
//! The two kernels associate the additions differently and are not
//! bit-identical; compare them with a relative tolerance.

use serde::{Deserialize, Serialize};

use crate::pool::WorkerPool;
use crate::vector_ops;

/// Diagonal entry of the benchmark matrix.
pub const DIAGONAL: f64 = 2.0;

/// Off-diagonal entry of the benchmark matrix.
pub const OFF_DIAGONAL: f64 = 1.0;

/// How `y = A x` is evaluated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatVecKernel {
    /// Dense double loop over the matrix definition.
    #[default]
    Naive,
    /// Algebraic shortcut through the vector total.
    RowSum,
}

impl std::fmt::Display for MatVecKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatVecKernel::Naive => write!(f, "naive"),
            MatVecKernel::RowSum => write!(f, "row-sum"),
        }
    }
}

/// The `n x n` matrix with `2` on the diagonal and `1` elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImplicitMatrix {
    n: usize,
    kernel: MatVecKernel,
}

impl ImplicitMatrix {
    /// Create the matrix of dimension `n` evaluated with `kernel`.
    pub fn new(n: usize, kernel: MatVecKernel) -> Self {
        Self { n, kernel }
    }

    /// Dimension `n`.
    #[inline]
    pub fn dim(&self) -> usize {
        self.n
    }

    /// Kernel used by [`apply`](Self::apply).
    #[inline]
    pub fn kernel(&self) -> MatVecKernel {
        self.kernel
    }

    /// Entry `A[i][j]`.
    #[inline]
    pub fn entry(&self, i: usize, j: usize) -> f64 {
        if i == j {
            DIAGONAL
        } else {
            OFF_DIAGONAL
        }
    }

    /// `y = A x`, one fork-join region over the output indices.
    ///
    /// Each worker writes only its own block of `y`; `x` is read-shared and
    /// left untouched.
    ///
    /// # Panics
    ///
    /// Panics if `x` or `y` does not have length `n`.
    pub fn apply(&self, pool: &WorkerPool, x: &[f64], y: &mut [f64]) {
        assert_eq!(x.len(), self.n, "apply: x.len()={} != n={}", x.len(), self.n);
        assert_eq!(y.len(), self.n, "apply: y.len()={} != n={}", y.len(), self.n);

        match self.kernel {
            MatVecKernel::Naive => self.apply_naive(pool, x, y),
            MatVecKernel::RowSum => Self::apply_row_sum(pool, x, y),
        }
    }

    /// Allocating form of [`apply`](Self::apply).
    pub fn multiply(&self, pool: &WorkerPool, x: &[f64]) -> Vec<f64> {
        let mut y = vec![0.0; self.n];
        self.apply(pool, x, &mut y);
        y
    }

    fn apply_naive(&self, pool: &WorkerPool, x: &[f64], y: &mut [f64]) {
        pool.for_each_block(y, |range, y_block| {
            for (slot, i) in y_block.iter_mut().zip(range) {
                let mut s = 0.0;
                for (j, &xj) in x.iter().enumerate() {
                    s += self.entry(i, j) * xj;
                }
                *slot = s;
            }
        });
    }

    fn apply_row_sum(pool: &WorkerPool, x: &[f64], y: &mut [f64]) {
        let total = vector_ops::sum(pool, x);
        pool.for_each_block(y, |range, y_block| {
            for (slot, i) in y_block.iter_mut().zip(range) {
                *slot = x[i] + total;
            }
        });
    }
}
