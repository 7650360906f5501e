//! Parallel dense vector primitives.
//!
//! Reductions ([`dot`], [`norm2`], [`sum`]) run one serial kernel per pool
//! block and add the partials in block order, see
//! [`WorkerPool::map_reduce`]. The floating-point summation order therefore
//! depends on the thread count: results are reproducible for a fixed thread
//! count but may differ in the last bits between thread counts.
//!
//! The elementwise updates fuse the two vector writes of each CG step into a
//! single parallel region.

use crate::pool::WorkerPool;

// ═══════════════════════════════════════════════════════════════════════════
// Serial kernels
// ═══════════════════════════════════════════════════════════════════════════

/// Serial dot product of two `f64` slices with 4-wide accumulation.
///
/// The four independent accumulators shorten the dependency chain of the
/// inner loop.
#[inline]
pub fn dot_serial(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "dot_serial: length mismatch");

    let n = a.len();
    let chunks = n / 4;
    let remainder = n % 4;

    let mut acc0: f64 = 0.0;
    let mut acc1: f64 = 0.0;
    let mut acc2: f64 = 0.0;
    let mut acc3: f64 = 0.0;

    for i in 0..chunks {
        let j = i * 4;
        acc0 += a[j] * b[j];
        acc1 += a[j + 1] * b[j + 1];
        acc2 += a[j + 2] * b[j + 2];
        acc3 += a[j + 3] * b[j + 3];
    }

    let base = chunks * 4;
    for i in 0..remainder {
        acc0 += a[base + i] * b[base + i];
    }

    (acc0 + acc1) + (acc2 + acc3)
}

/// Serial sum of a slice with 4-wide accumulation.
#[inline]
fn sum_serial(a: &[f64]) -> f64 {
    let mut acc = [0.0f64; 4];
    let mut chunks = a.chunks_exact(4);
    for c in &mut chunks {
        acc[0] += c[0];
        acc[1] += c[1];
        acc[2] += c[2];
        acc[3] += c[3];
    }
    for &v in chunks.remainder() {
        acc[0] += v;
    }
    (acc[0] + acc[1]) + (acc[2] + acc[3])
}

// ═══════════════════════════════════════════════════════════════════════════
// Parallel reductions
// ═══════════════════════════════════════════════════════════════════════════

/// `sum_i u[i] * v[i]`, computed as a fork-join reduction.
///
/// # Panics
///
/// Panics if `u.len() != v.len()`.
pub fn dot(pool: &WorkerPool, u: &[f64], v: &[f64]) -> f64 {
    assert_eq!(u.len(), v.len(), "dot: length mismatch");

    pool.map_reduce(
        u.len(),
        0.0,
        |range| dot_serial(&u[range.clone()], &v[range]),
        |acc, partial| acc + partial,
    )
}

/// Euclidean norm `sqrt(dot(u, u))`.
#[inline]
pub fn norm2(pool: &WorkerPool, u: &[f64]) -> f64 {
    dot(pool, u, u).sqrt()
}

/// `sum_i u[i]`, computed as a fork-join reduction.
pub fn sum(pool: &WorkerPool, u: &[f64]) -> f64 {
    pool.map_reduce(
        u.len(),
        0.0,
        |range| sum_serial(&u[range]),
        |acc, partial| acc + partial,
    )
}

// ═══════════════════════════════════════════════════════════════════════════
// Elementwise updates
// ═══════════════════════════════════════════════════════════════════════════

/// `r[i] = b[i] - ax[i]`.
pub fn residual(pool: &WorkerPool, b: &[f64], ax: &[f64], r: &mut [f64]) {
    assert_eq!(b.len(), ax.len(), "residual: length mismatch");
    assert_eq!(b.len(), r.len(), "residual: length mismatch");

    pool.for_each_block(r, |range, r_block| {
        for (slot, i) in r_block.iter_mut().zip(range) {
            *slot = b[i] - ax[i];
        }
    });
}

/// Solution step of CG: `x[i] += alpha * z[i]` and
/// `r_new[i] = r[i] - alpha * az[i]` in one parallel region.
pub fn update_solution(
    pool: &WorkerPool,
    alpha: f64,
    z: &[f64],
    az: &[f64],
    r: &[f64],
    x: &mut [f64],
    r_new: &mut [f64],
) {
    let n = x.len();
    assert!(
        z.len() == n && az.len() == n && r.len() == n,
        "update_solution: length mismatch"
    );

    pool.for_each_block_pair(x, r_new, |range, x_block, r_new_block| {
        for (k, i) in range.enumerate() {
            x_block[k] += alpha * z[i];
            r_new_block[k] = r[i] - alpha * az[i];
        }
    });
}

/// Direction step of CG: `z[i] = r_new[i] + beta * z[i]` and
/// `r[i] = r_new[i]` in one parallel region.
pub fn update_direction(
    pool: &WorkerPool,
    beta: f64,
    r_new: &[f64],
    z: &mut [f64],
    r: &mut [f64],
) {
    assert_eq!(r_new.len(), z.len(), "update_direction: length mismatch");

    pool.for_each_block_pair(z, r, |range, z_block, r_block| {
        for (k, i) in range.enumerate() {
            z_block[k] = r_new[i] + beta * z_block[k];
            r_block[k] = r_new[i];
        }
    });
}
