//! Property-based tests using proptest
//!
//! These tests verify the algebraic properties of the vector primitives and
//! the implicit matrix for arbitrary inputs.

mod helpers;

use cgbench_solver::matvec::{ImplicitMatrix, MatVecKernel};
use cgbench_solver::vector_ops::{dot, dot_serial, norm2};
use proptest::prelude::*;

use helpers::{assert_close, dense_apply, pool};

// Bounded entries keep squares and sums far from overflow.
fn vector_strategy(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1000.0f64..1000.0f64, 1..=max_len)
}

fn vector_pair_strategy(max_len: usize) -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (1..=max_len).prop_flat_map(|n| {
        (
            prop::collection::vec(-1000.0f64..1000.0f64, n),
            prop::collection::vec(-1000.0f64..1000.0f64, n),
        )
    })
}

fn kernel_strategy() -> impl Strategy<Value = MatVecKernel> {
    prop_oneof![Just(MatVecKernel::Naive), Just(MatVecKernel::RowSum)]
}

proptest! {
    // Property: self dot product and norm are non-negative
    #[test]
    fn test_dot_self_non_negative(v in vector_strategy(200), threads in 1usize..6) {
        let p = pool(threads);
        prop_assert!(dot(&p, &v, &v) >= 0.0);
        prop_assert!(norm2(&p, &v) >= 0.0);
    }

    // Property: norm is zero only for the zero vector
    #[test]
    fn test_norm_zero_iff_zero_vector(v in vector_strategy(64)) {
        let p = pool(2);
        let is_zero = v.iter().all(|&x| x == 0.0);
        prop_assert_eq!(norm2(&p, &v) == 0.0, is_zero);
    }

    // Property: parallel dot agrees with the serial kernel up to reassociation
    #[test]
    fn test_dot_matches_serial((u, v) in vector_pair_strategy(300), threads in 1usize..8) {
        let p = pool(threads);
        let parallel = dot(&p, &u, &v);
        let serial = dot_serial(&u, &v);
        let scale: f64 = u.iter().zip(&v).map(|(a, b)| (a * b).abs()).sum::<f64>().max(1.0);
        prop_assert!((parallel - serial).abs() <= 1e-12 * scale);
    }

    // Property: apply(x)[i] == x[i] + sum(x), checked against the O(n^2) definition
    #[test]
    fn test_apply_matches_definition(x in vector_strategy(120), kernel in kernel_strategy(), threads in 1usize..5) {
        let p = pool(threads);
        let matrix = ImplicitMatrix::new(x.len(), kernel);
        let y = matrix.multiply(&p, &x);
        let reference = dense_apply(&matrix, &x);
        let total: f64 = x.iter().sum();
        let scale: f64 = x.iter().map(|v| v.abs()).sum::<f64>().max(1.0);

        for i in 0..x.len() {
            prop_assert!((y[i] - reference[i]).abs() <= 1e-9 * scale);
            prop_assert!((y[i] - (x[i] + total)).abs() <= 1e-9 * scale);
        }
    }

    // Property: apply is linear
    #[test]
    fn test_apply_is_linear(
        (u, v) in vector_pair_strategy(100),
        a in -10.0f64..10.0,
        b in -10.0f64..10.0,
        kernel in kernel_strategy(),
    ) {
        let p = pool(3);
        let matrix = ImplicitMatrix::new(u.len(), kernel);

        let combo: Vec<f64> = u.iter().zip(&v).map(|(x, y)| a * x + b * y).collect();
        let lhs = matrix.multiply(&p, &combo);

        let au = matrix.multiply(&p, &u);
        let av = matrix.multiply(&p, &v);
        let rhs: Vec<f64> = au.iter().zip(&av).map(|(x, y)| a * x + b * y).collect();

        let scale = (a.abs() + b.abs()) * 1000.0 * u.len() as f64;
        for (l, r) in lhs.iter().zip(&rhs) {
            prop_assert!((l - r).abs() <= 1e-12 * scale.max(1.0));
        }
    }

    // Property: the matrix is symmetric, u . A v == v . A u
    #[test]
    fn test_apply_is_symmetric((u, v) in vector_pair_strategy(80)) {
        let p = pool(2);
        let matrix = ImplicitMatrix::new(u.len(), MatVecKernel::Naive);
        let u_av = dot_serial(&u, &matrix.multiply(&p, &v));
        let v_au = dot_serial(&v, &matrix.multiply(&p, &u));
        let scale = 1e6 * (u.len() * u.len()) as f64;
        prop_assert!((u_av - v_au).abs() <= 1e-12 * scale);
    }
}

#[test]
fn test_kernels_agree_on_large_vector() {
    let p = pool(4);
    let x = helpers::random_vector(2_048, 3);
    let naive = ImplicitMatrix::new(x.len(), MatVecKernel::Naive).multiply(&p, &x);
    let fast = ImplicitMatrix::new(x.len(), MatVecKernel::RowSum).multiply(&p, &x);
    assert_close(&naive, &fast, 1e-9);
}
