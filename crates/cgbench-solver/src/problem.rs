//! Benchmark problem setup.
//!
//! Two right-hand sides with known exact solutions, and the initial guesses
//! the solver can start from.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::matvec::ImplicitMatrix;
use crate::pool::WorkerPool;

/// Which right-hand side to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// `b[i] = n + 1`; exact solution is all ones.
    AllEqual,
    /// `b = A u` with `u[i] = sin(2 pi i / n)`; exact solution is `u`.
    Harmonic,
}

impl Variant {
    /// Map the numeric selector `1` / `2` to a variant.
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            1 => Some(Variant::AllEqual),
            2 => Some(Variant::Harmonic),
            _ => None,
        }
    }

    /// Numeric selector of this variant.
    pub fn index(self) -> u8 {
        match self {
            Variant::AllEqual => 1,
            Variant::Harmonic => 2,
        }
    }

    /// Build `b` for this variant.
    pub fn build_rhs(self, pool: &WorkerPool, matrix: &ImplicitMatrix) -> Vec<f64> {
        let n = matrix.dim();
        match self {
            Variant::AllEqual => vec![(n + 1) as f64; n],
            Variant::Harmonic => matrix.multiply(pool, &sine_wave(n, 1.0)),
        }
    }

    /// The exact solution `x*` of `A x = b` for this variant.
    pub fn exact_solution(self, n: usize) -> Vec<f64> {
        match self {
            Variant::AllEqual => vec![1.0; n],
            Variant::Harmonic => sine_wave(n, 1.0),
        }
    }
}

/// Starting iterate `x0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InitialGuess {
    /// `x0 = 0`.
    #[default]
    Zero,
    /// `x0[i] = sin(4 pi i / n)`, two full periods.
    Harmonic,
}

impl InitialGuess {
    /// Materialise the guess for dimension `n`.
    pub fn build(self, n: usize) -> Vec<f64> {
        match self {
            InitialGuess::Zero => vec![0.0; n],
            InitialGuess::Harmonic => sine_wave(n, 2.0),
        }
    }
}

/// `v[i] = sin(2 pi periods i / n)`.
pub fn sine_wave(n: usize, periods: f64) -> Vec<f64> {
    (0..n)
        .map(|i| (2.0 * periods * PI * i as f64 / n as f64).sin())
        .collect()
}
