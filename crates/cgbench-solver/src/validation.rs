//! Input validation for solver operations.
//!
//! All checks run eagerly before any computation begins. Every function
//! returns [`ValidationError`] on failure, which converts into
//! [`SolverError::InvalidInput`](crate::error::SolverError::InvalidInput)
//! via `From`.
//!
//! # Limits
//!
//! | Resource   | Limit        | Constant           |
//! |------------|--------------|--------------------|
//! | Dimension  | 10,000,000   | [`MAX_DIMENSION`]  |
//! | Iterations | 1,000,000    | [`MAX_ITERATIONS`] |

use crate::error::ValidationError;
use crate::matvec::ImplicitMatrix;
use crate::types::SolverConfig;

/// Largest accepted system dimension.
pub const MAX_DIMENSION: usize = 10_000_000;

/// Largest accepted iteration cap.
pub const MAX_ITERATIONS: usize = 1_000_000;

/// Validate solver parameters.
///
/// `tolerance` must be positive and finite; `max_iterations` may be zero
/// (the solve then only reports the initial residual) but not above
/// [`MAX_ITERATIONS`].
pub fn validate_config(config: &SolverConfig) -> Result<(), ValidationError> {
    if !config.tolerance.is_finite() || config.tolerance <= 0.0 {
        return Err(ValidationError::ParameterOutOfRange {
            name: "tolerance".into(),
            value: config.tolerance.to_string(),
            expected: "positive finite value".into(),
        });
    }

    if config.max_iterations > MAX_ITERATIONS {
        return Err(ValidationError::ParameterOutOfRange {
            name: "max_iterations".into(),
            value: config.max_iterations.to_string(),
            expected: format!("<= {MAX_ITERATIONS}"),
        });
    }

    Ok(())
}

/// Validate the system dimension.
pub fn validate_dimension(n: usize) -> Result<(), ValidationError> {
    if n > MAX_DIMENSION {
        return Err(ValidationError::ParameterOutOfRange {
            name: "dimension".into(),
            value: n.to_string(),
            expected: format!("<= {MAX_DIMENSION}"),
        });
    }
    Ok(())
}

/// Validate that `v` has length `n` and only finite entries.
pub fn validate_vector(name: &str, v: &[f64], n: usize) -> Result<(), ValidationError> {
    if v.len() != n {
        return Err(ValidationError::DimensionMismatch(format!(
            "{name} length {} does not match dimension {n}",
            v.len(),
        )));
    }

    if let Some((i, value)) = v.iter().enumerate().find(|(_, x)| !x.is_finite()) {
        return Err(ValidationError::NonFiniteValue(format!(
            "{name}[{i}] = {value}"
        )));
    }

    Ok(())
}

/// Validate a complete solve request.
pub fn validate_system(
    matrix: &ImplicitMatrix,
    rhs: &[f64],
    initial_guess: &[f64],
    config: &SolverConfig,
) -> Result<(), ValidationError> {
    validate_config(config)?;
    validate_dimension(matrix.dim())?;
    validate_vector("rhs", rhs, matrix.dim())?;
    validate_vector("initial guess", initial_guess, matrix.dim())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matvec::MatVecKernel;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&SolverConfig::default()).is_ok());
    }

    #[test]
    fn rejects_bad_tolerance() {
        for tol in [0.0, -1e-5, f64::NAN, f64::INFINITY] {
            let config = SolverConfig::default().with_tolerance(tol);
            let err = validate_config(&config).unwrap_err();
            assert!(
                matches!(err, ValidationError::ParameterOutOfRange { ref name, .. } if name == "tolerance"),
                "tolerance {tol} accepted"
            );
        }
    }

    #[test]
    fn zero_iterations_allowed_but_cap_enforced() {
        assert!(validate_config(&SolverConfig::default().with_max_iterations(0)).is_ok());
        let err = validate_config(&SolverConfig::default().with_max_iterations(MAX_ITERATIONS + 1))
            .unwrap_err();
        assert!(matches!(err, ValidationError::ParameterOutOfRange { .. }));
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = validate_vector("rhs", &[1.0, 2.0], 3).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DimensionMismatch("rhs length 2 does not match dimension 3".into())
        );
    }

    #[test]
    fn rejects_non_finite_entries() {
        let err = validate_vector("rhs", &[1.0, f64::NAN], 2).unwrap_err();
        assert!(matches!(err, ValidationError::NonFiniteValue(ref s) if s.starts_with("rhs[1]")));
    }

    #[test]
    fn rejects_oversized_dimension() {
        assert!(validate_dimension(MAX_DIMENSION).is_ok());
        assert!(validate_dimension(MAX_DIMENSION + 1).is_err());
    }

    #[test]
    fn validate_system_checks_initial_guess() {
        let matrix = ImplicitMatrix::new(2, MatVecKernel::Naive);
        let config = SolverConfig::default();
        assert!(validate_system(&matrix, &[1.0, 1.0], &[0.0, 0.0], &config).is_ok());
        let err = validate_system(&matrix, &[1.0, 1.0], &[0.0], &config).unwrap_err();
        assert!(matches!(err, ValidationError::DimensionMismatch(ref s) if s.starts_with("initial guess")));
    }
}
