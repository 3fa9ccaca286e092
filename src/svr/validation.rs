//! Validation helpers for the ε-SVR backend.
//!
//! This module centralizes the consistency checks used by the option types
//! and the training entry point:
//!
//! - **Option checks**: [`verify_c`], [`verify_epsilon`], [`verify_tol`]
//!   ensure hyperparameters are finite and in range.
//! - **Training data**: [`validate_training_data`] enforces non-empty,
//!   equal-length, finite feature/target vectors.
//! - **Dual state**: [`validate_dual`] checks the shape and finiteness of
//!   multipliers or gradients handed back by the executor.
//!
//! All helpers return domain-specific [`SvrError`] variants.
use crate::svr::errors::{SvrError, SvrResult};
use ndarray::Array1;

/// Validate the regularization constant `C`.
///
/// # Errors
/// Returns [`SvrError::InvalidC`] if `c` is non-finite or ≤ 0.0.
pub fn verify_c(c: f64) -> SvrResult<()> {
    if !c.is_finite() {
        return Err(SvrError::InvalidC { c, reason: "C must be finite." });
    }
    if c <= 0.0 {
        return Err(SvrError::InvalidC { c, reason: "C must be positive." });
    }
    Ok(())
}

/// Validate the tube half-width `ε`.
///
/// Zero is allowed and yields the plain absolute-error loss.
///
/// # Errors
/// Returns [`SvrError::InvalidEpsilon`] if `epsilon` is non-finite or < 0.0.
pub fn verify_epsilon(epsilon: f64) -> SvrResult<()> {
    if !epsilon.is_finite() {
        return Err(SvrError::InvalidEpsilon { epsilon, reason: "Epsilon must be finite." });
    }
    if epsilon < 0.0 {
        return Err(SvrError::InvalidEpsilon { epsilon, reason: "Epsilon must be non-negative." });
    }
    Ok(())
}

/// Validate the KKT stopping tolerance.
///
/// # Errors
/// Returns [`SvrError::InvalidTol`] if `tol` is non-finite or ≤ 0.0.
pub fn verify_tol(tol: f64) -> SvrResult<()> {
    if !tol.is_finite() {
        return Err(SvrError::InvalidTol { tol, reason: "Tolerance must be finite." });
    }
    if tol <= 0.0 {
        return Err(SvrError::InvalidTol { tol, reason: "Tolerance must be positive." });
    }
    Ok(())
}

/// Validate a training sample.
///
/// Checks:
/// - at least one point,
/// - `x.len() == z.len()`,
/// - every feature and target is finite.
///
/// # Errors
/// - [`SvrError::EmptyInput`], [`SvrError::LengthMismatch`], or
///   [`SvrError::NonFiniteInput`] for the first offending element.
pub fn validate_training_data(x: &[f64], z: &[f64]) -> SvrResult<()> {
    if x.is_empty() {
        return Err(SvrError::EmptyInput);
    }
    if x.len() != z.len() {
        return Err(SvrError::LengthMismatch { features: x.len(), targets: z.len() });
    }
    for (index, &value) in x.iter().enumerate() {
        if !value.is_finite() {
            return Err(SvrError::NonFiniteInput { index, value, which: "feature" });
        }
    }
    for (index, &value) in z.iter().enumerate() {
        if !value.is_finite() {
            return Err(SvrError::NonFiniteInput { index, value, which: "target" });
        }
    }
    Ok(())
}

/// Validate a dual vector (multipliers or gradient) against its dimension.
///
/// # Errors
/// - [`SvrError::DualDimMismatch`] if `v.len() != dim`.
/// - [`SvrError::NonFiniteObjective`] if any entry is non-finite.
pub fn validate_dual(v: &Array1<f64>, dim: usize) -> SvrResult<()> {
    if v.len() != dim {
        return Err(SvrError::DualDimMismatch { expected: dim, found: v.len() });
    }
    if let Some(&value) = v.iter().find(|value| !value.is_finite()) {
        return Err(SvrError::NonFiniteObjective { value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn verify_c_rejects_non_positive_and_non_finite() {
        assert!(verify_c(10.0).is_ok());
        assert!(matches!(verify_c(0.0), Err(SvrError::InvalidC { .. })));
        assert!(matches!(verify_c(-1.0), Err(SvrError::InvalidC { .. })));
        assert!(matches!(verify_c(f64::INFINITY), Err(SvrError::InvalidC { .. })));
    }

    #[test]
    fn verify_epsilon_accepts_zero() {
        assert!(verify_epsilon(0.0).is_ok());
        assert!(matches!(verify_epsilon(-0.1), Err(SvrError::InvalidEpsilon { .. })));
        assert!(matches!(verify_epsilon(f64::NAN), Err(SvrError::InvalidEpsilon { .. })));
    }

    #[test]
    fn verify_tol_requires_positive() {
        assert!(verify_tol(1e-3).is_ok());
        assert!(matches!(verify_tol(0.0), Err(SvrError::InvalidTol { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Training-data validation reports the first problem it finds.
    //
    // Given
    // -----
    // - Empty input, mismatched lengths, a NaN feature, an infinite target.
    //
    // Expect
    // ------
    // - `EmptyInput`, `LengthMismatch`, and `NonFiniteInput` with the
    //   offending index and axis.
    fn validate_training_data_reports_first_problem() {
        assert_eq!(validate_training_data(&[], &[]), Err(SvrError::EmptyInput));
        assert_eq!(
            validate_training_data(&[0.0, 1.0], &[1.0]),
            Err(SvrError::LengthMismatch { features: 2, targets: 1 })
        );
        assert!(matches!(
            validate_training_data(&[0.0, f64::NAN], &[1.0, 2.0]),
            Err(SvrError::NonFiniteInput { index: 1, which: "feature", .. })
        ));
        assert!(matches!(
            validate_training_data(&[0.0, 1.0], &[f64::INFINITY, 2.0]),
            Err(SvrError::NonFiniteInput { index: 0, which: "target", .. })
        ));
    }

    #[test]
    fn validate_dual_checks_dimension_and_finiteness() {
        assert!(validate_dual(&array![0.0, 1.0], 2).is_ok());
        assert_eq!(
            validate_dual(&array![0.0], 2),
            Err(SvrError::DualDimMismatch { expected: 2, found: 1 })
        );
        assert!(matches!(
            validate_dual(&array![0.0, f64::NAN], 2),
            Err(SvrError::NonFiniteObjective { .. })
        ));
    }
}
