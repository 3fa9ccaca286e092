//! Kernel functions for ε-SVR.
//!
//! This module provides:
//! - A `KernelType` enum with the usual SVM kernels (RBF, linear, polynomial,
//!   sigmoid) evaluated on scalar inputs.
//! - A `Gamma` policy for the kernel coefficient, including the data-driven
//!   `Scale` rule `γ = 1 / (n_features · Var(X))`.
//! - `gram_matrix`, which builds the dense training Gram matrix and rejects
//!   non-finite entries.
//!
//! Conventions:
//! - Inputs are one-dimensional (`n_features = 1`): the standardized time axis.
//! - Kernels are evaluated with an already resolved `γ`; resolution happens once
//!   per fit via [`Gamma::resolve`].
use crate::svr::{
    errors::{SvrError, SvrResult},
    types::KernelMatrix,
};
use ndarray::Array2;
use statrs::statistics::Statistics;

/// Kernel family.
///
/// - `Rbf`: `exp(−γ (x − x')²)`, the default.
/// - `Linear`: `x · x'`.
/// - `Polynomial`: `(γ x x' + coef0)^degree`.
/// - `Sigmoid`: `tanh(γ x x' + coef0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KernelType {
    Rbf,
    Linear,
    Polynomial { degree: u32, coef0: f64 },
    Sigmoid { coef0: f64 },
}

impl Default for KernelType {
    fn default() -> Self {
        KernelType::Rbf
    }
}

impl KernelType {
    /// Polynomial kernel with the conventional defaults `degree = 3`, `coef0 = 0`.
    pub fn polynomial() -> Self {
        KernelType::Polynomial { degree: 3, coef0: 0.0 }
    }

    /// Validate kernel-specific parameters.
    ///
    /// # Errors
    /// - `SvrError::InvalidDegree` if a polynomial degree is zero.
    /// - `SvrError::InvalidCoef0` if an offset is non-finite.
    pub fn validate(&self) -> SvrResult<()> {
        match *self {
            KernelType::Rbf | KernelType::Linear => Ok(()),
            KernelType::Polynomial { degree, coef0 } => {
                if degree == 0 {
                    return Err(SvrError::InvalidDegree { degree });
                }
                if !coef0.is_finite() {
                    return Err(SvrError::InvalidCoef0 { coef0 });
                }
                Ok(())
            }
            KernelType::Sigmoid { coef0 } => {
                if !coef0.is_finite() {
                    return Err(SvrError::InvalidCoef0 { coef0 });
                }
                Ok(())
            }
        }
    }

    /// Evaluate `K(a, b)` with a resolved coefficient `gamma`.
    pub fn eval(&self, a: f64, b: f64, gamma: f64) -> f64 {
        match *self {
            KernelType::Rbf => {
                let diff = a - b;
                (-gamma * diff * diff).exp()
            }
            KernelType::Linear => a * b,
            KernelType::Polynomial { degree, coef0 } => (gamma * a * b + coef0).powi(degree as i32),
            KernelType::Sigmoid { coef0 } => (gamma * a * b + coef0).tanh(),
        }
    }
}

/// Kernel coefficient policy.
///
/// - `Scale`: `γ = 1 / (n_features · Var(X))` using the population variance
///   of the training inputs. On standardized inputs this is `1`.
/// - `Auto`: `γ = 1 / n_features`.
/// - `Value(g)`: fixed `γ = g`, finite and `> 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gamma {
    Scale,
    Auto,
    Value(f64),
}

impl Default for Gamma {
    fn default() -> Self {
        Gamma::Scale
    }
}

impl Gamma {
    /// Validate a fixed coefficient; `Scale` and `Auto` are always valid.
    pub fn validate(&self) -> SvrResult<()> {
        if let Gamma::Value(gamma) = *self {
            if !gamma.is_finite() {
                return Err(SvrError::InvalidGamma { gamma, reason: "Gamma must be finite." });
            }
            if gamma <= 0.0 {
                return Err(SvrError::InvalidGamma { gamma, reason: "Gamma must be positive." });
            }
        }
        Ok(())
    }

    /// Resolve the policy into a concrete `γ` for the given training inputs.
    ///
    /// # Errors
    /// - `SvrError::DegenerateFeatureVariance` if `Scale` is requested and the
    ///   inputs have zero (or non-finite) variance.
    pub fn resolve(&self, x: &[f64]) -> SvrResult<f64> {
        const N_FEATURES: f64 = 1.0;
        match *self {
            Gamma::Scale => {
                let variance = x.iter().population_variance();
                if !(variance.is_finite() && variance > 0.0) {
                    return Err(SvrError::DegenerateFeatureVariance { variance });
                }
                Ok(1.0 / (N_FEATURES * variance))
            }
            Gamma::Auto => Ok(1.0 / N_FEATURES),
            Gamma::Value(gamma) => Ok(gamma),
        }
    }
}

/// Build the dense Gram matrix `K[i, j] = K(x_i, x_j)`.
///
/// # Errors
/// - `SvrError::NonFiniteKernel` for the first non-finite entry (e.g. an
///   overflowing polynomial kernel).
pub fn gram_matrix(kernel: &KernelType, x: &[f64], gamma: f64) -> SvrResult<KernelMatrix> {
    let n = x.len();
    let mut gram = Array2::<f64>::zeros((n, n));
    for i in 0..n {
        for j in i..n {
            let value = kernel.eval(x[i], x[j], gamma);
            if !value.is_finite() {
                return Err(SvrError::NonFiniteKernel { row: i, col: j, value });
            }
            gram[[i, j]] = value;
            gram[[j, i]] = value;
        }
    }
    Ok(gram)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Closed-form values of each kernel family.
    // - `Gamma::resolve` for all policies, including the degenerate path.
    // - Symmetry and diagonal of `gram_matrix`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Check each kernel against its closed form at a fixed pair of inputs.
    //
    // Given
    // -----
    // - `a = 0.5`, `b = -1.0`, `gamma = 2.0`.
    //
    // Expect
    // ------
    // - RBF = exp(-2 · 2.25), linear = -0.5, cubic polynomial with coef0 = 1
    //   = 0^3, sigmoid with coef0 = 0 = tanh(-1).
    fn kernels_match_closed_forms() {
        let (a, b, gamma) = (0.5, -1.0, 2.0);

        assert_relative_eq!(KernelType::Rbf.eval(a, b, gamma), (-4.5f64).exp());
        assert_relative_eq!(KernelType::Linear.eval(a, b, gamma), -0.5);
        assert_relative_eq!(
            KernelType::Polynomial { degree: 3, coef0: 1.0 }.eval(a, b, gamma),
            0.0
        );
        assert_relative_eq!(KernelType::Sigmoid { coef0: 0.0 }.eval(a, b, gamma), (-1.0f64).tanh());
    }

    #[test]
    // Purpose
    // -------
    // `Scale` uses the population variance; `Auto` and `Value` ignore the data.
    //
    // Given
    // -----
    // - `x = [1, 2, 3, 4]` with population variance 1.25.
    //
    // Expect
    // ------
    // - Scale → 0.8, Auto → 1.0, Value(0.3) → 0.3.
    fn gamma_policies_resolve_as_documented() {
        let x = [1.0, 2.0, 3.0, 4.0];

        assert_relative_eq!(Gamma::Scale.resolve(&x).unwrap(), 0.8, epsilon = 1e-12);
        assert_relative_eq!(Gamma::Auto.resolve(&x).unwrap(), 1.0);
        assert_relative_eq!(Gamma::Value(0.3).resolve(&x).unwrap(), 0.3);
    }

    #[test]
    // Purpose
    // -------
    // `Scale` on a constant feature must fail instead of dividing by zero.
    //
    // Given
    // -----
    // - `x = [2, 2, 2]`.
    //
    // Expect
    // ------
    // - `Err(DegenerateFeatureVariance { variance: 0 })`.
    fn gamma_scale_rejects_constant_feature() {
        let err = Gamma::Scale.resolve(&[2.0, 2.0, 2.0]).unwrap_err();

        assert_eq!(err, SvrError::DegenerateFeatureVariance { variance: 0.0 });
    }

    #[test]
    // Purpose
    // -------
    // Invalid kernel parameters are rejected by the validators.
    //
    // Given
    // -----
    // - Polynomial degree 0, sigmoid with NaN offset, Gamma::Value(-1).
    //
    // Expect
    // ------
    // - The matching `SvrError` variants.
    fn invalid_kernel_parameters_are_rejected() {
        assert_eq!(
            KernelType::Polynomial { degree: 0, coef0: 0.0 }.validate(),
            Err(SvrError::InvalidDegree { degree: 0 })
        );
        assert!(matches!(
            KernelType::Sigmoid { coef0: f64::NAN }.validate(),
            Err(SvrError::InvalidCoef0 { .. })
        ));
        assert!(matches!(Gamma::Value(-1.0).validate(), Err(SvrError::InvalidGamma { .. })));
    }

    #[test]
    // Purpose
    // -------
    // The RBF Gram matrix is symmetric with a unit diagonal.
    //
    // Given
    // -----
    // - `x = [-1, 0, 0.5, 2]`, `gamma = 1`.
    //
    // Expect
    // ------
    // - `K[i, i] = 1` and `K[i, j] = K[j, i]` for all pairs.
    fn rbf_gram_matrix_is_symmetric_with_unit_diagonal() {
        let x = [-1.0, 0.0, 0.5, 2.0];
        let gram = gram_matrix(&KernelType::Rbf, &x, 1.0).unwrap();

        for i in 0..x.len() {
            assert_relative_eq!(gram[[i, i]], 1.0);
            for j in 0..x.len() {
                assert_relative_eq!(gram[[i, j]], gram[[j, i]]);
            }
        }
    }
}
