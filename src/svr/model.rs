//! Fitted ε-SVR model and the `fit` entry point.
//!
//! [`fit`] validates options and data, resolves the kernel coefficient,
//! builds the Gram matrix and dual, runs SMO, and keeps only the support
//! vectors (points with `β_i ≠ 0`) in the returned [`SvrModel`].
use crate::svr::{
    dual::EpsilonSvrDual,
    errors::SvrResult,
    kernel::{gram_matrix, KernelType},
    options::SvrOptions,
    run::{run_smo, SmoOutcome},
    validation::validate_training_data,
};
use ndarray::Array1;

/// Prediction function `f(x) = Σ_k β_k K(s_k, x) + b` over the support set.
#[derive(Debug, Clone, PartialEq)]
pub struct SvrModel {
    support: Vec<f64>,
    dual_coef: Vec<f64>,
    intercept: f64,
    kernel: KernelType,
    gamma: f64,
}

impl SvrModel {
    /// Number of support vectors.
    pub fn n_support(&self) -> usize {
        self.support.len()
    }

    /// Support-vector feature values.
    pub fn support(&self) -> &[f64] {
        &self.support
    }

    /// Coefficients `β_k = α⁺_k − α⁻_k` aligned with [`support`](Self::support).
    pub fn dual_coef(&self) -> &[f64] {
        &self.dual_coef
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn kernel(&self) -> KernelType {
        self.kernel
    }

    /// Resolved kernel coefficient used for training and prediction.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Evaluate `f(x)` at one point.
    pub fn predict_one(&self, x: f64) -> f64 {
        self.support
            .iter()
            .zip(self.dual_coef.iter())
            .map(|(&s, &beta)| beta * self.kernel.eval(s, x, self.gamma))
            .sum::<f64>()
            + self.intercept
    }

    /// Evaluate `f` at every point of `x`.
    pub fn predict(&self, x: &[f64]) -> Array1<f64> {
        x.iter().map(|&xi| self.predict_one(xi)).collect()
    }
}

/// A trained model together with the solver diagnostics that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SvrFit {
    pub model: SvrModel,
    pub outcome: SmoOutcome,
}

/// Train an ε-SVR on one-dimensional features `x` and targets `z`.
///
/// # Errors
/// - Any option validation error.
/// - `EmptyInput`, `LengthMismatch`, `NonFiniteInput` for bad data.
/// - `DegenerateFeatureVariance` when `γ = Scale/Auto` cannot be resolved.
/// - `NonFiniteKernel` or solver errors from the run.
///
/// A run that hits the iteration cap is still returned; inspect
/// `outcome.converged`.
pub fn fit(x: &[f64], z: &[f64], opts: &SvrOptions) -> SvrResult<SvrFit> {
    opts.validate()?;
    validate_training_data(x, z)?;

    let gamma = opts.gamma.resolve(x)?;
    let gram = gram_matrix(&opts.kernel, x, gamma)?;
    let dual = EpsilonSvrDual::new(gram, Array1::from(z.to_vec()), opts.c, opts.epsilon)?;
    let outcome = run_smo(&dual, opts)?;

    let beta = dual.coefficients(&outcome.alpha);
    let (support, dual_coef): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(beta.iter())
        .filter(|(_, &b)| b != 0.0)
        .map(|(&xi, &b)| (xi, b))
        .unzip();

    let model = SvrModel { support, dual_coef, intercept: -outcome.rho, kernel: opts.kernel, gamma };
    Ok(SvrFit { model, outcome })
}
