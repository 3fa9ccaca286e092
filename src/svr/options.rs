//! Configuration for ε-SVR fits.
//!
//! - [`SvrOptions`]: regularization, tube width, kernel, and solver settings.
//! - [`Tolerances`]: KKT stopping tolerance and iteration cap.
//!
//! Defaults follow the conventional ε-SVR settings: `C = 1`, `ε = 0.1`,
//! RBF kernel with `γ = Scale`, `tol = 1e-3`. The trend layer overrides `C`.
use crate::svr::{
    errors::{SvrError, SvrResult},
    kernel::{Gamma, KernelType},
    types::DEFAULT_MAX_ITER,
    validation::{verify_c, verify_epsilon, verify_tol},
};

/// Default regularization constant of a bare [`SvrOptions`].
pub const DEFAULT_SVR_C: f64 = 1.0;

/// Default half-width of the ε-insensitive tube.
pub const DEFAULT_EPSILON: f64 = 0.1;

/// Default KKT stopping tolerance.
pub const DEFAULT_TOL: f64 = 1e-3;

/// Stopping rule for the SMO solver.
///
/// - `tol`: stop once the maximal KKT violation `m(α) − M(α)` drops below it.
/// - `max_iter`: hard cap on SMO iterations; hitting it is reported as a
///   non-converged run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol: f64,
    pub max_iter: usize,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Rules
    /// - `tol` must be finite and strictly positive.
    /// - `max_iter`, if given, must be `> 0`; `None` uses [`DEFAULT_MAX_ITER`].
    ///
    /// # Errors
    /// - [`SvrError::InvalidTol`] or [`SvrError::InvalidMaxIter`].
    pub fn new(tol: f64, max_iter: Option<usize>) -> SvrResult<Self> {
        verify_tol(tol)?;
        let max_iter = max_iter.unwrap_or(DEFAULT_MAX_ITER);
        if max_iter == 0 {
            return Err(SvrError::InvalidMaxIter {
                max_iter,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Self { tol, max_iter })
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { tol: DEFAULT_TOL, max_iter: DEFAULT_MAX_ITER }
    }
}

/// ε-SVR configuration.
///
/// Fields:
/// - `c`: box constraint on the dual multipliers; larger values follow the
///   data more tightly.
/// - `epsilon`: residuals inside `±ε` are not penalized.
/// - `kernel` / `gamma`: kernel family and coefficient policy.
/// - `tols`: SMO stopping rule.
/// - `verbose`: if `true`, attaches a progress observer (behind the
///   `obs_slog` feature).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvrOptions {
    pub c: f64,
    pub epsilon: f64,
    pub kernel: KernelType,
    pub gamma: Gamma,
    pub tols: Tolerances,
    pub verbose: bool,
}

impl SvrOptions {
    /// Create validated options.
    ///
    /// # Errors
    /// - [`SvrError::InvalidC`], [`SvrError::InvalidEpsilon`], or any kernel /
    ///   gamma validation error.
    pub fn new(
        c: f64, epsilon: f64, kernel: KernelType, gamma: Gamma, tols: Tolerances, verbose: bool,
    ) -> SvrResult<Self> {
        let opts = Self { c, epsilon, kernel, gamma, tols, verbose };
        opts.validate()?;
        Ok(opts)
    }

    /// Same options with a different regularization constant.
    pub fn with_c(self, c: f64) -> SvrResult<Self> {
        verify_c(c)?;
        Ok(Self { c, ..self })
    }

    /// Re-run all checks; used when options were assembled field by field.
    pub fn validate(&self) -> SvrResult<()> {
        verify_c(self.c)?;
        verify_epsilon(self.epsilon)?;
        verify_tol(self.tols.tol)?;
        if self.tols.max_iter == 0 {
            return Err(SvrError::InvalidMaxIter {
                max_iter: 0,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        self.kernel.validate()?;
        self.gamma.validate()
    }
}

impl Default for SvrOptions {
    fn default() -> Self {
        Self {
            c: DEFAULT_SVR_C,
            epsilon: DEFAULT_EPSILON,
            kernel: KernelType::Rbf,
            gamma: Gamma::Scale,
            tols: Tolerances::default(),
            verbose: false,
        }
    }
}
