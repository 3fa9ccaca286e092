//! The ε-SVR dual as an Argmin problem.
//!
//! For training pairs `(x_i, z_i)`, `i = 0..n`, the dual is posed over `2n`
//! multipliers `α = (α⁺, α⁻)` with signs `y = (+1, …, +1, −1, …, −1)`:
//!
//! ```text
//! minimize    D(α) = ½ αᵀQα + pᵀα
//! subject to  yᵀα = 0,  0 ≤ α_t ≤ C
//! where       Q_st = y_s y_t K(x_{s mod n}, x_{t mod n})
//!             p    = (ε − z, ε + z)
//! ```
//!
//! [`EpsilonSvrDual`] owns the Gram matrix and targets, exposes the
//! primitives the SMO solver needs (signs, `Q` entries, row updates read
//! straight from the Gram matrix, bounds), and implements
//! Argmin's [`CostFunction`] and [`Gradient`] so the executor can evaluate
//! `D(α)` and `∇D(α) = Qα + p` directly.
use crate::svr::{
    errors::{SvrError, SvrResult},
    types::{Alpha, DualGrad, KernelMatrix, Objective},
};
use argmin::core::{CostFunction, Error, Gradient};
use ndarray::{s, Array1};

/// Dual problem of ε-support-vector regression.
#[derive(Debug, Clone, PartialEq)]
pub struct EpsilonSvrDual {
    gram: KernelMatrix,
    targets: Array1<f64>,
    c: f64,
    epsilon: f64,
}

impl EpsilonSvrDual {
    /// Build the dual from a precomputed Gram matrix.
    ///
    /// # Errors
    /// - [`SvrError::EmptyInput`] if there are no targets.
    /// - [`SvrError::LengthMismatch`] if `gram` is not `n × n` for
    ///   `n = targets.len()`.
    pub fn new(gram: KernelMatrix, targets: Array1<f64>, c: f64, epsilon: f64) -> SvrResult<Self> {
        let n = targets.len();
        if n == 0 {
            return Err(SvrError::EmptyInput);
        }
        if gram.nrows() != n || gram.ncols() != n {
            return Err(SvrError::LengthMismatch { features: gram.nrows(), targets: n });
        }
        Ok(Self { gram, targets, c, epsilon })
    }

    /// Number of training points `n`.
    pub fn n_points(&self) -> usize {
        self.targets.len()
    }

    /// Number of dual variables `2n`.
    pub fn dim(&self) -> usize {
        2 * self.targets.len()
    }

    /// Upper bound `C` on every multiplier.
    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn gram(&self) -> &KernelMatrix {
        &self.gram
    }

    /// Sign `y_t`: `+1` for the first half, `−1` for the second.
    #[inline]
    pub fn sign(&self, t: usize) -> f64 {
        if t < self.n_points() {
            1.0
        } else {
            -1.0
        }
    }

    /// Linear term `p_t`.
    #[inline]
    pub fn linear_term(&self, t: usize) -> f64 {
        let n = self.n_points();
        if t < n {
            self.epsilon - self.targets[t]
        } else {
            self.epsilon + self.targets[t - n]
        }
    }

    /// Diagonal entry `Q_tt = K(x_t, x_t)`.
    #[inline]
    pub fn q_diag(&self, t: usize) -> f64 {
        let n = self.n_points();
        self.gram[[t % n, t % n]]
    }

    /// Entry `Q_st = y_s y_t K(x_{s mod n}, x_{t mod n})`.
    #[inline]
    pub fn q_entry(&self, s: usize, t: usize) -> f64 {
        let n = self.n_points();
        self.sign(s) * self.sign(t) * self.gram[[s % n, t % n]]
    }

    /// `G += scale · Q_s·` without materializing the `2n` row: the first half
    /// of `Q_s·` is `y_s K_{s mod n}·` and the second half its negation.
    pub fn add_scaled_q_row(&self, s: usize, scale: f64, grad: &mut DualGrad) {
        if scale == 0.0 {
            return;
        }
        let n = self.n_points();
        let k_row = self.gram.row(s % n);
        let coef = self.sign(s) * scale;
        grad.slice_mut(s![..n]).scaled_add(coef, &k_row);
        grad.slice_mut(s![n..]).scaled_add(-coef, &k_row);
    }

    #[inline]
    pub fn is_upper_bound(&self, alpha_t: f64) -> bool {
        alpha_t >= self.c
    }

    #[inline]
    pub fn is_lower_bound(&self, alpha_t: f64) -> bool {
        alpha_t <= 0.0
    }

    /// Regression coefficients `β_i = α⁺_i − α⁻_i`, length `n`.
    pub fn coefficients(&self, alpha: &Alpha) -> Array1<f64> {
        let n = self.n_points();
        &alpha.slice(s![..n]) - &alpha.slice(s![n..])
    }

    /// Dual objective recovered from a maintained gradient:
    /// `D(α) = ½ Σ_t α_t (G_t + p_t)`.
    pub fn objective_from_grad(&self, alpha: &Alpha, grad: &DualGrad) -> Objective {
        0.5 * alpha
            .iter()
            .zip(grad.iter())
            .enumerate()
            .map(|(t, (&a, &g))| a * (g + self.linear_term(t)))
            .sum::<f64>()
    }

    fn check_dim(&self, alpha: &Alpha) -> SvrResult<()> {
        if alpha.len() != self.dim() {
            return Err(SvrError::DualDimMismatch { expected: self.dim(), found: alpha.len() });
        }
        Ok(())
    }
}

impl CostFunction for EpsilonSvrDual {
    type Param = Alpha;
    type Output = Objective;

    /// Evaluate `D(α)`.
    ///
    /// # Errors
    /// - `DualDimMismatch` for a wrongly sized `α`.
    /// - `NonFiniteObjective` if the value is not finite.
    fn cost(&self, alpha: &Self::Param) -> Result<Self::Output, Error> {
        let grad = self.gradient(alpha)?;
        let value = self.objective_from_grad(alpha, &grad);
        if !value.is_finite() {
            return Err((SvrError::NonFiniteObjective { value }).into());
        }
        Ok(value)
    }
}

impl Gradient for EpsilonSvrDual {
    type Param = Alpha;
    type Gradient = DualGrad;

    /// Evaluate `∇D(α) = Qα + p`.
    ///
    /// Uses `(Qα)_s = y_s (K β)_{s mod n}` with `β = α⁺ − α⁻`, so the cost is
    /// one `n × n` matrix-vector product.
    fn gradient(&self, alpha: &Self::Param) -> Result<Self::Gradient, Error> {
        self.check_dim(alpha)?;
        let n = self.n_points();
        let k_beta = self.gram.dot(&self.coefficients(alpha));
        Ok(Array1::from_shape_fn(self.dim(), |t| {
            self.sign(t) * k_beta[t % n] + self.linear_term(t)
        }))
    }
}
