//! svr::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the numeric types used by the ε-SVR backend so the dual
//! problem, the SMO solver, and the runner agree on one set of shapes
//! without repeating `ndarray` and Argmin generics.
//!
//! Conventions
//! -----------
//! - The dual has `2n` variables for `n` training points: the first `n`
//!   are the "upper" multipliers `α` (sign `+1`), the last `n` the "lower"
//!   multipliers `α*` (sign `−1`).
//! - `Alpha` and `DualGrad` always have length `2n`; `KernelMatrix` is the
//!   dense `n × n` Gram matrix of the training inputs.
use argmin::core::IterState;
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Dual variables `(α, α*)` stacked into one vector of length `2n`.
pub type Alpha = Array1<f64>;

/// Gradient of the dual objective, `∇D(α) = Qα + p`, length `2n`.
pub type DualGrad = Array1<f64>;

/// Dense Gram matrix `K[i, j] = K(x_i, x_j)` over the training inputs.
pub type KernelMatrix = Array2<f64>;

/// Scalar value of the dual objective `½ αᵀQα + pᵀα`.
pub type Objective = f64;

/// Function-evaluation counters as reported by the executor.
///
/// Maps counter names (e.g., `"cost_count"`, `"kernel_row_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Argmin state carried between SMO iterations.
///
/// `param` holds `α`, `gradient` holds `∇D(α)`, `cost` holds `D(α)`.
pub type SmoState = IterState<Alpha, DualGrad, (), (), (), f64>;

/// Curvature floor used when the two-variable subproblem is not strictly convex.
pub const TAU: f64 = 1e-12;

/// Default iteration cap.
pub const DEFAULT_MAX_ITER: usize = 10_000_000;
