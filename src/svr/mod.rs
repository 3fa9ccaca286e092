//! svr — one-dimensional ε-support-vector regression on an Argmin backend.
//!
//! Purpose
//! -------
//! Provide the regression engine behind the trend layer: fit a smooth
//! function `f(x) = Σ β_k K(s_k, x) + b` to scalar features and targets,
//! ignoring residuals inside a tube of half-width `ε` and penalizing larger
//! ones linearly with weight `C`.
//!
//! Key behaviors
//! -------------
//! - Pose the ε-SVR dual as an Argmin problem ([`dual::EpsilonSvrDual`]) with
//!   `2n` box-constrained multipliers and one equality constraint.
//! - Solve it with a sequential-minimal-optimization solver
//!   ([`smo::SmoSolver`]) that implements Argmin's `Solver` trait, so the
//!   executor owns the iteration cap, observers, and counters.
//! - Normalize executor results into [`SmoOutcome`] via [`run::run_smo`].
//! - Expose a single training entry point [`fit`] that returns an
//!   [`SvrModel`] (support vectors, coefficients, intercept) plus the solver
//!   diagnostics.
//!
//! Invariants & assumptions
//! ------------------------
//! - Features and targets are finite and of equal, non-zero length; this is
//!   checked in [`validation`] before any kernel is evaluated.
//! - Every SMO step keeps `yᵀα = 0` and `0 ≤ α ≤ C`; the maintained gradient
//!   equals `Qα + p` throughout.
//! - Options ([`SvrOptions`], [`Tolerances`]) are validated on construction
//!   and again at the start of [`fit`].
//!
//! Conventions
//! -----------
//! - Inputs are one-dimensional; the kernel coefficient policy
//!   [`Gamma::Scale`] therefore reduces to `1 / Var(x)`.
//! - Hitting the iteration cap is not an error at this layer: the fit is
//!   returned with `outcome.converged = false` and callers decide.
//! - Errors surface as [`SvrError`] / [`SvrResult`]; Argmin errors are mapped
//!   back into `SvrError` on the way out.
//!
//! Downstream usage
//! ----------------
//! - Build [`SvrOptions`] (or start from `SvrOptions::default().with_c(..)`),
//!   call [`fit`], then `model.predict(&grid)`.
//! - The trend layer is the primary consumer; it standardizes timestamps and
//!   log-transforms magnitudes before calling [`fit`].
//!
//! Testing notes
//! -------------
//! - [`dual`] checks the analytic gradient against finite differences.
//! - [`smo`] checks feasibility, monotone descent, and KKT optimality on
//!   hand-driven iterations.
//! - [`run`] and [`model`] check executor wiring, iteration caps, the tube
//!   property of fitted functions, and input rejection.

pub mod dual;
pub mod errors;
pub mod kernel;
pub mod model;
pub mod options;
pub mod run;
pub mod smo;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{SvrError, SvrResult};
pub use self::kernel::{Gamma, KernelType};
pub use self::model::{fit, SvrFit, SvrModel};
pub use self::options::{SvrOptions, Tolerances, DEFAULT_EPSILON, DEFAULT_SVR_C, DEFAULT_TOL};
pub use self::run::SmoOutcome;
pub use self::types::{FnEvalMap, DEFAULT_MAX_ITER};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use llm_trend::svr::prelude::*;
//
// to import the regression surface in a single line.

pub mod prelude {
    pub use super::{
        fit, Gamma, KernelType, SmoOutcome, SvrError, SvrFit, SvrModel, SvrOptions, SvrResult,
        Tolerances,
    };
}
