//! Execution helper that runs the SMO solver through Argmin's executor and
//! returns a crate-friendly [`SmoOutcome`].
use crate::svr::{
    dual::EpsilonSvrDual,
    errors::{SvrError, SvrResult},
    options::SvrOptions,
    smo::{calculate_rho, SmoSolver},
    types::{Alpha, FnEvalMap},
    validation::validate_dual,
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, State, TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;

/// Normalized result of one SMO run.
///
/// - `alpha`: final dual multipliers (length `2n`).
/// - `rho`: KKT offset; the regression intercept is `−rho`.
/// - `objective`: final dual objective `D(α)`.
/// - `converged`: `true` only if the KKT tolerance was met (not when the
///   iteration cap was hit).
/// - `status`: human-readable termination status.
/// - `iterations`: SMO iterations performed.
/// - `fn_evals`: Argmin counters (`cost_count`, `gradient_count`,
///   `working_set_count`, `kernel_row_count`).
/// - `grad_norm`: L2 norm of the final dual gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoOutcome {
    pub alpha: Alpha,
    pub rho: f64,
    pub objective: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

/// Run SMO on `problem` from the feasible start `α = 0`.
///
/// Wires up:
/// - the dual problem (cloned into the executor),
/// - [`SmoSolver`] with `opts.tols.tol`,
/// - `max_iters = opts.tols.max_iter`,
/// - a terminal slog observer when `opts.verbose` and the `obs_slog`
///   feature are both on.
///
/// # Errors
/// - Propagates solver errors raised inside the executor (converted via
///   `From<argmin::core::Error>`).
/// - `MissingSolverState` / `DualDimMismatch` / `NonFiniteObjective` if the
///   final state is incomplete or non-finite.
pub fn run_smo(problem: &EpsilonSvrDual, opts: &SvrOptions) -> SvrResult<SmoOutcome> {
    let dim = problem.dim();
    let alpha0 = Alpha::zeros(dim);

    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&alpha0, problem)?;
    }

    let solver = SmoSolver::new(opts.tols.tol);
    let mut executor = Executor::new(problem.clone(), solver);
    executor = executor.configure(|state| state.param(alpha0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        executor =
            executor.add_observer(observer, argmin::core::observers::ObserverMode::Every(100));
    }
    executor = executor.configure(|state| state.max_iters(opts.tols.max_iter as u64));

    let mut state = executor.run()?.state().clone();
    let iterations = state.get_iter() as usize;
    let fn_evals = state.get_func_counts().clone();
    let termination = state.get_termination_status().clone();

    let alpha = state.take_param().ok_or(SvrError::MissingSolverState { what: "multipliers" })?;
    let grad = state.take_gradient().ok_or(SvrError::MissingSolverState { what: "gradient" })?;
    validate_dual(&alpha, dim)?;
    validate_dual(&grad, dim)?;

    let objective = problem.objective_from_grad(&alpha, &grad);
    if !objective.is_finite() {
        return Err(SvrError::NonFiniteObjective { value: objective });
    }
    let rho = calculate_rho(problem, &alpha, &grad);
    let converged =
        matches!(termination, TerminationStatus::Terminated(TerminationReason::SolverConverged));
    let status = match termination {
        TerminationStatus::NotTerminated => "Not terminated".to_string(),
        other => format!("{other:?}"),
    };
    let grad_norm = Some(grad.l2_norm());

    Ok(SmoOutcome { alpha, rho, objective, converged, status, iterations, fn_evals, grad_norm })
}

// ---- Helper Methods ----

#[cfg(feature = "obs_slog")]
fn log_initial_state(alpha0: &Alpha, problem: &EpsilonSvrDual) -> SvrResult<()> {
    let d0 = problem.cost(alpha0)?;
    let g0n = problem.gradient(alpha0)?.l2_norm();

    eprintln!(
        "init: n = {}, D(alpha0) = {:.6}, ||grad|| = {:.6}, C = {}",
        problem.n_points(),
        d0,
        g0n,
        problem.c()
    );
    Ok(())
}
