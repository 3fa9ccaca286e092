//! Unified error surface for the ε-SVR backend.
//!
//! `SvrError` groups option validation, training-input validation, numerical
//! failures inside the dual solver, and normalized wrappers around Argmin's
//! own error kinds. `SvrResult<T>` is the result alias used across `svr`.
use argmin::core::{ArgminError, Error};

/// Result alias for ε-SVR operations.
pub type SvrResult<T> = Result<T, SvrError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SvrError {
    // ---- SvrOptions ----
    /// Regularization constant must be finite and > 0.
    InvalidC {
        c: f64,
        reason: &'static str,
    },
    /// Tube half-width must be finite and >= 0.
    InvalidEpsilon {
        epsilon: f64,
        reason: &'static str,
    },
    /// Stopping tolerance must be finite and > 0.
    InvalidTol {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations must be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// Explicit kernel coefficient must be finite and > 0.
    InvalidGamma {
        gamma: f64,
        reason: &'static str,
    },
    /// Polynomial degree must be positive.
    InvalidDegree {
        degree: u32,
    },
    /// Kernel offset must be finite.
    InvalidCoef0 {
        coef0: f64,
    },

    // ---- Training inputs ----
    /// No training points.
    EmptyInput,
    /// Feature and target lengths differ.
    LengthMismatch {
        features: usize,
        targets: usize,
    },
    /// A feature or target value is NaN/±inf.
    NonFiniteInput {
        index: usize,
        value: f64,
        which: &'static str,
    },
    /// `gamma = Scale` requested on a constant feature.
    DegenerateFeatureVariance {
        variance: f64,
    },

    // ---- Solver ----
    /// Kernel evaluation produced a non-finite entry.
    NonFiniteKernel {
        row: usize,
        col: usize,
        value: f64,
    },
    /// Dual objective became non-finite.
    NonFiniteObjective {
        value: f64,
    },
    /// Dual state (multipliers or gradient) missing from the solver state.
    MissingSolverState {
        what: &'static str,
    },
    /// Dual dimension does not match the problem.
    DualDimMismatch {
        expected: usize,
        found: usize,
    },

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for SvrError {}

impl std::fmt::Display for SvrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- SvrOptions ----
            SvrError::InvalidC { c, reason } => {
                write!(f, "Invalid regularization constant C = {c}: {reason}")
            }
            SvrError::InvalidEpsilon { epsilon, reason } => {
                write!(f, "Invalid epsilon {epsilon}: {reason}")
            }
            SvrError::InvalidTol { tol, reason } => {
                write!(f, "Invalid stopping tolerance {tol}: {reason}")
            }
            SvrError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            SvrError::InvalidGamma { gamma, reason } => {
                write!(f, "Invalid kernel coefficient gamma = {gamma}: {reason}")
            }
            SvrError::InvalidDegree { degree } => {
                write!(f, "Invalid polynomial degree {degree}, must be >= 1")
            }
            SvrError::InvalidCoef0 { coef0 } => {
                write!(f, "Invalid kernel offset coef0 = {coef0}, must be finite")
            }

            // ---- Training inputs ----
            SvrError::EmptyInput => {
                write!(f, "No training points supplied")
            }
            SvrError::LengthMismatch { features, targets } => {
                write!(f, "Length mismatch: {features} feature values, {targets} targets")
            }
            SvrError::NonFiniteInput { index, value, which } => {
                write!(f, "Non-finite {which} at index {index}: {value}")
            }
            SvrError::DegenerateFeatureVariance { variance } => {
                write!(
                    f,
                    "Feature variance {variance} is not positive; gamma = 'scale' is undefined"
                )
            }

            // ---- Solver ----
            SvrError::NonFiniteKernel { row, col, value } => {
                write!(f, "Kernel entry at ({row}, {col}) is non-finite: {value}")
            }
            SvrError::NonFiniteObjective { value } => {
                write!(f, "Non-finite dual objective value: {value}")
            }
            SvrError::MissingSolverState { what } => {
                write!(f, "Solver state is missing the {what}")
            }
            SvrError::DualDimMismatch { expected, found } => {
                write!(f, "Dual dimension mismatch: expected {expected}, found {found}")
            }

            // ---- Argmin ----
            SvrError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            SvrError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            SvrError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            SvrError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            SvrError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            SvrError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            SvrError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            SvrError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Fallback ----
            SvrError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for SvrError {
    fn from(original_err: Error) -> Self {
        // Errors raised by our own problem/solver travel through argmin boxed.
        let original_err = match original_err.downcast::<SvrError>() {
            Ok(svr_err) => return svr_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => SvrError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => SvrError::NotImplemented { text },
                ArgminError::NotInitialized { text } => SvrError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => SvrError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => SvrError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => SvrError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => SvrError::ImpossibleError { text },
                _ => SvrError::UnknownError,
            },
            Err(err) => SvrError::BackendError { text: err.to_string() },
        }
    }
}
