//! Errors for trend estimation (observation validation, time normalization,
//! resampling, and regression failures).
//!
//! This module defines [`TrendError`], the single error type of the trend
//! layer, and the [`TrendResult`] alias. Regression-backend failures are
//! carried through unchanged in [`TrendError::Svr`].
//!
//! ## Conventions
//! - **Indices are 0-based** and refer to the caller's input order.
//! - Magnitudes must be **strictly positive and finite**.
//! - Timestamps are measured in seconds since the Unix epoch (UTC).
//! - A fit that stops at the iteration cap is reported as
//!   [`TrendError::NotConverged`] rather than returned as a curve.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, PyErr};

use crate::svr::SvrError;

/// Result alias for trend operations that may produce [`TrendError`].
pub type TrendResult<T> = Result<T, TrendError>;

/// Unified error type for trend estimation.
#[derive(Debug, Clone, PartialEq)]
pub enum TrendError {
    // ---- Input/data validation ----
    /// No observations were supplied.
    EmptySample,

    /// A magnitude is NaN/±inf.
    NonFiniteMagnitude { index: usize, value: f64 },

    /// A magnitude is ≤ 0 (its logarithm is undefined).
    NonPositiveMagnitude { index: usize, value: f64 },

    /// A raw epoch-seconds timestamp is NaN/±inf.
    NonFiniteTimestamp { index: usize, value: f64 },

    /// Epoch seconds outside the representable calendar range.
    TimestampOutOfRange { seconds: f64 },

    /// Timestamp and magnitude inputs differ in length.
    LengthMismatch { timestamps: usize, magnitudes: usize },

    // ---- Normalization / resampling ----
    /// All timestamps coincide, so time cannot be standardized.
    DegenerateTimeRange { std: f64, span_seconds: f64 },

    /// A resampled grid value or prediction is not finite.
    InvalidGridValue { index: usize, value: f64 },

    // ---- Regression ----
    /// Regression finished but produced an unusable model.
    FitFailed { reason: String },

    /// Solver stopped before meeting its tolerance.
    NotConverged { status: String, iterations: usize },

    /// Passthrough of regression-backend errors.
    Svr(SvrError),
}

impl std::error::Error for TrendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrendError::Svr(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for TrendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/data validation ----
            TrendError::EmptySample => {
                write!(f, "No observations supplied.")
            }
            TrendError::NonFiniteMagnitude { index, value } => {
                write!(f, "Magnitude at index {index} is non-finite: {value}")
            }
            TrendError::NonPositiveMagnitude { index, value } => {
                write!(f, "Magnitude at index {index} must be strictly positive; got: {value}")
            }
            TrendError::NonFiniteTimestamp { index, value } => {
                write!(f, "Timestamp at index {index} is non-finite: {value}")
            }
            TrendError::TimestampOutOfRange { seconds } => {
                write!(f, "Timestamp {seconds} s since epoch is outside the supported range.")
            }
            TrendError::LengthMismatch { timestamps, magnitudes } => {
                write!(
                    f,
                    "Timestamps and magnitudes must have equal length: {timestamps} vs {magnitudes}."
                )
            }
            // ---- Normalization / resampling ----
            TrendError::DegenerateTimeRange { std, span_seconds } => {
                write!(
                    f,
                    "Timestamps have no spread (std = {std}, span = {span_seconds} s); cannot standardize time."
                )
            }
            TrendError::InvalidGridValue { index, value } => {
                write!(f, "Resampled value at grid index {index} is non-finite: {value}")
            }
            // ---- Regression ----
            TrendError::FitFailed { reason } => {
                write!(f, "Trend fit failed: {reason}")
            }
            TrendError::NotConverged { status, iterations } => {
                write!(f, "Regression did not converge after {iterations} iterations: {status}")
            }
            TrendError::Svr(err) => {
                write!(f, "Regression error: {err}")
            }
        }
    }
}

impl From<SvrError> for TrendError {
    fn from(err: SvrError) -> TrendError {
        TrendError::Svr(err)
    }
}

/// Convert a [`TrendError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<TrendError> for PyErr {
    fn from(err: TrendError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
