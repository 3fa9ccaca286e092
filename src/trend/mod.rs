//! trend — smoothed growth curves for magnitudes observed over time.
//!
//! Purpose
//! -------
//! Summarize a scattered, unevenly spaced set of (date, size) observations
//! spanning several orders of magnitude by one smooth curve, fitted in
//! log space so that exponential growth looks linear and single outliers
//! do not dominate. This is the main entry point of the crate and the
//! surface the Python bindings build on.
//!
//! Key behaviors
//! -------------
//! - Validate raw observations in [`core::data`] ([`Observation`],
//!   [`ObservationSet`]).
//! - Standardize time per sample ([`StandardScaler`]), take `log10` of the
//!   magnitudes, and fit an ε-SVR through [`crate::svr`].
//! - Resample the fit on [`TREND_GRID_POINTS`] evenly spaced points between
//!   the earliest and latest observation and map them back to
//!   (timestamp, magnitude) pairs ([`FittedCurve`]).
//! - Fit one curve per group key and one over every observation with
//!   [`compute_grouped_trends`] / [`compute_trend_overview`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Magnitudes are finite and strictly positive; timestamps are UTC.
//! - At least two distinct timestamps are needed; a sample whose timestamps
//!   all coincide is rejected with `TrendError::DegenerateTimeRange`.
//! - A curve never extrapolates: its first and last timestamps are the
//!   sample's minimum and maximum.
//! - Normalization is fitted fresh for every call and every group.
//!
//! Conventions
//! -----------
//! - Per-group lines use `C = 10` ([`DEFAULT_TREND_C`], the
//!   `TrendOptions::default()`); the overall line uses `C = 100`
//!   ([`AGGREGATE_TREND_C`], `TrendOptions::aggregate()`).
//! - The layer performs no I/O. Solver progress is only logged when the
//!   `obs_slog` feature is enabled and `verbose` is set.
//! - Errors surface as [`TrendError`] / [`TrendResult`]; backend errors are
//!   wrapped in `TrendError::Svr`.
//!
//! Downstream usage
//! ----------------
//! - Build observations with `Observation::new(timestamp, magnitude)` (or
//!   from epoch seconds), call [`compute_trend`] with
//!   `TrendOptions::default()`, and draw `curve.points()`.
//! - For charts with families of models, pass `(key, Observation)` records
//!   to [`compute_trend_overview`] and skip the keys whose result is an
//!   error.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`core`] cover conversions, validation, scaling, and the
//!   resampling grid.
//! - Unit tests in [`models`] cover curve shape, degenerate samples,
//!   non-converged runs, and group independence.
//! - `tests/integration_trend_pipeline.rs` checks determinism, log-linear
//!   recovery, scale invariance, and the three-year reference example.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    FitDiagnostics, FittedCurve, Observation, ObservationSet, StandardScaler, TrendOptions,
    TrendPoint, AGGREGATE_TREND_C, DEFAULT_TREND_C, TREND_GRID_POINTS,
};

pub use self::errors::{TrendError, TrendResult};

pub use self::models::{
    compute_grouped_trends, compute_trend, compute_trend_overview, TrendEstimator, TrendOverview,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use llm_trend::trend::prelude::*;
//
// to import the trend surface in a single line.

pub mod prelude {
    pub use super::{
        compute_grouped_trends, compute_trend, compute_trend_overview, FittedCurve, Observation,
        ObservationSet, TrendError, TrendEstimator, TrendOptions, TrendOverview, TrendPoint,
        TrendResult,
    };
}
