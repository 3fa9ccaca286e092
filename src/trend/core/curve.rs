//! Fitted trend curves and their diagnostics.
//!
//! Purpose
//! -------
//! Represent the output of one trend fit: an ordered sequence of
//! (timestamp, magnitude) points, the time normalization used to produce it,
//! and a summary of the regression run.
//!
//! Key behaviors
//! -------------
//! - [`TrendPoint`] is one resampled point in original units.
//! - [`FittedCurve`] owns the points plus the time origin, the
//!   [`StandardScaler`] and [`FitDiagnostics`], and exposes column views as
//!   `ndarray` vectors for plotting or bindings.
//! - The scaler works on seconds since the origin (the earliest
//!   observation), not on absolute epoch seconds.
//!
//! Invariants & assumptions
//! ------------------------
//! - Points are in ascending time order (strictly so whenever the sample
//!   spans at least 99 ns, the grid step at nanosecond resolution) and every
//!   magnitude is finite and > 0; the estimator guarantees this before
//!   constructing a curve.
//! - The first and last timestamps equal the earliest and latest observation.
use crate::{
    svr::FnEvalMap,
    trend::core::{data::epoch_seconds, scaler::StandardScaler},
};
use chrono::{DateTime, Utc};
use ndarray::Array1;

/// One point on a fitted trend line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub magnitude: f64,
}

impl TrendPoint {
    pub fn epoch_seconds(&self) -> f64 {
        epoch_seconds(&self.timestamp)
    }
}

/// Summary of the regression behind a curve.
///
/// - `n_observations`: sample size.
/// - `n_support`: observations with non-zero dual coefficient.
/// - `c`, `gamma`: regularization constant and resolved kernel coefficient.
/// - `intercept`: fitted offset in log10 units.
/// - `objective`: final dual objective.
/// - `iterations`, `status`, `converged`: solver termination details.
/// - `fn_evals`: executor counters.
#[derive(Debug, Clone, PartialEq)]
pub struct FitDiagnostics {
    pub n_observations: usize,
    pub n_support: usize,
    pub c: f64,
    pub gamma: f64,
    pub intercept: f64,
    pub objective: f64,
    pub iterations: usize,
    pub status: String,
    pub converged: bool,
    pub fn_evals: FnEvalMap,
}

/// Resampled trend over the observed time range.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedCurve {
    points: Vec<TrendPoint>,
    origin: DateTime<Utc>,
    scaler: StandardScaler,
    diagnostics: FitDiagnostics,
}

impl FittedCurve {
    pub(crate) fn new(
        points: Vec<TrendPoint>, origin: DateTime<Utc>, scaler: StandardScaler,
        diagnostics: FitDiagnostics,
    ) -> Self {
        Self { points, origin, scaler, diagnostics }
    }

    pub fn points(&self) -> &[TrendPoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<TrendPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&TrendPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&TrendPoint> {
        self.points.last()
    }

    /// Earliest observation; the zero of the scaler's time axis.
    pub fn time_origin(&self) -> DateTime<Utc> {
        self.origin
    }

    /// Time normalization fitted on the sample's offsets from
    /// [`FittedCurve::time_origin`].
    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// Mean observation time as real seconds since the epoch.
    pub fn mean_epoch_seconds(&self) -> f64 {
        epoch_seconds(&self.origin) + self.scaler.mean()
    }

    pub fn diagnostics(&self) -> &FitDiagnostics {
        &self.diagnostics
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    /// Timestamps as real seconds since the epoch.
    pub fn epoch_seconds(&self) -> Array1<f64> {
        self.points.iter().map(TrendPoint::epoch_seconds).collect()
    }

    pub fn magnitudes(&self) -> Array1<f64> {
        self.points.iter().map(|p| p.magnitude).collect()
    }

    /// `log10` of the magnitudes, i.e. the raw regression output.
    pub fn log_magnitudes(&self) -> Array1<f64> {
        self.points.iter().map(|p| p.magnitude.log10()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrendPoint> {
        self.points.iter()
    }
}

impl<'a> IntoIterator for &'a FittedCurve {
    type Item = &'a TrendPoint;
    type IntoIter = std::slice::Iter<'a, TrendPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
