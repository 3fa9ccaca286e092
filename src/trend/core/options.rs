//! Configuration for trend estimation.
//!
//! [`TrendOptions`] wraps the regression settings used for one trend fit.
//! Two presets exist because the chart draws two kinds of line: per-group
//! trends use `C = 10` ([`DEFAULT_TREND_C`]) and the single trend over every
//! observation uses `C = 100` ([`AGGREGATE_TREND_C`]). All other regression
//! settings keep the [`SvrOptions`] defaults.
use crate::{
    svr::{SvrOptions, Tolerances},
    trend::errors::TrendResult,
};

/// Regularization constant for per-group trend lines.
pub const DEFAULT_TREND_C: f64 = 10.0;

/// Regularization constant for the trend over all observations.
pub const AGGREGATE_TREND_C: f64 = 100.0;

/// Number of points on every fitted curve.
pub const TREND_GRID_POINTS: usize = 100;

/// Options for one trend fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendOptions {
    pub svr: SvrOptions,
}

impl TrendOptions {
    /// Default options with a custom regularization constant.
    ///
    /// # Errors
    /// - `TrendError::Svr(InvalidC)` if `c` is non-finite or ≤ 0.
    pub fn new(c: f64) -> TrendResult<Self> {
        Ok(Self { svr: Self::default().svr.with_c(c)? })
    }

    /// Preset for the trend over every observation (`C = 100`).
    pub fn aggregate() -> Self {
        Self { svr: SvrOptions { c: AGGREGATE_TREND_C, ..SvrOptions::default() } }
    }

    /// Wrap fully specified regression options after validating them.
    ///
    /// # Errors
    /// - Any `SvrOptions::validate` error, as `TrendError::Svr`.
    pub fn with_svr(svr: SvrOptions) -> TrendResult<Self> {
        svr.validate()?;
        Ok(Self { svr })
    }

    /// Same options with different solver tolerances.
    pub fn with_tolerances(self, tols: Tolerances) -> Self {
        Self { svr: SvrOptions { tols, ..self.svr } }
    }

    /// Same options with progress logging toggled.
    pub fn verbose(self, verbose: bool) -> Self {
        Self { svr: SvrOptions { verbose, ..self.svr } }
    }

    pub fn c(&self) -> f64 {
        self.svr.c
    }
}

impl Default for TrendOptions {
    fn default() -> Self {
        Self { svr: SvrOptions { c: DEFAULT_TREND_C, ..SvrOptions::default() } }
    }
}
