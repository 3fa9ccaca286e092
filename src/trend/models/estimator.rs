//! Trend estimator: standardized time, log magnitudes, ε-SVR, resampling.
//!
//! The estimator turns a scattered set of (timestamp, magnitude) observations
//! into a smooth curve of [`TREND_GRID_POINTS`] points spanning the observed
//! time range:
//!
//! 1. timestamps → seconds since the earliest observation (exact nanosecond
//!    differences) → standardized with this sample's mean and population
//!    standard deviation;
//! 2. magnitudes → `log10`;
//! 3. ε-SVR fit from normalized time to log magnitude;
//! 4. uniform grid between the smallest and largest normalized time;
//! 5. prediction on the grid, then `10^ŷ` and the inverse time transform.
//!
//! The estimator holds no state between calls; every sample gets its own
//! scaler. The first and last curve timestamps are the earliest and latest
//! observations exactly, not their round-tripped values.
use crate::{
    svr::{self, SvrFit},
    trend::{
        core::{
            curve::{FitDiagnostics, FittedCurve, TrendPoint},
            data::{datetime_after, Observation, ObservationSet},
            grid::uniform_grid,
            options::{TrendOptions, TREND_GRID_POINTS},
            scaler::StandardScaler,
        },
        errors::{TrendError, TrendResult},
    },
};
use statrs::statistics::Statistics;

/// Stateless trend estimator parameterized by [`TrendOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrendEstimator {
    pub options: TrendOptions,
}

impl TrendEstimator {
    pub fn new(options: TrendOptions) -> Self {
        Self { options }
    }

    /// Fit a trend to `set` and resample it over the observed range.
    ///
    /// # Errors
    /// - `TrendError::DegenerateTimeRange` if all timestamps coincide.
    /// - `TrendError::Svr(..)` for regression failures.
    /// - `TrendError::NotConverged` if the solver hit its iteration cap.
    /// - `TrendError::FitFailed` if the fitted model is not usable.
    /// - `TrendError::InvalidGridValue` / `TimestampOutOfRange` if a
    ///   resampled point cannot be represented.
    pub fn estimate(&self, set: &ObservationSet) -> TrendResult<FittedCurve> {
        let (origin, offsets) = set.offset_seconds();
        let scaler = StandardScaler::fit(&offsets)?;
        let x_norm = scaler.transform(&offsets);
        let log_magnitudes = set.log_magnitudes();

        let SvrFit { model, outcome } = svr::fit(&x_norm, &log_magnitudes, &self.options.svr)?;
        if !outcome.converged {
            return Err(TrendError::NotConverged {
                status: outcome.status,
                iterations: outcome.iterations,
            });
        }
        if !model.intercept().is_finite() {
            return Err(TrendError::FitFailed {
                reason: format!("non-finite intercept {}", model.intercept()),
            });
        }

        let grid = uniform_grid(
            Statistics::min(x_norm.iter()),
            Statistics::max(x_norm.iter()),
            TREND_GRID_POINTS,
        )?;
        let (first_ts, last_ts) = set.time_bounds();
        let last_index = TREND_GRID_POINTS - 1;

        let mut points = Vec::with_capacity(TREND_GRID_POINTS);
        for (index, &x) in grid.iter().enumerate() {
            let log_magnitude = model.predict_one(x);
            let magnitude = 10f64.powf(log_magnitude);
            if !(magnitude.is_finite() && magnitude > 0.0) {
                return Err(TrendError::InvalidGridValue { index, value: log_magnitude });
            }
            let timestamp = match index {
                0 => first_ts,
                i if i == last_index => last_ts,
                _ => datetime_after(index, &origin, scaler.inverse_one(x))?,
            };
            points.push(TrendPoint { timestamp, magnitude });
        }

        let diagnostics = FitDiagnostics {
            n_observations: set.len(),
            n_support: model.n_support(),
            c: self.options.svr.c,
            gamma: model.gamma(),
            intercept: model.intercept(),
            objective: outcome.objective,
            iterations: outcome.iterations,
            status: outcome.status,
            converged: outcome.converged,
            fn_evals: outcome.fn_evals,
        };
        Ok(FittedCurve::new(points, origin, scaler, diagnostics))
    }
}

/// Compute the trend curve of `observations`.
///
/// Validates the observations, then delegates to [`TrendEstimator::estimate`].
/// Use `TrendOptions::default()` for per-group lines (`C = 10`) and
/// `TrendOptions::aggregate()` for the line over every observation
/// (`C = 100`).
///
/// # Errors
/// - `TrendError::EmptySample`, `NonFiniteMagnitude`, `NonPositiveMagnitude`
///   before any fitting.
/// - Any error of [`TrendEstimator::estimate`].
pub fn compute_trend(
    observations: &[Observation], options: &TrendOptions,
) -> TrendResult<FittedCurve> {
    let set = ObservationSet::new(observations.to_vec())?;
    TrendEstimator::new(*options).estimate(&set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svr::{SvrError, Tolerances};
    use approx::assert_abs_diff_eq;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Shape of the output curve (size, order, endpoints, positivity).
    // - Rejection of degenerate or invalid samples before fitting.
    // - Short spans far from the epoch (microseconds, nanoseconds).
    // - Mapping of a capped solver run to `NotConverged`.
    // - Diagnostics recorded on the curve.
    //
    // They intentionally DO NOT cover:
    // - Statistical properties over larger samples; see
    //   `tests/integration_trend_pipeline.rs`.
    // -------------------------------------------------------------------------

    fn ymd(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).single().expect("valid calendar date")
    }

    fn three_year_sample() -> Vec<Observation> {
        vec![
            Observation::new(ymd(2020, 1, 1), 1.0),
            Observation::new(ymd(2021, 1, 1), 10.0),
            Observation::new(ymd(2022, 1, 1), 100.0),
        ]
    }

    #[test]
    // Purpose
    // -------
    // The curve has the documented shape.
    //
    // Given
    // -----
    // - Three yearly observations with magnitudes 1, 10, 100 (shuffled order).
    //
    // Expect
    // ------
    // - 100 points, strictly ascending timestamps, first/last equal to the
    //   earliest/latest observation, every magnitude > 0.
    fn curve_has_documented_shape() {
        let mut obs = three_year_sample();
        obs.swap(0, 2);

        let curve = compute_trend(&obs, &TrendOptions::default()).expect("trend should fit");

        assert_eq!(curve.len(), TREND_GRID_POINTS);
        assert_eq!(curve.first().map(|p| p.timestamp), Some(ymd(2020, 1, 1)));
        assert_eq!(curve.last().map(|p| p.timestamp), Some(ymd(2022, 1, 1)));
        for w in curve.points().windows(2) {
            assert!(w[0].timestamp < w[1].timestamp);
        }
        assert!(curve.iter().all(|p| p.magnitude > 0.0));
    }

    #[test]
    // Purpose
    // -------
    // The scaler fitted on the sample and the regression diagnostics are kept
    // on the curve.
    //
    // Given
    // -----
    // - The three-year sample.
    //
    // Expect
    // ------
    // - The time origin is the earliest observation, the mean time equals the
    //   middle observation (2021-01-01 ± 0.5 day, 2020 being a leap year),
    //   and diagnostics report a converged run over
    //   3 observations with the default `C`.
    fn scaler_and_diagnostics_are_recorded() {
        let curve = compute_trend(&three_year_sample(), &TrendOptions::default())
            .expect("trend should fit");
        let mid = Observation::new(ymd(2021, 1, 1), 1.0).epoch_seconds();

        assert_eq!(curve.time_origin(), ymd(2020, 1, 1));
        assert_abs_diff_eq!(curve.mean_epoch_seconds(), mid, epsilon = 43_200.0);
        let diag = curve.diagnostics();
        assert!(diag.converged);
        assert_eq!(diag.n_observations, 3);
        assert_eq!(diag.c, 10.0);
        assert!(diag.n_support <= 3);
        assert!(diag.gamma > 0.0);
    }

    #[test]
    fn identical_timestamps_are_degenerate() {
        let t = ymd(2023, 3, 14);
        let obs = vec![Observation::new(t, 7.0), Observation::new(t, 70.0)];

        assert!(matches!(
            compute_trend(&obs, &TrendOptions::default()),
            Err(TrendError::DegenerateTimeRange { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // A span of one microsecond in 2020 still yields a strictly ascending
    // curve: time is measured from the earliest observation, not from 1970.
    //
    // Given
    // -----
    // - Two observations at 2020-01-01 and one microsecond later.
    //
    // Expect
    // ------
    // - 100 points with strictly ascending timestamps and exact endpoints.
    fn microsecond_span_stays_strictly_ascending() {
        let t0 = ymd(2020, 1, 1);
        let t1 = t0 + TimeDelta::microseconds(1);
        let obs = vec![Observation::new(t1, 10.0), Observation::new(t0, 1.0)];

        let curve = compute_trend(&obs, &TrendOptions::default()).expect("trend should fit");

        assert_eq!(curve.len(), TREND_GRID_POINTS);
        assert_eq!(curve.first().map(|p| p.timestamp), Some(t0));
        assert_eq!(curve.last().map(|p| p.timestamp), Some(t1));
        for w in curve.points().windows(2) {
            assert!(w[0].timestamp < w[1].timestamp, "{} !< {}", w[0].timestamp, w[1].timestamp);
        }
    }

    #[test]
    // Purpose
    // -------
    // Two distinct timestamps 50 ns apart are a valid sample. With 100 points
    // and nanosecond timestamps, neighbours may share an instant but never
    // go backwards.
    //
    // Given
    // -----
    // - Two observations at 2020-01-01 and 50 ns later.
    //
    // Expect
    // ------
    // - A 100-point curve with exact endpoints, non-decreasing timestamps
    //   inside `[t0, t0 + 50 ns]`.
    fn nanosecond_span_is_not_degenerate() {
        let t0 = ymd(2020, 1, 1);
        let t1 = t0 + TimeDelta::nanoseconds(50);
        let obs = vec![Observation::new(t0, 2.0), Observation::new(t1, 3.0)];

        let curve = compute_trend(&obs, &TrendOptions::default()).expect("distinct timestamps fit");

        assert_eq!(curve.len(), TREND_GRID_POINTS);
        assert_eq!(curve.first().map(|p| p.timestamp), Some(t0));
        assert_eq!(curve.last().map(|p| p.timestamp), Some(t1));
        for w in curve.points().windows(2) {
            assert!(w[0].timestamp <= w[1].timestamp);
        }
        assert!(curve.iter().all(|p| p.timestamp >= t0 && p.timestamp <= t1));
        assert!(curve.scaler().std() > 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Invalid samples fail validation before any regression work.
    //
    // Given
    // -----
    // - An empty slice and a sample with a negative magnitude.
    //
    // Expect
    // ------
    // - `EmptySample` and `NonPositiveMagnitude { index: 1 }`.
    fn invalid_samples_fail_validation() {
        let bad = vec![
            Observation::new(ymd(2020, 1, 1), 1.0),
            Observation::new(ymd(2021, 1, 1), -3.0),
        ];

        assert_eq!(compute_trend(&[], &TrendOptions::default()), Err(TrendError::EmptySample));
        assert_eq!(
            compute_trend(&bad, &TrendOptions::default()),
            Err(TrendError::NonPositiveMagnitude { index: 1, value: -3.0 })
        );
    }

    #[test]
    // Purpose
    // -------
    // A solver run stopped by the iteration cap is not turned into a curve.
    //
    // Given
    // -----
    // - Five irregular observations, `max_iter = 1`, and a tolerance far below
    //   what one SMO step can reach.
    //
    // Expect
    // ------
    // - `TrendError::NotConverged` with `iterations = 1`.
    fn capped_solver_run_is_not_converged() {
        let tols = Tolerances::new(1e-12, Some(1)).expect("valid tolerances");
        let opts = TrendOptions::default().with_tolerances(tols);

        let obs = vec![
            Observation::new(ymd(2019, 6, 1), 0.3),
            Observation::new(ymd(2020, 1, 1), 1.5),
            Observation::new(ymd(2020, 9, 1), 2.0),
            Observation::new(ymd(2021, 5, 1), 40.0),
            Observation::new(ymd(2022, 1, 1), 90.0),
        ];

        let err = compute_trend(&obs, &opts).unwrap_err();

        assert!(matches!(err, TrendError::NotConverged { iterations: 1, .. }), "got {err:?}");
    }

    #[test]
    fn invalid_options_surface_as_backend_errors() {
        let mut opts = TrendOptions::default();
        opts.svr.epsilon = -1.0;

        assert!(matches!(
            compute_trend(&three_year_sample(), &opts),
            Err(TrendError::Svr(SvrError::InvalidEpsilon { .. }))
        ));
    }
}
