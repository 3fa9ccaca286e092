//! llm_trend — smoothed growth trends for model sizes over time, with Python
//! bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that exposes
//! the trend estimator to Python via the `_llm_trend` extension module. When
//! the `python-bindings` feature is enabled, this module defines the
//! Python-facing classes, functions, and submodules used by the `llm_trend`
//! package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust modules (`trend` and `svr`) as the public crate
//!   surface.
//! - Define the `TrendCurve` `#[pyclass]`, the `compute_trend` /
//!   `compute_grouped_trends` functions, and the `#[pymodule]` initializer
//!   for `_llm_trend`.
//! - Create and register the `trend` submodule under `llm_trend` so that
//!   dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in the inner Rust modules; this file
//!   performs only FFI glue, input conversion, and error mapping.
//! - Timestamps cross the boundary as real seconds since the Unix epoch (UTC).
//!
//! Conventions
//! -----------
//! - Python-exposed items live under `_llm_trend.trend` and are typically
//!   wrapped by a thin pure-Python facade that converts datetimes.
//! - Errors from core Rust code are propagated as [`trend::TrendError`]
//!   internally and converted to `ValueError` at the PyO3 boundary.
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend on [`trend`] (or `trend::prelude`) and can
//!   ignore the PyO3 items guarded by the `python-bindings` feature.
//! - [`svr`] is public for callers who need the regression backend alone.
//!
//! Testing notes
//! -------------
//! - Numerical behavior is covered by unit tests in the inner modules and by
//!   `tests/integration_trend_pipeline.rs`.

pub mod svr;
pub mod trend;
pub mod utils;

#[cfg(feature = "python-bindings")]
use std::collections::BTreeMap;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    trend::{
        core::{curve::FittedCurve, data::Observation},
        models::{compute_grouped_trends as grouped_trends, TrendEstimator},
    },
    utils::{build_trend_options, extract_f64_vec, extract_observations},
};

/// TrendCurve — Python-facing wrapper for a fitted trend.
///
/// Purpose
/// -------
/// Hold one [`FittedCurve`] for Python callers and expose its columns and
/// diagnostics as properties.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `TrendCurve(timestamps, magnitudes, c=10.0, epsilon=0.1, tol=1e-3,
/// max_iter=None, verbose=False)`, or returned by `compute_trend`:
/// - `timestamps`: array-like of epoch seconds.
/// - `magnitudes`: array-like of strictly positive values, same length.
/// - `c`, `epsilon`, `tol`, `max_iter`, `verbose`: regression settings.
///
/// Notes
/// -----
/// - `timestamps` / `magnitudes` getters copy 100 values into Python lists.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "llm_trend.trend")]
pub struct TrendCurve {
    inner: FittedCurve,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl TrendCurve {
    #[new]
    #[allow(clippy::too_many_arguments)]
    #[pyo3(
        text_signature = "(timestamps, magnitudes, /, c=10.0, epsilon=0.1, tol=1e-3, max_iter=None, verbose=False)",
        signature = (timestamps, magnitudes, c = 10.0, epsilon = 0.1, tol = 1e-3, max_iter = None, verbose = false)
    )]
    pub fn new<'py>(
        py: Python<'py>, timestamps: &Bound<'py, PyAny>, magnitudes: &Bound<'py, PyAny>, c: f64,
        epsilon: f64, tol: f64, max_iter: Option<usize>, verbose: bool,
    ) -> PyResult<TrendCurve> {
        let set = extract_observations(py, timestamps, magnitudes)?;
        let options = build_trend_options(Some(c), Some(epsilon), Some(tol), max_iter, verbose)?;
        let inner = TrendEstimator::new(options).estimate(&set)?;
        Ok(TrendCurve { inner })
    }

    /// Curve timestamps as epoch seconds, ascending.
    #[getter]
    pub fn timestamps(&self) -> Vec<f64> {
        self.inner.epoch_seconds().to_vec()
    }

    /// Curve magnitudes, strictly positive.
    #[getter]
    pub fn magnitudes(&self) -> Vec<f64> {
        self.inner.magnitudes().to_vec()
    }

    /// Mean of the sample's epoch seconds used for normalization.
    #[getter]
    pub fn mean(&self) -> f64 {
        self.inner.mean_epoch_seconds()
    }

    /// Population standard deviation of the sample's timestamps, in seconds.
    #[getter]
    pub fn std(&self) -> f64 {
        self.inner.scaler().std()
    }

    #[getter]
    pub fn c(&self) -> f64 {
        self.inner.diagnostics().c
    }

    #[getter]
    pub fn n_support(&self) -> usize {
        self.inner.diagnostics().n_support
    }

    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.diagnostics().iterations
    }

    #[getter]
    pub fn converged(&self) -> bool {
        self.inner.diagnostics().converged
    }

    #[getter]
    pub fn status(&self) -> String {
        self.inner.diagnostics().status.clone()
    }

    #[getter]
    pub fn fn_evals(&self) -> Vec<(String, u64)> {
        self.inner.diagnostics().fn_evals.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}

/// Fit one trend curve; same arguments as the `TrendCurve` constructor.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[allow(clippy::too_many_arguments)]
#[pyo3(
    text_signature = "(timestamps, magnitudes, /, c=10.0, epsilon=0.1, tol=1e-3, max_iter=None, verbose=False)",
    signature = (timestamps, magnitudes, c = 10.0, epsilon = 0.1, tol = 1e-3, max_iter = None, verbose = false)
)]
pub fn compute_trend<'py>(
    py: Python<'py>, timestamps: &Bound<'py, PyAny>, magnitudes: &Bound<'py, PyAny>, c: f64,
    epsilon: f64, tol: f64, max_iter: Option<usize>, verbose: bool,
) -> PyResult<TrendCurve> {
    TrendCurve::new(py, timestamps, magnitudes, c, epsilon, tol, max_iter, verbose)
}

/// Fit one trend per key.
///
/// Returns a dict mapping every key to a `TrendCurve`, or to `None` when that
/// group cannot be fitted (e.g. a single observation).
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[allow(clippy::too_many_arguments)]
#[pyo3(
    text_signature = "(keys, timestamps, magnitudes, /, c=10.0, epsilon=0.1, tol=1e-3, max_iter=None)",
    signature = (keys, timestamps, magnitudes, c = 10.0, epsilon = 0.1, tol = 1e-3, max_iter = None)
)]
pub fn compute_grouped_trends<'py>(
    py: Python<'py>, keys: Vec<String>, timestamps: &Bound<'py, PyAny>,
    magnitudes: &Bound<'py, PyAny>, c: f64, epsilon: f64, tol: f64, max_iter: Option<usize>,
) -> PyResult<BTreeMap<String, Option<TrendCurve>>> {
    let ts = extract_f64_vec(py, timestamps, "timestamps")?;
    let mags = extract_f64_vec(py, magnitudes, "magnitudes")?;
    if ts.len() != mags.len() {
        return Err(crate::trend::TrendError::LengthMismatch {
            timestamps: ts.len(),
            magnitudes: mags.len(),
        }
        .into());
    }
    if keys.len() != ts.len() {
        return Err(pyo3::exceptions::PyValueError::new_err(format!(
            "keys and timestamps must have equal length: {} vs {}",
            keys.len(),
            ts.len()
        )));
    }
    let options = build_trend_options(Some(c), Some(epsilon), Some(tol), max_iter, false)?;
    let records = keys
        .into_iter()
        .zip(ts.iter().zip(mags.iter()))
        .map(|(key, (&seconds, &magnitude))| {
            Ok((key, Observation::from_epoch_seconds(seconds, magnitude)?))
        })
        .collect::<PyResult<Vec<_>>>()?;

    Ok(grouped_trends(records, &options)
        .into_iter()
        .map(|(key, result)| (key, result.ok().map(|inner| TrendCurve { inner })))
        .collect())
}

/// _llm_trend — PyO3 module initializer for the Python extension.
///
/// Purpose
/// -------
/// Define the `_llm_trend` Python module and register the `trend` submodule
/// used by the public `llm_trend` package.
///
/// Errors
/// ------
/// - `PyErr`
///   If creating the submodule or manipulating `sys.modules` fails.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _llm_trend<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let trend_mod = PyModule::new(_py, "trend")?;
    trend_functions(_py, m, &trend_mod)?;

    // Manually add the submodule into sys.modules to allow for dot notation.
    _py.import("sys")?.getattr("modules")?.set_item("llm_trend.trend", trend_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn trend_functions<'py>(
    _py: Python, llm_trend: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<TrendCurve>()?;
    m.add_function(wrap_pyfunction!(compute_trend, m)?)?;
    m.add_function(wrap_pyfunction!(compute_grouped_trends, m)?)?;
    llm_trend.add_submodule(m)?;
    Ok(())
}
