//! Helpers shared by the Python bindings.
//!
//! The option builder is plain Rust so it can be unit tested without an
//! interpreter; the array extractors are compiled only with the
//! `python-bindings` feature.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

#[cfg(feature = "python-bindings")]
use crate::trend::core::data::ObservationSet;
use crate::{
    svr::{SvrOptions, Tolerances},
    trend::{core::options::TrendOptions, errors::TrendResult},
};

/// Assemble validated [`TrendOptions`] from the flat keyword arguments the
/// bindings accept.
///
/// Unset values fall back to the per-group defaults (`C = 10`, `ε = 0.1`,
/// `tol = 1e-3`, default iteration cap).
///
/// # Errors
/// - `TrendError::Svr(..)` for any invalid value.
pub fn build_trend_options(
    c: Option<f64>, epsilon: Option<f64>, tol: Option<f64>, max_iter: Option<usize>,
    verbose: bool,
) -> TrendResult<TrendOptions> {
    let base = TrendOptions::default().svr;
    let tols = Tolerances::new(tol.unwrap_or(base.tols.tol), max_iter)?;
    let svr = SvrOptions {
        c: c.unwrap_or(base.c),
        epsilon: epsilon.unwrap_or(base.epsilon),
        tols,
        verbose,
        ..base
    };
    TrendOptions::with_svr(svr)
}

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Copy a Python array-like of float64 into a `Vec<f64>`.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_vec<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>, name: &str,
) -> PyResult<Vec<f64>> {
    let arr = extract_f64_array(py, raw_data)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err(format!("{name} must be a 1-D contiguous float64 array or sequence"))
    })?;
    Ok(slice.to_vec())
}

/// Build a validated [`ObservationSet`] from epoch-seconds timestamps and
/// magnitudes given as Python array-likes.
#[cfg(feature = "python-bindings")]
pub fn extract_observations<'py>(
    py: Python<'py>, timestamps: &Bound<'py, PyAny>, magnitudes: &Bound<'py, PyAny>,
) -> PyResult<ObservationSet> {
    let ts = extract_f64_vec(py, timestamps, "timestamps")?;
    let mags = extract_f64_vec(py, magnitudes, "magnitudes")?;
    Ok(ObservationSet::from_epoch_seconds(&ts, &mags)?)
}
