//! Standardization of the time axis.
//!
//! [`StandardScaler`] centers time values (seconds since the sample's
//! earliest observation) on their mean and divides by the population
//! standard deviation, so the regression sees inputs of order one regardless
//! of the calendar period or span. It is fitted fresh for every sample and
//! kept on the resulting curve to map grid points back to time.
use crate::trend::errors::{TrendError, TrendResult};
use statrs::statistics::Statistics;

/// Affine map `x ↦ (x − mean) / std` and its inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardScaler {
    mean: f64,
    std: f64,
}

impl StandardScaler {
    /// Fit mean and population standard deviation of `values`.
    ///
    /// # Errors
    /// - `TrendError::EmptySample` if `values` is empty.
    /// - `TrendError::DegenerateTimeRange` if all values coincide (or the
    ///   spread is not a finite positive number).
    pub fn fit(values: &[f64]) -> TrendResult<Self> {
        if values.is_empty() {
            return Err(TrendError::EmptySample);
        }
        let mean = values.iter().mean();
        let std = values.iter().population_std_dev();
        let span_seconds = Statistics::max(values.iter()) - Statistics::min(values.iter());

        if !(std.is_finite() && std > 0.0 && span_seconds > 0.0) {
            return Err(TrendError::DegenerateTimeRange { std, span_seconds });
        }
        Ok(Self { mean, std })
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std(&self) -> f64 {
        self.std
    }

    #[inline]
    pub fn transform_one(&self, x: f64) -> f64 {
        (x - self.mean) / self.std
    }

    #[inline]
    pub fn inverse_one(&self, x_norm: f64) -> f64 {
        self.mean + x_norm * self.std
    }

    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&x| self.transform_one(x)).collect()
    }

    pub fn inverse(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&x| self.inverse_one(x)).collect()
    }
}
