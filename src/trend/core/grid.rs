//! Uniform resampling grid over the normalized time range.
use crate::trend::errors::{TrendError, TrendResult};
use ndarray::Array1;

/// `n` evenly spaced values from `start` to `end`, both included exactly.
///
/// # Errors
/// - `TrendError::InvalidGridValue` if an endpoint is non-finite.
pub fn uniform_grid(start: f64, end: f64, n: usize) -> TrendResult<Array1<f64>> {
    if !start.is_finite() {
        return Err(TrendError::InvalidGridValue { index: 0, value: start });
    }
    if !end.is_finite() {
        return Err(TrendError::InvalidGridValue { index: n.saturating_sub(1), value: end });
    }
    let mut grid = Array1::linspace(start, end, n);
    // linspace accumulates rounding; pin the last point to the bound.
    if n > 0 {
        grid[n - 1] = end;
    }
    Ok(grid)
}
