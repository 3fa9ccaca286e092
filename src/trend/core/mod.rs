//! trend::core — building blocks of the trend estimator.
//!
//! - [`data`]: validated observations and epoch-second conversions.
//! - [`scaler`]: per-sample standardization of the time axis.
//! - [`grid`]: uniform resampling grid in normalized time.
//! - [`options`]: regression presets for group and aggregate trends.
//! - [`curve`]: fitted curves and their diagnostics.
pub mod curve;
pub mod data;
pub mod grid;
pub mod options;
pub mod scaler;

pub use self::curve::{FitDiagnostics, FittedCurve, TrendPoint};
pub use self::data::{Observation, ObservationSet};
pub use self::options::{TrendOptions, AGGREGATE_TREND_C, DEFAULT_TREND_C, TREND_GRID_POINTS};
pub use self::scaler::StandardScaler;
