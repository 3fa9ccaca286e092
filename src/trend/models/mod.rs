pub mod estimator;
pub mod grouped;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::estimator::{compute_trend, TrendEstimator};
pub use self::grouped::{
    compute_grouped_trends, compute_trend_overview, partition_by_key, TrendOverview,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use llm_trend::trend::models::prelude::*;
//
// to import the estimator entry points in a single line.

pub mod prelude {
    pub use super::estimator::{compute_trend, TrendEstimator};
    pub use super::grouped::{compute_grouped_trends, compute_trend_overview};
}
