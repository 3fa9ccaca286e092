//! Observation containers for trend estimation.
//!
//! Purpose
//! -------
//! Provide small, validated containers for (timestamp, magnitude) samples.
//! This module centralizes input validation so the estimator can assume
//! finite, strictly positive magnitudes and representable timestamps.
//!
//! Key behaviors
//! -------------
//! - [`Observation`] pairs a UTC timestamp with a magnitude and converts the
//!   timestamp to real seconds since the Unix epoch (sub-second precision
//!   kept).
//! - [`ObservationSet`] enforces non-emptiness and magnitude validity at
//!   construction and exposes the transformed vectors the estimator needs.
//! - Offsets from the earliest observation ([`ObservationSet::offset_seconds`])
//!   are taken on chrono's exact nanosecond difference, so samples spanning
//!   microseconds far from 1970 keep distinct, evenly resolved times.
//!
//! Invariants & assumptions
//! ------------------------
//! - An `ObservationSet` is non-empty and every magnitude is finite and > 0.
//! - Order and duplicates carry no meaning; the set keeps the caller's order
//!   so error indices match the input.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based.
//! - Epoch seconds and offsets are `f64`; conversion from seconds rounds to
//!   the nearest nanosecond.
use crate::trend::errors::{TrendError, TrendResult};
use chrono::{DateTime, TimeDelta, Utc};

/// One data point: when a model was published and how large it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub magnitude: f64,
}

impl Observation {
    /// Pair a timestamp with a magnitude. Validation happens in
    /// [`ObservationSet::new`].
    pub fn new(timestamp: DateTime<Utc>, magnitude: f64) -> Self {
        Self { timestamp, magnitude }
    }

    /// Build an observation from real seconds since the Unix epoch.
    ///
    /// # Errors
    /// - `TrendError::NonFiniteTimestamp` for NaN/±inf seconds.
    /// - `TrendError::TimestampOutOfRange` if the instant is not representable.
    pub fn from_epoch_seconds(seconds: f64, magnitude: f64) -> TrendResult<Self> {
        let timestamp = datetime_from_epoch_seconds(0, seconds)?;
        Ok(Self { timestamp, magnitude })
    }

    /// Timestamp as real seconds since the Unix epoch.
    pub fn epoch_seconds(&self) -> f64 {
        epoch_seconds(&self.timestamp)
    }
}

/// Validated, non-empty collection of observations.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSet {
    observations: Vec<Observation>,
}

impl ObservationSet {
    /// Construct a validated set.
    ///
    /// # Errors
    /// - `TrendError::EmptySample` if `observations` is empty.
    /// - `TrendError::NonFiniteMagnitude` / `NonPositiveMagnitude` for the
    ///   first offending magnitude.
    pub fn new(observations: Vec<Observation>) -> TrendResult<Self> {
        if observations.is_empty() {
            return Err(TrendError::EmptySample);
        }
        for (index, obs) in observations.iter().enumerate() {
            let value = obs.magnitude;
            if !value.is_finite() {
                return Err(TrendError::NonFiniteMagnitude { index, value });
            }
            if value <= 0.0 {
                return Err(TrendError::NonPositiveMagnitude { index, value });
            }
        }
        Ok(Self { observations })
    }

    /// Construct a set from parallel epoch-seconds and magnitude slices.
    ///
    /// # Errors
    /// - `TrendError::LengthMismatch` if the slices differ in length.
    /// - Any timestamp conversion error, then any error of [`ObservationSet::new`].
    pub fn from_epoch_seconds(timestamps: &[f64], magnitudes: &[f64]) -> TrendResult<Self> {
        if timestamps.len() != magnitudes.len() {
            return Err(TrendError::LengthMismatch {
                timestamps: timestamps.len(),
                magnitudes: magnitudes.len(),
            });
        }
        let observations = timestamps
            .iter()
            .zip(magnitudes.iter())
            .enumerate()
            .map(|(index, (&seconds, &magnitude))| {
                datetime_from_epoch_seconds(index, seconds)
                    .map(|timestamp| Observation { timestamp, magnitude })
            })
            .collect::<TrendResult<Vec<_>>>()?;
        Self::new(observations)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Always `false` for a constructed set; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn as_slice(&self) -> &[Observation] {
        &self.observations
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    /// Timestamps as real seconds since the epoch, in input order.
    pub fn epoch_seconds(&self) -> Vec<f64> {
        self.observations.iter().map(Observation::epoch_seconds).collect()
    }

    /// Earliest timestamp and every timestamp's offset from it in real
    /// seconds, in input order.
    pub fn offset_seconds(&self) -> (DateTime<Utc>, Vec<f64>) {
        let (origin, _) = self.time_bounds();
        let offsets =
            self.observations.iter().map(|obs| seconds_between(&origin, &obs.timestamp)).collect();
        (origin, offsets)
    }

    /// `log10` of every magnitude, in input order.
    pub fn log_magnitudes(&self) -> Vec<f64> {
        self.observations.iter().map(|obs| obs.magnitude.log10()).collect()
    }

    /// Earliest and latest timestamps.
    pub fn time_bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let first = self.observations[0].timestamp;
        self.observations.iter().fold((first, first), |(lo, hi), obs| {
            (lo.min(obs.timestamp), hi.max(obs.timestamp))
        })
    }
}

impl<'a> IntoIterator for &'a ObservationSet {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

// ---- Helper Methods ----

/// Real seconds since the Unix epoch for a UTC timestamp.
pub fn epoch_seconds(timestamp: &DateTime<Utc>) -> f64 {
    timestamp.timestamp() as f64 + f64::from(timestamp.timestamp_subsec_nanos()) * 1e-9
}

/// Real seconds from `origin` to `timestamp` (negative if `timestamp` is
/// earlier). The difference is exact in nanoseconds before the `f64`
/// conversion.
pub fn seconds_between(origin: &DateTime<Utc>, timestamp: &DateTime<Utc>) -> f64 {
    let delta = *timestamp - *origin;
    let whole = delta.num_seconds();
    let nanos = TimeDelta::try_seconds(whole)
        .and_then(|secs| (delta - secs).num_nanoseconds())
        .unwrap_or(0);
    whole as f64 + nanos as f64 * 1e-9
}

/// Timestamp `seconds` after `origin`, rounded to the nearest nanosecond.
/// `index` is only used in error reports.
///
/// # Errors
/// - `TrendError::NonFiniteTimestamp` for NaN/±inf.
/// - `TrendError::TimestampOutOfRange` if chrono cannot represent the instant.
pub fn datetime_after(
    index: usize, origin: &DateTime<Utc>, seconds: f64,
) -> TrendResult<DateTime<Utc>> {
    if !seconds.is_finite() {
        return Err(TrendError::NonFiniteTimestamp { index, value: seconds });
    }
    let out_of_range =
        || TrendError::TimestampOutOfRange { seconds: epoch_seconds(origin) + seconds };
    let whole = seconds.floor();
    if whole < i64::MIN as f64 || whole >= i64::MAX as f64 {
        return Err(out_of_range());
    }
    let nanos = ((seconds - whole) * 1e9).round() as i64;
    let delta = TimeDelta::try_seconds(whole as i64)
        .and_then(|secs| secs.checked_add(&TimeDelta::nanoseconds(nanos)))
        .ok_or_else(out_of_range)?;
    origin.checked_add_signed(delta).ok_or_else(out_of_range)
}

/// Convert real epoch seconds to a UTC timestamp, rounding to the nearest
/// nanosecond. `index` is only used in error reports.
///
/// # Errors
/// - `TrendError::NonFiniteTimestamp` for NaN/±inf.
/// - `TrendError::TimestampOutOfRange` if chrono cannot represent the instant.
pub fn datetime_from_epoch_seconds(index: usize, seconds: f64) -> TrendResult<DateTime<Utc>> {
    datetime_after(index, &DateTime::<Utc>::UNIX_EPOCH, seconds)
}
