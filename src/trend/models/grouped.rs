//! Grouped trends: one independent curve per key plus an overall curve.
//!
//! A chart of model sizes draws one trend per architecture family and one
//! over every model. Each group is fitted on its own observations with its
//! own time normalization, and a group that cannot be fitted (a single
//! model, or all models released the same day) yields an error for that key
//! only.
use crate::trend::{
    core::{curve::FittedCurve, data::Observation, options::TrendOptions},
    errors::TrendResult,
    models::estimator::compute_trend,
};
use std::collections::BTreeMap;

/// Per-group curves and the curve over all observations.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendOverview<K> {
    pub overall: TrendResult<FittedCurve>,
    pub groups: BTreeMap<K, TrendResult<FittedCurve>>,
}

/// Split keyed records into per-key observation lists, keys in order.
pub fn partition_by_key<K, I>(records: I) -> BTreeMap<K, Vec<Observation>>
where
    K: Ord,
    I: IntoIterator<Item = (K, Observation)>,
{
    let mut groups: BTreeMap<K, Vec<Observation>> = BTreeMap::new();
    for (key, obs) in records {
        groups.entry(key).or_default().push(obs);
    }
    groups
}

/// Fit one trend per key.
///
/// Every group is validated and fitted independently with `options`; the
/// result map holds one entry per distinct key.
pub fn compute_grouped_trends<K, I>(
    records: I, options: &TrendOptions,
) -> BTreeMap<K, TrendResult<FittedCurve>>
where
    K: Ord,
    I: IntoIterator<Item = (K, Observation)>,
{
    partition_by_key(records)
        .into_iter()
        .map(|(key, observations)| (key, compute_trend(&observations, options)))
        .collect()
}

/// Fit the per-group trends with `group_options` and the trend over every
/// record with `overall_options`.
///
/// Typical presets are `TrendOptions::default()` for groups and
/// `TrendOptions::aggregate()` for the overall line.
pub fn compute_trend_overview<K, I>(
    records: I, group_options: &TrendOptions, overall_options: &TrendOptions,
) -> TrendOverview<K>
where
    K: Ord,
    I: IntoIterator<Item = (K, Observation)>,
{
    let records: Vec<(K, Observation)> = records.into_iter().collect();
    let all: Vec<Observation> = records.iter().map(|(_, obs)| *obs).collect();

    let overall = compute_trend(&all, overall_options);
    let groups = compute_grouped_trends(records, group_options);
    TrendOverview { overall, groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trend::errors::TrendError;
    use chrono::{DateTime, TimeZone, Utc};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Partitioning of keyed records.
    // - Independence of group fits (errors stay local, scalers differ).
    // - The overall curve spanning every record.
    // -------------------------------------------------------------------------

    fn ymd(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).single().expect("valid calendar date")
    }

    fn records() -> Vec<(&'static str, Observation)> {
        vec![
            ("decoder", Observation::new(ymd(2019, 2, 14), 1.5)),
            ("encoder", Observation::new(ymd(2018, 10, 11), 0.34)),
            ("decoder", Observation::new(ymd(2020, 5, 28), 175.0)),
            ("encoder-decoder", Observation::new(ymd(2019, 10, 23), 11.0)),
            ("decoder", Observation::new(ymd(2022, 4, 4), 540.0)),
            ("encoder", Observation::new(ymd(2019, 7, 26), 0.355)),
        ]
    }

    #[test]
    fn partition_groups_by_key_in_order() {
        let groups = partition_by_key(records());

        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), [
            "decoder",
            "encoder",
            "encoder-decoder"
        ]);
        assert_eq!(groups["decoder"].len(), 3);
        assert_eq!(groups["encoder"].len(), 2);
        assert_eq!(groups["encoder-decoder"].len(), 1);
    }

    #[test]
    // Purpose
    // -------
    // A group that cannot be fitted does not affect the others, and each
    // group gets its own time normalization.
    //
    // Given
    // -----
    // - Three keys: "decoder" (3 records), "encoder" (2), "encoder-decoder" (1).
    //
    // Expect
    // ------
    // - "decoder" and "encoder" produce 100-point curves spanning their own
    //   time ranges, with different scaler means.
    // - "encoder-decoder" yields `DegenerateTimeRange`.
    fn failing_group_stays_local() {
        let out = compute_grouped_trends(records(), &TrendOptions::default());

        assert_eq!(out.len(), 3);
        let decoder = out["decoder"].as_ref().expect("decoder trend");
        let encoder = out["encoder"].as_ref().expect("encoder trend");
        assert_eq!(decoder.len(), 100);
        assert_eq!(encoder.len(), 100);
        assert_eq!(decoder.first().map(|p| p.timestamp), Some(ymd(2019, 2, 14)));
        assert_eq!(encoder.last().map(|p| p.timestamp), Some(ymd(2019, 7, 26)));
        assert_ne!(decoder.mean_epoch_seconds(), encoder.mean_epoch_seconds());
        assert!(matches!(
            out["encoder-decoder"],
            Err(TrendError::DegenerateTimeRange { .. })
        ));
    }

    #[test]
    fn overview_fits_overall_line_with_its_own_options() {
        let overview = compute_trend_overview(
            records(),
            &TrendOptions::default(),
            &TrendOptions::aggregate(),
        );

        let overall = overview.overall.as_ref().expect("overall trend");
        assert_eq!(overall.diagnostics().n_observations, 6);
        assert_eq!(overall.diagnostics().c, 100.0);
        assert_eq!(overall.first().map(|p| p.timestamp), Some(ymd(2018, 10, 11)));
        assert_eq!(overall.last().map(|p| p.timestamp), Some(ymd(2022, 4, 4)));
        assert_eq!(overview.groups.len(), 3);
    }

    #[test]
    // Purpose
    // -------
    // Keys only need an ordering; owned, non-`Clone` keys are moved into the
    // result map.
    //
    // Given
    // -----
    // - Records keyed by a `Family` type without `Clone`, two families with
    //   two observations each.
    //
    // Expect
    // ------
    // - Both families fitted, and the overall curve spans all four records.
    fn overview_accepts_keys_without_clone() {
        #[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
        struct Family(u8);

        let records = vec![
            (Family(1), Observation::new(ymd(2019, 1, 1), 1.0)),
            (Family(2), Observation::new(ymd(2020, 1, 1), 5.0)),
            (Family(1), Observation::new(ymd(2021, 1, 1), 10.0)),
            (Family(2), Observation::new(ymd(2022, 1, 1), 50.0)),
        ];

        let overview =
            compute_trend_overview(records, &TrendOptions::default(), &TrendOptions::aggregate());

        assert_eq!(overview.groups.len(), 2);
        assert!(overview.groups.values().all(|curve| curve.is_ok()));
        let overall = overview.overall.as_ref().expect("overall trend");
        assert_eq!(overall.first().map(|p| p.timestamp), Some(ymd(2019, 1, 1)));
        assert_eq!(overall.last().map(|p| p.timestamp), Some(ymd(2022, 1, 1)));
    }
}
