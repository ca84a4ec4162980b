//! Grouped Nelson-Aalen analysis of transition records
//!
//! This module partitions survival records by a grouping key, drops groups
//! with too few observations and estimates a cumulative hazard curve for each
//! remaining group.
//!
//! # Overview
//!
//! A stay in an SGF state ends either in a transition (event observed) or in
//! the end of the trial (right-censored). Censored stays still contribute to
//! the at-risk set up to their duration, so the Nelson-Aalen estimator gives
//! an unbiased picture of how quickly a state is left.
//!
//! Records can be grouped by:
//!
//! - **From-state**: [`HazardStatsMap::by_from_state`]
//! - **State pair**: [`HazardStatsMap::by_state_pair`]
//! - **Transition type**: [`HazardStatsMap::by_transition_type`]
//! - **From-components**: [`HazardStatsMap::by_from_components`]
//! - **Any key**: [`HazardStatsMap::collect_by_group`]
//!
//! Keys that refer to a state index missing from the catalog are skipped.
//! This includes the `-1` destination of censored records, so pair groups
//! only ever contain observed transitions.
//!
//! # Examples
//!
//! ```
//! use sgf_analysis::{
//!     catalog::StateCatalog,
//!     record::{SgfTriple, SurvivalRecord},
//!     survival::{GroupingOptions, HazardStatsMap},
//! };
//!
//! let catalog = StateCatalog::generate(3);
//! let records = (0..12)
//!     .map(|i| SurvivalRecord {
//!         from_index: 1,
//!         to_index: 0,
//!         duration: f64::from(i % 4 + 1),
//!         censored: i % 3 == 0,
//!         from_components: SgfTriple::new(2, 1, 0),
//!         to_components: SgfTriple::new(3, 0, 0),
//!     })
//!     .collect::<Vec<_>>();
//!
//! let stats = HazardStatsMap::by_from_state(&records, &catalog, GroupingOptions::new(10));
//! let group = &stats.map[&1];
//! assert_eq!(group.record_count, 12);
//! assert_eq!(group.censored_count, 4);
//! assert!(group.curve.final_cumulative_hazard() > 0.0);
//! ```

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;
use sgf_stats::{descriptive::DescriptiveStats, hazard::NelsonAalenCurve};
use tracing::debug;

use crate::{
    catalog::StateCatalog,
    record::{SgfTriple, SurvivalRecord},
    transition::TransitionType,
};

/// Default minimum group size when grouping by from-state
pub const DEFAULT_MIN_SAMPLES_BY_STATE: usize = 10;
/// Default minimum group size when grouping by state pair
pub const DEFAULT_MIN_SAMPLES_BY_PAIR: usize = 5;

/// Hazard statistics for a group of observations
#[derive(Debug, Clone, Serialize)]
pub struct HazardStats {
    /// Total number of observations
    pub record_count: usize,
    /// Number of observed transitions
    pub event_count: usize,
    /// Number of censored observations
    pub censored_count: usize,
    /// Durations of all observations, in record order
    #[serde(skip)]
    pub durations: Vec<f64>,
    /// Nelson-Aalen cumulative hazard curve
    pub curve: NelsonAalenCurve,
}

impl HazardStats {
    /// Calculate the statistics of one group of records.
    #[must_use]
    pub fn from_records(records: &[&SurvivalRecord]) -> Self {
        let record_count = records.len();
        let censored_count = records.iter().filter(|r| r.censored).count();
        let durations = records.iter().map(|r| r.duration).collect();
        let curve = NelsonAalenCurve::from_data(records.iter().map(|r| r.observation()));

        Self {
            record_count,
            event_count: record_count - censored_count,
            censored_count,
            durations,
            curve,
        }
    }

    #[must_use]
    pub fn duration_sum(&self) -> f64 {
        self.durations.iter().sum()
    }

    /// Fraction of observations that ended in a transition.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn event_rate(&self) -> f64 {
        if self.record_count == 0 {
            return 0.0;
        }
        self.event_count as f64 / self.record_count as f64
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn censoring_rate(&self) -> f64 {
        if self.record_count == 0 {
            return 0.0;
        }
        self.censored_count as f64 / self.record_count as f64
    }

    /// Naive mean of all durations, censored included.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean_duration(&self) -> f64 {
        if self.record_count == 0 {
            return 0.0;
        }
        self.duration_sum() / self.record_count as f64
    }

    /// Events per unit of observed time.
    ///
    /// A single-number approximation used for ranking groups. It is not the
    /// final value of [`curve`](Self::curve).
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn empirical_hazard_rate(&self) -> f64 {
        let total_time = self.duration_sum();
        if total_time > 0.0 {
            self.event_count as f64 / total_time
        } else {
            0.0
        }
    }

    /// Distribution of durations, `None` for an empty group.
    #[must_use]
    pub fn duration_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::new(self.durations.iter().copied())
    }
}

/// How records are turned into groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupingOptions {
    /// Groups with fewer records are not reported
    pub min_samples: usize,
    /// Estimate groups on the rayon thread pool
    pub parallel: bool,
}

impl GroupingOptions {
    #[must_use]
    pub fn new(min_samples: usize) -> Self {
        Self {
            min_samples,
            parallel: false,
        }
    }

    #[must_use]
    pub fn parallel(self, parallel: bool) -> Self {
        Self { parallel, ..self }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HazardStatsMap<K> {
    pub map: BTreeMap<K, HazardStats>,
}

impl<K> Default for HazardStatsMap<K> {
    fn default() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }
}

impl<K> HazardStatsMap<K> {
    /// Collect hazard statistics grouped by a custom key
    ///
    /// For each record, `group` computes the grouping key. Records for which
    /// it returns `None` are skipped. Groups with fewer than
    /// `options.min_samples` records are dropped, and a Nelson-Aalen curve is
    /// estimated for every remaining group.
    ///
    /// The result is ordered by key and does not depend on
    /// `options.parallel`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgf_analysis::{
    ///     record::{SgfTriple, SurvivalRecord},
    ///     survival::{GroupingOptions, HazardStatsMap},
    /// };
    ///
    /// let records: Vec<SurvivalRecord> = vec![];
    ///
    /// // Group by the number of stopped agents
    /// let stats = HazardStatsMap::collect_by_group(&records, GroupingOptions::new(1), |record| {
    ///     Some(record.from_components.fermo)
    /// });
    /// assert!(stats.map.is_empty());
    /// ```
    pub fn collect_by_group<F>(
        records: &[SurvivalRecord],
        options: GroupingOptions,
        group: F,
    ) -> Self
    where
        F: FnMut(&SurvivalRecord) -> Option<K>,
        K: Ord + Send,
    {
        let groups = partition(records, options.min_samples, group);

        let map = if options.parallel {
            groups
                .into_iter()
                .collect::<Vec<_>>()
                .into_par_iter()
                .map(|(key, members)| (key, HazardStats::from_records(&members)))
                .collect()
        } else {
            groups
                .into_iter()
                .map(|(key, members)| (key, HazardStats::from_records(&members)))
                .collect()
        };

        Self { map }
    }

    /// Re-keys the groups, e.g. to lift typed keys into a common key type.
    #[must_use]
    pub fn map_keys<K2, F>(self, mut f: F) -> HazardStatsMap<K2>
    where
        F: FnMut(K) -> K2,
        K2: Ord,
    {
        HazardStatsMap {
            map: self
                .map
                .into_iter()
                .map(|(key, stats)| (f(key), stats))
                .collect(),
        }
    }

    /// Number of records across all reported groups.
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.map.values().map(|stats| stats.record_count).sum()
    }
}

impl HazardStatsMap<i32> {
    /// Collect hazard statistics per from-state
    ///
    /// Typically used with [`DEFAULT_MIN_SAMPLES_BY_STATE`].
    pub fn by_from_state(
        records: &[SurvivalRecord],
        catalog: &StateCatalog,
        options: GroupingOptions,
    ) -> Self {
        Self::collect_by_group(records, options, |record| {
            catalog
                .contains(record.from_index)
                .then_some(record.from_index)
        })
    }
}

impl HazardStatsMap<(i32, i32)> {
    /// Collect hazard statistics per `(from_index, to_index)` pair
    ///
    /// Typically used with [`DEFAULT_MIN_SAMPLES_BY_PAIR`].
    pub fn by_state_pair(
        records: &[SurvivalRecord],
        catalog: &StateCatalog,
        options: GroupingOptions,
    ) -> Self {
        Self::collect_by_group(records, options, |record| {
            (catalog.contains(record.from_index) && catalog.contains(record.to_index))
                .then_some((record.from_index, record.to_index))
        })
    }
}

impl HazardStatsMap<TransitionType> {
    /// Collect hazard statistics per transition type
    pub fn by_transition_type(records: &[SurvivalRecord], options: GroupingOptions) -> Self {
        Self::collect_by_group(records, options, |record| Some(record.transition_type()))
    }
}

impl HazardStatsMap<SgfTriple> {
    /// Collect hazard statistics per from-state component triple
    pub fn by_from_components(records: &[SurvivalRecord], options: GroupingOptions) -> Self {
        Self::collect_by_group(records, options, |record| Some(record.from_components))
    }
}

fn partition<'a, K, F>(
    records: &'a [SurvivalRecord],
    min_samples: usize,
    mut group: F,
) -> BTreeMap<K, Vec<&'a SurvivalRecord>>
where
    K: Ord,
    F: FnMut(&SurvivalRecord) -> Option<K>,
{
    let mut groups: BTreeMap<K, Vec<&SurvivalRecord>> = BTreeMap::new();
    let mut unresolved = 0_usize;

    for record in records {
        match group(record) {
            Some(key) => groups.entry(key).or_default().push(record),
            None => unresolved += 1,
        }
    }

    let group_count = groups.len();
    groups.retain(|_, members| members.len() >= min_samples);

    debug!(
        records = records.len(),
        unresolved,
        groups = groups.len(),
        below_threshold = group_count - groups.len(),
        min_samples,
        "partitioned survival records"
    );

    groups
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn record(from_index: i32, to_index: i32, duration: f64, censored: bool) -> SurvivalRecord {
        let catalog = StateCatalog::generate(2);
        let from_components = catalog.get(from_index).unwrap_or(SgfTriple::new(-1, -1, -1));
        let to_components = catalog.get(to_index).unwrap_or(SgfTriple::new(-1, -1, -1));
        SurvivalRecord {
            from_index,
            to_index,
            duration,
            censored,
            from_components,
            to_components,
        }
    }

    fn repeat(n: usize, from_index: i32, to_index: i32) -> Vec<SurvivalRecord> {
        (1..=n)
            .map(|i| {
                let duration = f64::from(u32::try_from(i).unwrap());
                record(from_index, to_index, duration, false)
            })
            .collect()
    }

    #[test]
    fn test_worked_example_through_records() {
        let records = vec![
            record(0, 1, 1.0, false),
            record(0, 1, 1.0, false),
            record(0, -1, 2.0, true),
            record(0, 1, 3.0, false),
        ];
        let stats = HazardStatsMap::by_from_state(
            &records,
            &StateCatalog::generate(2),
            GroupingOptions::new(1),
        );

        let group = &stats.map[&0];
        assert_eq!(group.record_count, 4);
        assert_eq!(group.event_count, 3);
        assert_eq!(group.censored_count, 1);
        assert_eq!(group.curve.times, [1.0, 3.0]);
        assert_eq!(group.curve.cumulative_hazard, [0.5, 1.5]);
    }

    #[test]
    fn test_min_samples_threshold() {
        let k = DEFAULT_MIN_SAMPLES_BY_STATE;
        let mut records = repeat(k - 1, 0, 1);
        records.extend(repeat(k, 1, 0));

        let stats = HazardStatsMap::by_from_state(
            &records,
            &StateCatalog::generate(2),
            GroupingOptions::new(k),
        );
        assert!(!stats.map.contains_key(&0));
        assert_eq!(stats.map[&1].record_count, k);
    }

    #[test]
    fn test_pair_threshold() {
        let k = DEFAULT_MIN_SAMPLES_BY_PAIR;
        let mut records = repeat(k - 1, 0, 1);
        records.extend(repeat(k, 0, 3));

        let stats = HazardStatsMap::by_state_pair(
            &records,
            &StateCatalog::generate(2),
            GroupingOptions::new(k),
        );
        assert_eq!(stats.map.keys().copied().collect::<Vec<_>>(), [(0, 3)]);
    }

    #[test]
    fn test_unknown_states_are_skipped() {
        let mut records = repeat(3, 0, 1);
        records.extend(repeat(3, 42, 1));
        records.push(record(0, -1, 9.0, true));

        let catalog = StateCatalog::generate(2);
        let by_state = HazardStatsMap::by_from_state(&records, &catalog, GroupingOptions::new(1));
        assert_eq!(by_state.map.keys().copied().collect::<Vec<_>>(), [0]);
        assert_eq!(by_state.map[&0].record_count, 4);

        let by_pair = HazardStatsMap::by_state_pair(&records, &catalog, GroupingOptions::new(1));
        assert_eq!(by_pair.map.keys().copied().collect::<Vec<_>>(), [(0, 1)]);
        assert_eq!(by_pair.total_records(), 3);
    }

    #[test]
    fn test_by_transition_type() {
        // (2,0,0) -> (1,1,0) is Solo→Grupo, (1,1,0) -> (2,0,0) is Grupo→Solo
        let mut records = repeat(4, 0, 1);
        records.extend(repeat(2, 1, 0));
        records.push(record(1, -1, 5.0, true));

        let stats = HazardStatsMap::by_transition_type(&records, GroupingOptions::new(1));
        assert_eq!(stats.map[&TransitionType::SoloToGrupo].record_count, 4);
        assert_eq!(stats.map[&TransitionType::GrupoToSolo].record_count, 2);
        assert_eq!(stats.map[&TransitionType::Complex].censored_count, 1);
    }

    #[test]
    fn test_by_from_components() {
        let mut records = repeat(2, 0, 1);
        records.extend(repeat(3, 4, 1));
        let stats = HazardStatsMap::by_from_components(&records, GroupingOptions::new(1));
        assert_eq!(stats.map[&SgfTriple::new(2, 0, 0)].record_count, 2);
        assert_eq!(stats.map[&SgfTriple::new(0, 1, 1)].record_count, 3);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let records = (0..300)
            .map(|i| record(i % 6, (i + 1) % 6, f64::from(i % 17), i % 5 == 0))
            .collect::<Vec<_>>();
        let catalog = StateCatalog::generate(2);

        let sequential =
            HazardStatsMap::by_from_state(&records, &catalog, GroupingOptions::new(10));
        let parallel = HazardStatsMap::by_from_state(
            &records,
            &catalog,
            GroupingOptions::new(10).parallel(true),
        );

        assert_eq!(
            sequential.map.keys().collect::<Vec<_>>(),
            parallel.map.keys().collect::<Vec<_>>()
        );
        for (seq, par) in sequential.map.values().zip(parallel.map.values()) {
            assert_eq!(seq.curve, par.curve);
            assert_eq!(seq.durations, par.durations);
        }
    }

    #[test]
    fn test_group_statistics() {
        let records = vec![
            record(0, 1, 2.0, false),
            record(0, 1, 4.0, false),
            record(0, -1, 6.0, true),
        ];
        let members = records.iter().collect::<Vec<_>>();
        let stats = HazardStats::from_records(&members);

        assert_relative_eq!(stats.event_rate(), 2.0 / 3.0);
        assert_relative_eq!(stats.censoring_rate(), 1.0 / 3.0);
        assert_eq!(stats.mean_duration(), 4.0);
        assert_eq!(stats.empirical_hazard_rate(), 2.0 / 12.0);
        assert_eq!(stats.duration_stats().unwrap().median, 4.0);
    }

    #[test]
    fn test_empty_group_statistics() {
        let stats = HazardStats::from_records(&[]);
        assert_eq!(stats.event_rate(), 0.0);
        assert_eq!(stats.mean_duration(), 0.0);
        assert_eq!(stats.empirical_hazard_rate(), 0.0);
        assert!(stats.duration_stats().is_none());
        assert!(stats.curve.is_empty());
    }

    #[test]
    fn test_zero_durations_have_zero_hazard_rate() {
        let records = vec![record(0, 1, 0.0, false), record(0, 1, 0.0, false)];
        let members = records.iter().collect::<Vec<_>>();
        let stats = HazardStats::from_records(&members);
        assert_eq!(stats.empirical_hazard_rate(), 0.0);
        assert_eq!(stats.curve.cumulative_hazard, [1.0]);
    }
}
