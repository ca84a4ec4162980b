//! Ranked per-group summary statistics
//!
//! A [`SummaryTable`] turns a [`HazardStatsMap`] into one row of scalar
//! statistics per group, ranked by the number of records so the best-sampled
//! groups come first.

use std::cmp::Ordering;

use serde::Serialize;

use crate::survival::{HazardStats, HazardStatsMap};

/// One row of the summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow<K> {
    pub key: K,
    /// Display label of the group (e.g. `(2, 1, 0)` or `Grupo→Solo`)
    pub label: String,
    pub record_count: usize,
    pub event_count: usize,
    pub censored_count: usize,
    /// `event_count / record_count`
    pub event_rate: f64,
    pub mean_duration: f64,
    pub median_duration: f64,
    /// Sample standard deviation of the durations (`n - 1` denominator),
    /// `0.0` for fewer than two records
    pub std_duration: f64,
    /// `event_count / sum(duration)`
    pub empirical_hazard_rate: f64,
    /// Last value of the Nelson-Aalen curve, `0.0` if no event was observed
    pub final_cumulative_hazard: f64,
}

impl<K> SummaryRow<K> {
    #[must_use]
    pub fn new(key: K, label: String, stats: &HazardStats) -> Self {
        let (median_duration, std_duration) = stats
            .duration_stats()
            .map_or((0.0, 0.0), |d| (d.median, d.sample_std_dev));

        Self {
            key,
            label,
            record_count: stats.record_count,
            event_count: stats.event_count,
            censored_count: stats.censored_count,
            event_rate: stats.event_rate(),
            mean_duration: stats.mean_duration(),
            median_duration,
            std_duration,
            empirical_hazard_rate: stats.empirical_hazard_rate(),
            final_cumulative_hazard: stats.curve.final_cumulative_hazard(),
        }
    }
}

/// Groups that stand out in a summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights<'a, K> {
    /// Group with the most records
    pub most_active: &'a SummaryRow<K>,
    pub highest_event_rate: &'a SummaryRow<K>,
    pub highest_final_hazard: &'a SummaryRow<K>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable<K> {
    /// Rows sorted by `record_count` descending, ties in key order
    pub rows: Vec<SummaryRow<K>>,
}

impl<K> SummaryTable<K> {
    /// Builds the ranked table.
    ///
    /// # Arguments
    ///
    /// * `stats` - Per-group hazard statistics
    /// * `label` - Computes the display label of a group key
    ///
    /// # Examples
    ///
    /// ```
    /// use sgf_analysis::{
    ///     record::{SgfTriple, SurvivalRecord},
    ///     summary::SummaryTable,
    ///     survival::{GroupingOptions, HazardStatsMap},
    /// };
    ///
    /// let record = |fermo: i32, duration: f64| SurvivalRecord {
    ///     from_index: 0,
    ///     to_index: 1,
    ///     duration,
    ///     censored: false,
    ///     from_components: SgfTriple::new(2 - fermo, 0, fermo),
    ///     to_components: SgfTriple::new(1 - fermo, 1, fermo),
    /// };
    /// let records = vec![record(0, 1.0), record(1, 2.0), record(1, 3.0)];
    ///
    /// let stats = HazardStatsMap::collect_by_group(&records, GroupingOptions::new(1), |r| {
    ///     Some(r.from_components.fermo)
    /// });
    /// let table = SummaryTable::from_map(&stats, |fermo| format!("fermo={fermo}"));
    ///
    /// assert_eq!(table.rows[0].label, "fermo=1");
    /// assert_eq!(table.rows[0].record_count, 2);
    /// assert_eq!(table.rows[0].empirical_hazard_rate, 2.0 / 5.0);
    /// ```
    pub fn from_map<F>(stats: &HazardStatsMap<K>, mut label: F) -> Self
    where
        K: Clone,
        F: FnMut(&K) -> String,
    {
        let mut rows = stats
            .map
            .iter()
            .map(|(key, stats)| SummaryRow::new(key.clone(), label(key), stats))
            .collect::<Vec<_>>();
        // `sort_by` is stable, so equal counts stay in key order
        rows.sort_by(|a, b| b.record_count.cmp(&a.record_count));
        Self { rows }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first `n` rows of the ranking.
    #[must_use]
    pub fn top(&self, n: usize) -> &[SummaryRow<K>] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Rows ordered by empirical hazard rate, highest first.
    #[must_use]
    pub fn ranked_by_hazard_rate(&self) -> Vec<&SummaryRow<K>> {
        let mut rows = self.rows.iter().collect::<Vec<_>>();
        rows.sort_by(|a, b| b.empirical_hazard_rate.total_cmp(&a.empirical_hazard_rate));
        rows
    }

    /// Picks the most active group and the groups with the highest event rate
    /// and final cumulative hazard. `None` for an empty table.
    ///
    /// Ties go to the row ranked first.
    #[must_use]
    pub fn insights(&self) -> Option<Insights<'_, K>> {
        let most_active = self.rows.first()?;
        let highest_event_rate = max_by(&self.rows, |row| row.event_rate)?;
        let highest_final_hazard = max_by(&self.rows, |row| row.final_cumulative_hazard)?;
        Some(Insights {
            most_active,
            highest_event_rate,
            highest_final_hazard,
        })
    }
}

fn max_by<T>(rows: &[T], mut value: impl FnMut(&T) -> f64) -> Option<&T> {
    rows.iter().reduce(|best, row| {
        if value(row).total_cmp(&value(best)) == Ordering::Greater {
            row
        } else {
            best
        }
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{
        record::{SgfTriple, SurvivalRecord},
        survival::GroupingOptions,
    };

    fn record(from_index: i32, duration: f64, censored: bool) -> SurvivalRecord {
        SurvivalRecord {
            from_index,
            to_index: if censored { -1 } else { 0 },
            duration,
            censored,
            from_components: SgfTriple::new(1, 1, 0),
            to_components: if censored {
                SgfTriple::new(-1, -1, -1)
            } else {
                SgfTriple::new(2, 0, 0)
            },
        }
    }

    fn table(records: &[SurvivalRecord]) -> SummaryTable<i32> {
        let stats = HazardStatsMap::collect_by_group(records, GroupingOptions::new(1), |r| {
            Some(r.from_index)
        });
        SummaryTable::from_map(&stats, ToString::to_string)
    }

    #[test]
    fn test_sorted_by_count_with_stable_ties() {
        let records = vec![
            record(5, 1.0, false),
            record(2, 1.0, false),
            record(9, 1.0, false),
            record(9, 2.0, false),
            record(7, 1.0, false),
        ];
        let table = table(&records);
        let keys = table.rows.iter().map(|r| r.key).collect::<Vec<_>>();
        assert_eq!(keys, [9, 2, 5, 7]);
    }

    #[test]
    fn test_row_statistics() {
        let records = vec![
            record(1, 1.0, false),
            record(1, 1.0, false),
            record(1, 2.0, true),
            record(1, 3.0, false),
        ];
        let table = table(&records);
        let row = &table.rows[0];

        assert_eq!(row.label, "1");
        assert_eq!(row.record_count, 4);
        assert_eq!(row.event_count, 3);
        assert_eq!(row.censored_count, 1);
        assert_eq!(row.event_rate, 0.75);
        assert_eq!(row.mean_duration, 1.75);
        assert_eq!(row.median_duration, 1.5);
        assert_relative_eq!(row.std_duration, (2.75_f64 / 3.0).sqrt());
        assert_eq!(row.empirical_hazard_rate, 3.0 / 7.0);
        assert_eq!(row.final_cumulative_hazard, 1.5);
    }

    #[test]
    fn test_std_duration_uses_sample_denominator() {
        let records = (1..=4)
            .map(|d| record(1, f64::from(d), false))
            .collect::<Vec<_>>();
        let spread = table(&records);
        assert_relative_eq!(spread.rows[0].std_duration, 1.290_994_448_735_805_6);

        let single = table(&[record(2, 3.0, false)]);
        assert_eq!(single.rows[0].std_duration, 0.0);
    }

    #[test]
    fn test_hazard_rate_is_independent_of_curve() {
        let records = vec![record(1, 4.0, false), record(1, 4.0, true)];
        let table = table(&records);
        let row = &table.rows[0];
        assert_eq!(row.empirical_hazard_rate, 1.0 / 8.0);
        assert_eq!(row.final_cumulative_hazard, 0.5);
    }

    #[test]
    fn test_all_censored_group() {
        let records = vec![record(3, 2.0, true), record(3, 5.0, true)];
        let table = table(&records);
        let row = &table.rows[0];
        assert_eq!(row.event_rate, 0.0);
        assert_eq!(row.empirical_hazard_rate, 0.0);
        assert_eq!(row.final_cumulative_hazard, 0.0);
    }

    #[test]
    fn test_empty_table() {
        let table = table(&[]);
        assert!(table.is_empty());
        assert!(table.insights().is_none());
        assert!(table.top(5).is_empty());
        assert!(table.ranked_by_hazard_rate().is_empty());
    }

    #[test]
    fn test_rankings_and_insights() {
        let records = vec![
            record(1, 10.0, false),
            record(1, 10.0, true),
            record(1, 10.0, true),
            record(2, 1.0, false),
            record(2, 1.0, false),
            record(3, 5.0, true),
        ];
        let table = table(&records);

        assert_eq!(table.top(1).len(), 1);
        assert_eq!(table.top(10).len(), 3);

        let by_rate = table
            .ranked_by_hazard_rate()
            .iter()
            .map(|r| r.key)
            .collect::<Vec<_>>();
        assert_eq!(by_rate, [2, 1, 3]);

        let insights = table.insights().unwrap();
        assert_eq!(insights.most_active.key, 1);
        assert_eq!(insights.highest_event_rate.key, 2);
        assert_eq!(insights.highest_final_hazard.key, 2);
    }
}
