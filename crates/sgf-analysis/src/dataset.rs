//! Loaded analysis input
//!
//! A [`SurvivalDataset`] bundles the transition records of one run with the
//! state catalog they refer to. Both are read-only for the whole analysis.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::{catalog::StateCatalog, record::SurvivalRecord};

#[derive(Debug, Clone, Default, Serialize)]
pub struct SurvivalDataset {
    pub records: Vec<SurvivalRecord>,
    pub catalog: StateCatalog,
}

/// Headline counts of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    pub record_count: usize,
    pub event_count: usize,
    pub censored_count: usize,
    /// Fraction of censored records, `0.0` for an empty dataset
    pub censoring_rate: f64,
    /// Number of distinct from-states
    pub from_state_count: usize,
    /// Number of distinct to-states among observed transitions
    pub to_state_count: usize,
    pub catalog_size: usize,
    pub population: Option<i32>,
}

impl SurvivalDataset {
    #[must_use]
    pub fn new(records: Vec<SurvivalRecord>, catalog: StateCatalog) -> Self {
        Self { records, catalog }
    }

    /// Computes headline counts over all records.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgf_analysis::{catalog::StateCatalog, dataset::SurvivalDataset};
    ///
    /// let dataset = SurvivalDataset::new(vec![], StateCatalog::generate(3));
    /// let overview = dataset.overview();
    /// assert_eq!(overview.record_count, 0);
    /// assert_eq!(overview.censoring_rate, 0.0);
    /// assert_eq!(overview.catalog_size, 10);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn overview(&self) -> DatasetOverview {
        let record_count = self.records.len();
        let censored_count = self.records.iter().filter(|r| r.censored).count();
        let event_count = record_count - censored_count;
        let censoring_rate = if record_count == 0 {
            0.0
        } else {
            censored_count as f64 / record_count as f64
        };

        let from_states = self
            .records
            .iter()
            .map(|r| r.from_index)
            .collect::<BTreeSet<_>>();
        let to_states = self
            .records
            .iter()
            .filter(|r| r.is_event())
            .map(|r| r.to_index)
            .collect::<BTreeSet<_>>();

        DatasetOverview {
            record_count,
            event_count,
            censored_count,
            censoring_rate,
            from_state_count: from_states.len(),
            to_state_count: to_states.len(),
            catalog_size: self.catalog.len(),
            population: self.catalog.population(),
        }
    }
}
