//! Configured analysis runs
//!
//! [`analyze`] is the single entry point used by front ends: it takes the
//! loaded dataset and an explicit [`AnalysisConfig`], groups the records,
//! estimates one hazard curve per group and ranks the groups.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    catalog::StateCatalog,
    dataset::SurvivalDataset,
    record::SgfTriple,
    summary::SummaryTable,
    survival::{
        DEFAULT_MIN_SAMPLES_BY_PAIR, DEFAULT_MIN_SAMPLES_BY_STATE, GroupingOptions, HazardStatsMap,
    },
    transition::TransitionType,
};

/// Which key records are grouped by.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    /// Catalog index of the from-state
    #[default]
    #[serde(alias = "state")]
    FromState,
    /// `(from_index, to_index)` pair
    #[serde(alias = "pair")]
    StatePair,
    /// Output of the transition classifier
    #[serde(alias = "transition")]
    TransitionType,
    /// SGF triple of the from-state
    #[serde(alias = "components")]
    FromComponents,
}

impl Grouping {
    /// Minimum group size used when none is configured.
    #[must_use]
    pub fn default_min_samples(self) -> usize {
        match self {
            Self::FromState => DEFAULT_MIN_SAMPLES_BY_STATE,
            Self::StatePair => DEFAULT_MIN_SAMPLES_BY_PAIR,
            Self::TransitionType | Self::FromComponents => 1,
        }
    }

    #[must_use]
    pub fn to_str(self) -> &'static str {
        match self {
            Self::FromState => "state",
            Self::StatePair => "pair",
            Self::TransitionType => "transition",
            Self::FromComponents => "components",
        }
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.to_str(), f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown grouping '{input}', expected one of: state, pair, transition, components")]
pub struct ParseGroupingError {
    pub input: String,
}

impl FromStr for Grouping {
    type Err = ParseGroupingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "state" | "from_state" => Ok(Self::FromState),
            "pair" | "state_pair" => Ok(Self::StatePair),
            "transition" | "transition_type" => Ok(Self::TransitionType),
            "components" | "from_components" => Ok(Self::FromComponents),
            _ => Err(ParseGroupingError {
                input: s.to_owned(),
            }),
        }
    }
}

/// Parameters of one analysis run.
///
/// Deserializable so front ends can read it from a file:
///
/// ```
/// use sgf_analysis::analysis::{AnalysisConfig, Grouping};
///
/// let config: AnalysisConfig = serde_json::from_str(r#"{ "grouping": "pair" }"#)?;
/// assert_eq!(config.grouping, Grouping::StatePair);
/// assert_eq!(config.effective_min_samples(), 5);
/// assert!(config.transition_types.is_empty());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub grouping: Grouping,
    /// Minimum group size, the grouping's default when `None`
    pub min_samples: Option<usize>,
    /// Only analyze records of these transition types (all when empty)
    pub transition_types: Vec<TransitionType>,
    /// Estimate groups on the rayon thread pool
    pub parallel: bool,
}

impl AnalysisConfig {
    #[must_use]
    pub fn new(grouping: Grouping) -> Self {
        Self {
            grouping,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn effective_min_samples(&self) -> usize {
        self.min_samples
            .unwrap_or_else(|| self.grouping.default_min_samples())
    }

    fn grouping_options(&self) -> GroupingOptions {
        GroupingOptions::new(self.effective_min_samples()).parallel(self.parallel)
    }
}

/// Key of a group in an analysis report.
///
/// Serializes as its display string so it can key JSON objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    State(i32),
    Pair(i32, i32),
    Transition(TransitionType),
    Components(SgfTriple),
}

impl GroupKey {
    /// Human-readable label, resolving state indices through the catalog.
    #[must_use]
    pub fn label(&self, catalog: &StateCatalog) -> String {
        let state = |index: i32| catalog.label(index).unwrap_or_else(|| format!("#{index}"));
        match self {
            Self::State(index) => state(*index),
            Self::Pair(from, to) => format!("{} → {}", state(*from), state(*to)),
            Self::Transition(ty) => ty.to_string(),
            Self::Components(triple) => triple.to_string(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::State(index) => write!(f, "{index}"),
            Self::Pair(from, to) => write!(f, "{from}→{to}"),
            Self::Transition(ty) => fmt::Display::fmt(ty, f),
            Self::Components(triple) => fmt::Display::fmt(triple, f),
        }
    }
}

impl Serialize for GroupKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Result of [`analyze`]: per-group curves plus the ranked summary.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub grouping: Grouping,
    pub min_samples: usize,
    /// Number of records that passed the transition-type filter
    pub analyzed_records: usize,
    pub groups: HazardStatsMap<GroupKey>,
    pub summary: SummaryTable<GroupKey>,
}

/// Runs one configured analysis over a dataset.
///
/// # Examples
///
/// ```
/// use sgf_analysis::{
///     analysis::{self, AnalysisConfig, GroupKey, Grouping},
///     catalog::StateCatalog,
///     dataset::SurvivalDataset,
///     record::{SgfTriple, SurvivalRecord},
/// };
///
/// let catalog = StateCatalog::generate(2);
/// let records = (0..6)
///     .map(|i| SurvivalRecord {
///         from_index: 0,
///         to_index: 1,
///         duration: f64::from(i + 1),
///         censored: false,
///         from_components: SgfTriple::new(2, 0, 0),
///         to_components: SgfTriple::new(1, 1, 0),
///     })
///     .collect();
/// let dataset = SurvivalDataset::new(records, catalog);
///
/// let report = analysis::analyze(&dataset, &AnalysisConfig::new(Grouping::TransitionType));
/// let row = &report.summary.rows[0];
/// assert_eq!(row.key.to_string(), "Solo→Grupo");
/// assert_eq!(row.record_count, 6);
/// ```
#[must_use]
pub fn analyze(dataset: &SurvivalDataset, config: &AnalysisConfig) -> AnalysisReport {
    let options = config.grouping_options();
    let catalog = &dataset.catalog;

    let filtered;
    let records = if config.transition_types.is_empty() {
        dataset.records.as_slice()
    } else {
        filtered = dataset
            .records
            .iter()
            .filter(|r| config.transition_types.contains(&r.transition_type()))
            .cloned()
            .collect::<Vec<_>>();
        filtered.as_slice()
    };

    let groups = match config.grouping {
        Grouping::FromState => {
            HazardStatsMap::by_from_state(records, catalog, options).map_keys(GroupKey::State)
        }
        Grouping::StatePair => HazardStatsMap::by_state_pair(records, catalog, options)
            .map_keys(|(from, to)| GroupKey::Pair(from, to)),
        Grouping::TransitionType => {
            HazardStatsMap::by_transition_type(records, options).map_keys(GroupKey::Transition)
        }
        Grouping::FromComponents => {
            HazardStatsMap::by_from_components(records, options).map_keys(GroupKey::Components)
        }
    };

    let summary = SummaryTable::from_map(&groups, |key| key.label(catalog));

    info!(
        grouping = %config.grouping,
        records = records.len(),
        groups = groups.map.len(),
        grouped_records = groups.total_records(),
        "analysis finished"
    );

    AnalysisReport {
        grouping: config.grouping,
        min_samples: options.min_samples,
        analyzed_records: records.len(),
        groups,
        summary,
    }
}
