//! Nelson-Aalen hazard analysis of SGF state transitions
//!
//! This crate estimates how quickly multi-agent systems leave their
//! behavioral states. Each state is an SGF triple: the number of agents that
//! are **solo**, in a **grupo**, or **fermo** (stopped). Trials record how long
//! every state lasted and whether it ended in a transition or was cut short by
//! the end of the trial (right-censored).
//!
//! # Overview
//!
//! 1. **Load Records** ([`dataset::SurvivalDataset`]): transition records plus
//!    the [`catalog::StateCatalog`] they refer to
//! 2. **Classify Transitions** ([`transition::TransitionType`]): label each
//!    record by the kind of single-agent move it represents
//! 3. **Group Records** ([`survival::HazardStatsMap`]): partition by from-state,
//!    state pair, transition type or from-components, dropping small groups
//! 4. **Estimate Hazards**: one Nelson-Aalen curve per group
//!    ([`sgf_stats::hazard::NelsonAalenCurve`])
//! 5. **Summarize** ([`summary::SummaryTable`]): scalar statistics per group,
//!    ranked by sample size
//!
//! [`analysis::analyze`] runs steps 3 to 5 for an explicit
//! [`analysis::AnalysisConfig`].
//!
//! # Examples
//!
//! ```
//! use sgf_analysis::{
//!     analysis::{self, AnalysisConfig, Grouping},
//!     catalog::StateCatalog,
//!     dataset::SurvivalDataset,
//! };
//!
//! // In practice, records are loaded from the tracker's CSV output
//! let dataset = SurvivalDataset::new(vec![], StateCatalog::generate(5));
//!
//! let report = analysis::analyze(&dataset, &AnalysisConfig::new(Grouping::FromState));
//! for row in report.summary.top(15) {
//!     println!(
//!         "{}: {} records, final hazard {:.3}",
//!         row.label, row.record_count, row.final_cumulative_hazard
//!     );
//! }
//! ```

pub mod analysis;
pub mod catalog;
pub mod dataset;
pub mod record;
pub mod summary;
pub mod survival;
pub mod transition;
