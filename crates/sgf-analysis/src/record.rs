//! Transition records observed in multi-agent trials
//!
//! This module provides the data structures describing one observed stay in an
//! SGF state and the transition (or censoring) that ended it.
//!
//! # Overview
//!
//! During a trial every agent is in one of three behavioral classes:
//! **solo**, **grupo** or **fermo**. The system state is the triple of class
//! counts, which always sums to the trial population. Whenever the triple
//! changes, the tracker records how long the previous state lasted.
//!
//! ```text
//! SurvivalRecord
//! ├─ from_index / from_components   state that was left (or still held)
//! ├─ to_index / to_components       state that was entered
//! ├─ duration                       time spent in the from-state
//! └─ censored                       trial ended before a transition
//! ```
//!
//! # Right-Censored Data
//!
//! A stay may end in two ways:
//!
//! - **Transition** (`censored = false`): the state changed, the event is observed
//! - **Trial end** (`censored = true`): the trial stopped first, the true
//!   duration is only known to be at least `duration`
//!
//! Censored records carry no destination: the tracker writes `to_index = -1`
//! and `to_components = (-1, -1, -1)` for them. Indices and components are
//! therefore signed.
//!
//! # Examples
//!
//! ```
//! use sgf_analysis::{
//!     record::{SgfTriple, SurvivalRecord},
//!     transition::TransitionType,
//! };
//!
//! let record = SurvivalRecord {
//!     from_index: 4,
//!     to_index: 3,
//!     duration: 120.0,
//!     censored: false,
//!     from_components: SgfTriple::new(2, 1, 0),
//!     to_components: SgfTriple::new(3, 0, 0),
//! };
//!
//! assert!(record.is_event());
//! assert_eq!(record.transition_type(), TransitionType::GrupoToSolo);
//! ```

use std::{fmt, ops::Sub};

use serde::{Deserialize, Serialize};
use sgf_stats::hazard::Observation;

use crate::transition::TransitionType;

/// Counts of agents in each behavioral class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SgfTriple {
    pub solo: i32,
    pub grupo: i32,
    pub fermo: i32,
}

impl SgfTriple {
    #[must_use]
    pub const fn new(solo: i32, grupo: i32, fermo: i32) -> Self {
        Self { solo, grupo, fermo }
    }

    /// Total number of agents described by this triple.
    #[must_use]
    pub const fn total(self) -> i32 {
        self.solo + self.grupo + self.fermo
    }

    /// Whether every count is non-negative.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.solo >= 0 && self.grupo >= 0 && self.fermo >= 0
    }
}

impl Sub for SgfTriple {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            solo: self.solo - rhs.solo,
            grupo: self.grupo - rhs.grupo,
            fermo: self.fermo - rhs.fermo,
        }
    }
}

impl fmt::Display for SgfTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.solo, self.grupo, self.fermo)
    }
}

/// One observed stay in an SGF state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalRecord {
    /// Catalog index of the state that was held
    pub from_index: i32,
    /// Catalog index of the state entered next (`-1` when censored)
    pub to_index: i32,
    /// Time spent in the from-state
    pub duration: f64,
    /// Whether the trial ended before the state changed
    pub censored: bool,
    pub from_components: SgfTriple,
    pub to_components: SgfTriple,
}

impl SurvivalRecord {
    /// Whether a transition was observed (the record is not censored).
    #[must_use]
    pub fn is_event(&self) -> bool {
        !self.censored
    }

    /// Component-wise change from the from-state to the to-state.
    #[must_use]
    pub fn delta(&self) -> SgfTriple {
        self.to_components - self.from_components
    }

    /// Classifies the transition that ended this stay.
    ///
    /// A record without a known destination (the censoring sentinel) falls
    /// into [`TransitionType::Complex`].
    #[must_use]
    pub fn transition_type(&self) -> TransitionType {
        if self.to_components.is_valid() {
            TransitionType::from_delta(self.delta())
        } else {
            TransitionType::Complex
        }
    }

    /// The record as an unweighted survival observation.
    #[must_use]
    pub fn observation(&self) -> Observation {
        Observation::new(self.duration, self.censored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_and_display() {
        let from = SgfTriple::new(2, 1, 0);
        let to = SgfTriple::new(1, 2, 0);
        assert_eq!(to - from, SgfTriple::new(-1, 1, 0));
        assert_eq!(from.to_string(), "(2, 1, 0)");
        assert_eq!(from.total(), 3);
    }

    #[test]
    fn test_censored_record_is_not_an_event() {
        let record = SurvivalRecord {
            from_index: 0,
            to_index: -1,
            duration: 30.0,
            censored: true,
            from_components: SgfTriple::new(3, 0, 0),
            to_components: SgfTriple::new(-1, -1, -1),
        };
        assert!(!record.is_event());
        assert!(record.observation().is_censored);
        assert!(!record.to_components.is_valid());
        assert_eq!(record.transition_type(), TransitionType::Complex);
    }
}
