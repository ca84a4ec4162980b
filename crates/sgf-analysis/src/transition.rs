//! Transition-type classification
//!
//! Maps the component-wise change between two SGF states to one of a fixed
//! set of labels. The rules are checked in order and the first match wins:
//!
//! | Δsolo | Δgrupo | Δfermo | Type         |
//! |-------|--------|--------|--------------|
//! | +1    | -1     | any    | `Grupo→Solo` |
//! | -1    | +1     | any    | `Solo→Grupo` |
//! | any   | any    | +1     | `→Fermo`     |
//! | any   | any    | -1     | `Fermo→`     |
//! | other | other  | other  | `Complex`    |
//!
//! Simultaneous multi-agent moves are bucketed into `Complex` rather than
//! enumerated individually.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::record::SgfTriple;

/// Category of a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TransitionType {
    /// One agent left a group and became solo
    #[serde(rename = "Grupo→Solo", alias = "Grupo->Solo")]
    GrupoToSolo,
    /// One solo agent joined a group
    #[serde(rename = "Solo→Grupo", alias = "Solo->Grupo")]
    SoloToGrupo,
    /// One agent stopped
    #[serde(rename = "→Fermo", alias = "->Fermo")]
    ToFermo,
    /// One stopped agent started moving
    #[serde(rename = "Fermo→", alias = "Fermo->")]
    FromFermo,
    /// Anything else
    #[serde(rename = "Complex", alias = "Other")]
    Complex,
}

impl TransitionType {
    pub const ALL: [Self; 5] = [
        Self::GrupoToSolo,
        Self::SoloToGrupo,
        Self::ToFermo,
        Self::FromFermo,
        Self::Complex,
    ];

    /// Classifies a component-wise state change.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgf_analysis::{record::SgfTriple, transition::TransitionType};
    ///
    /// let ty = TransitionType::from_delta(SgfTriple::new(1, -1, 0));
    /// assert_eq!(ty, TransitionType::GrupoToSolo);
    /// assert_eq!(ty.to_string(), "Grupo→Solo");
    /// ```
    #[must_use]
    pub fn from_delta(delta: SgfTriple) -> Self {
        match (delta.solo, delta.grupo, delta.fermo) {
            (1, -1, _) => Self::GrupoToSolo,
            (-1, 1, _) => Self::SoloToGrupo,
            (_, _, 1) => Self::ToFermo,
            (_, _, -1) => Self::FromFermo,
            _ => Self::Complex,
        }
    }

    /// Classifies the move from one state to another.
    #[must_use]
    pub fn classify(from: SgfTriple, to: SgfTriple) -> Self {
        Self::from_delta(to - from)
    }

    #[must_use]
    pub fn to_str(self) -> &'static str {
        match self {
            Self::GrupoToSolo => "Grupo→Solo",
            Self::SoloToGrupo => "Solo→Grupo",
            Self::ToFermo => "→Fermo",
            Self::FromFermo => "Fermo→",
            Self::Complex => "Complex",
        }
    }
}

impl fmt::Display for TransitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.to_str(), f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown transition type '{input}'")]
pub struct ParseTransitionTypeError {
    pub input: String,
}

impl FromStr for TransitionType {
    type Err = ParseTransitionTypeError;

    /// Parses the display label, its ASCII spelling (`->`) or `Other`,
    /// ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace("->", "→").to_lowercase();
        match normalized.as_str() {
            "grupo→solo" => Ok(Self::GrupoToSolo),
            "solo→grupo" => Ok(Self::SoloToGrupo),
            "→fermo" => Ok(Self::ToFermo),
            "fermo→" => Ok(Self::FromFermo),
            "complex" | "other" => Ok(Self::Complex),
            _ => Err(ParseTransitionTypeError {
                input: s.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_agent_moves() {
        assert_eq!(
            TransitionType::from_delta(SgfTriple::new(1, -1, 0)),
            TransitionType::GrupoToSolo
        );
        assert_eq!(
            TransitionType::from_delta(SgfTriple::new(-1, 1, 0)),
            TransitionType::SoloToGrupo
        );
        assert_eq!(
            TransitionType::from_delta(SgfTriple::new(0, 0, 1)),
            TransitionType::ToFermo
        );
        assert_eq!(
            TransitionType::from_delta(SgfTriple::new(-1, 0, 1)),
            TransitionType::ToFermo
        );
        assert_eq!(
            TransitionType::from_delta(SgfTriple::new(0, 1, -1)),
            TransitionType::FromFermo
        );
    }

    #[test]
    fn test_first_match_wins() {
        // Both the Grupo→Solo and the →Fermo rule match
        assert_eq!(
            TransitionType::from_delta(SgfTriple::new(1, -1, 1)),
            TransitionType::GrupoToSolo
        );
    }

    #[test]
    fn test_complex_moves() {
        assert_eq!(
            TransitionType::from_delta(SgfTriple::new(1, 1, -2)),
            TransitionType::Complex
        );
        assert_eq!(
            TransitionType::from_delta(SgfTriple::new(2, -2, 0)),
            TransitionType::Complex
        );
        assert_eq!(
            TransitionType::from_delta(SgfTriple::new(0, 0, 0)),
            TransitionType::Complex
        );
    }

    #[test]
    fn test_classify_uses_to_minus_from() {
        let from = SgfTriple::new(1, 2, 0);
        let to = SgfTriple::new(2, 1, 0);
        assert_eq!(
            TransitionType::classify(from, to),
            TransitionType::GrupoToSolo
        );
        assert_eq!(
            TransitionType::classify(to, from),
            TransitionType::SoloToGrupo
        );
    }

    #[test]
    fn test_parse_labels() {
        for ty in TransitionType::ALL {
            assert_eq!(ty.to_string().parse::<TransitionType>(), Ok(ty));
        }
        assert_eq!(
            "grupo->solo".parse::<TransitionType>(),
            Ok(TransitionType::GrupoToSolo)
        );
        assert_eq!(
            "->Fermo".parse::<TransitionType>(),
            Ok(TransitionType::ToFermo)
        );
        assert_eq!(
            "Other".parse::<TransitionType>(),
            Ok(TransitionType::Complex)
        );
        assert!("sideways".parse::<TransitionType>().is_err());
    }
}
