//! State catalog
//!
//! The catalog maps state indices to their SGF triples. Every state of a
//! catalog describes the same trial population.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::SgfTriple;

/// A catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDefinition {
    pub index: i32,
    pub components: SgfTriple,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CatalogError {
    #[display("state index {index} is defined more than once")]
    DuplicateIndex { index: i32 },
    #[display("state {index} has a negative component count {components}")]
    NegativeComponent { index: i32, components: SgfTriple },
    #[display("state {index} describes {found} agents, expected {expected}")]
    PopulationMismatch {
        index: i32,
        expected: i32,
        found: i32,
    },
}

/// Index-keyed collection of valid state definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StateCatalog {
    population: Option<i32>,
    states: BTreeMap<i32, SgfTriple>,
}

impl StateCatalog {
    /// Builds a catalog, checking that indices are unique, counts are
    /// non-negative and every state sums to the same population.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgf_analysis::{
    ///     catalog::{CatalogError, StateCatalog, StateDefinition},
    ///     record::SgfTriple,
    /// };
    ///
    /// let catalog = StateCatalog::new([
    ///     StateDefinition { index: 0, components: SgfTriple::new(2, 0, 0) },
    ///     StateDefinition { index: 1, components: SgfTriple::new(1, 1, 0) },
    /// ])?;
    /// assert_eq!(catalog.population(), Some(2));
    ///
    /// let err = StateCatalog::new([
    ///     StateDefinition { index: 0, components: SgfTriple::new(2, 0, 0) },
    ///     StateDefinition { index: 1, components: SgfTriple::new(2, 1, 0) },
    /// ]);
    /// assert!(matches!(err, Err(CatalogError::PopulationMismatch { .. })));
    /// # Ok::<(), CatalogError>(())
    /// ```
    pub fn new<I>(definitions: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = StateDefinition>,
    {
        let mut catalog = Self::default();
        for StateDefinition { index, components } in definitions {
            if !components.is_valid() {
                return Err(CatalogError::NegativeComponent { index, components });
            }
            let found = components.total();
            let expected = *catalog.population.get_or_insert(found);
            if found != expected {
                return Err(CatalogError::PopulationMismatch {
                    index,
                    expected,
                    found,
                });
            }
            if catalog.states.insert(index, components).is_some() {
                return Err(CatalogError::DuplicateIndex { index });
            }
        }
        Ok(catalog)
    }

    /// Enumerates every state of a population of `population` agents.
    ///
    /// States are ordered by `fermo` ascending, then `solo` descending, and
    /// indexed from zero in that order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgf_analysis::{catalog::StateCatalog, record::SgfTriple};
    ///
    /// let catalog = StateCatalog::generate(2);
    /// assert_eq!(catalog.len(), 6);
    /// assert_eq!(catalog.get(0), Some(SgfTriple::new(2, 0, 0)));
    /// assert_eq!(catalog.get(3), Some(SgfTriple::new(1, 0, 1)));
    /// assert_eq!(catalog.get(5), Some(SgfTriple::new(0, 0, 2)));
    /// ```
    #[must_use]
    pub fn generate(population: u16) -> Self {
        let n = i32::from(population);
        let mut states = BTreeMap::new();
        let mut index = 0;
        for fermo in 0..=n {
            for solo in (0..=n - fermo).rev() {
                let grupo = n - solo - fermo;
                states.insert(index, SgfTriple::new(solo, grupo, fermo));
                index += 1;
            }
        }
        Self {
            population: Some(n),
            states,
        }
    }

    /// Number of agents every state describes, `None` for an empty catalog.
    #[must_use]
    pub fn population(&self) -> Option<i32> {
        self.population
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: i32) -> Option<SgfTriple> {
        self.states.get(&index).copied()
    }

    #[must_use]
    pub fn contains(&self, index: i32) -> bool {
        self.states.contains_key(&index)
    }

    /// Display label of a state, e.g. `(2, 1, 0)`.
    #[must_use]
    pub fn label(&self, index: i32) -> Option<String> {
        self.get(index).map(|c| c.to_string())
    }

    /// Iterates over all definitions in index order.
    pub fn iter(&self) -> impl Iterator<Item = StateDefinition> + '_ {
        self.states
            .iter()
            .map(|(&index, &components)| StateDefinition { index, components })
    }
}
