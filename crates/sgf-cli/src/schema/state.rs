use serde::{Deserialize, Serialize};
use sgf_analysis::{catalog::StateDefinition, record::SgfTriple};

/// A row of `sgf_triples.csv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct StateRow {
    pub index: i32,
    pub solo: i32,
    pub grupo: i32,
    pub fermo: i32,
}

impl From<StateRow> for StateDefinition {
    fn from(row: StateRow) -> Self {
        Self {
            index: row.index,
            components: SgfTriple::new(row.solo, row.grupo, row.fermo),
        }
    }
}

impl From<StateDefinition> for StateRow {
    fn from(def: StateDefinition) -> Self {
        let SgfTriple { solo, grupo, fermo } = def.components;
        Self {
            index: def.index,
            solo,
            grupo,
            fermo,
        }
    }
}
