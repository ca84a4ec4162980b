use anyhow::ensure;
use serde::{Deserialize, Serialize};
use sgf_analysis::record::{SgfTriple, SurvivalRecord};

/// A row of `sgf_survival_data.csv`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SurvivalRow {
    pub from_index: i32,
    pub to_index: i32,
    pub duration: f64,
    /// `1` if the trial ended before the state changed
    pub censored: u8,
    pub from_solo: i32,
    pub from_grupo: i32,
    pub from_fermo: i32,
    pub to_solo: i32,
    pub to_grupo: i32,
    pub to_fermo: i32,
}

impl TryFrom<SurvivalRow> for SurvivalRecord {
    type Error = anyhow::Error;

    fn try_from(row: SurvivalRow) -> anyhow::Result<Self> {
        ensure!(
            row.duration.is_finite() && row.duration >= 0.0,
            "duration must be a finite non-negative number, got {}",
            row.duration
        );
        ensure!(
            row.censored <= 1,
            "censored must be 0 or 1, got {}",
            row.censored
        );

        Ok(Self {
            from_index: row.from_index,
            to_index: row.to_index,
            duration: row.duration,
            censored: row.censored != 0,
            from_components: SgfTriple::new(row.from_solo, row.from_grupo, row.from_fermo),
            to_components: SgfTriple::new(row.to_solo, row.to_grupo, row.to_fermo),
        })
    }
}

/// A row of the ranked summary CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCsvRow<'a> {
    pub key: String,
    pub label: &'a str,
    pub record_count: usize,
    pub event_count: usize,
    pub censored_count: usize,
    pub event_rate: f64,
    pub mean_duration: f64,
    pub median_duration: f64,
    pub std_duration: f64,
    pub empirical_hazard_rate: f64,
    pub final_cumulative_hazard: f64,
}

/// A row of a curve CSV: one Nelson-Aalen step of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveCsvRow<'a> {
    pub key: String,
    pub label: &'a str,
    pub time: f64,
    pub at_risk: f64,
    pub events: f64,
    pub cumulative_hazard: f64,
}
