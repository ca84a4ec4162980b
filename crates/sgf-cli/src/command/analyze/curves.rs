//! CSV export of summaries and hazard curves
//!
//! The files written here are the hand-off to external plotting tools.

use std::{fs, path::Path};

use anyhow::Context;
use sgf_analysis::analysis::AnalysisReport;

use crate::{
    schema::survival::{CurveCsvRow, SummaryCsvRow},
    util::Output,
};

/// Save the full ranked summary table
pub(super) fn save_summary(path: &Path, report: &AnalysisReport) -> anyhow::Result<()> {
    let rows = report.summary.rows.iter().map(|row| SummaryCsvRow {
        key: row.key.to_string(),
        label: &row.label,
        record_count: row.record_count,
        event_count: row.event_count,
        censored_count: row.censored_count,
        event_rate: row.event_rate,
        mean_duration: row.mean_duration,
        median_duration: row.median_duration,
        std_duration: row.std_duration,
        empirical_hazard_rate: row.empirical_hazard_rate,
        final_cumulative_hazard: row.final_cumulative_hazard,
    });

    let mut output = Output::open(path.to_owned())?;
    output.write_csv(rows)?;
    println!("Summary table saved to: {}", path.display());
    Ok(())
}

/// Save the Nelson-Aalen curves of all reported groups to one CSV file
pub(super) fn save_hazard_curves(dir: &Path, report: &AnalysisReport) -> anyhow::Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    let csv_path = dir.join(format!("{}_hazard_curves.csv", report.grouping));

    let mut output = Output::open(csv_path.clone())?;
    output.write_csv(curve_rows(report))?;
    println!("Hazard curves saved to: {}", csv_path.display());
    Ok(())
}

/// Curve rows of all reported groups, in summary order
///
/// Each group starts at the origin `(0, 0)`, where all of its records are at
/// risk, followed by one row per event time. The rows of a group plot
/// directly as a post-step function.
#[expect(clippy::cast_precision_loss)]
fn curve_rows(report: &AnalysisReport) -> Vec<CurveCsvRow<'_>> {
    let mut rows = vec![];
    for row in &report.summary.rows {
        let Some(stats) = report.groups.map.get(&row.key) else {
            continue;
        };
        let curve = &stats.curve;
        for (i, (time, cumulative_hazard)) in curve.step_points().into_iter().enumerate() {
            let (at_risk, events) = match i.checked_sub(1) {
                Some(step) => (curve.at_risk[step], curve.events[step]),
                None => (stats.record_count as f64, 0.0),
            };
            rows.push(CurveCsvRow {
                key: row.key.to_string(),
                label: &row.label,
                time,
                at_risk,
                events,
                cumulative_hazard,
            });
        }
    }
    rows
}
