//! Hazard analysis command
//!
//! Groups transition records, estimates a Nelson-Aalen cumulative hazard per
//! group and prints the groups ranked by sample size. Curves and tables can be
//! written out for external plotting.

mod curves;
mod table;

use std::path::PathBuf;

use clap::Args;
use sgf_analysis::{
    analysis::{self, AnalysisConfig, AnalysisReport, Grouping},
    transition::TransitionType,
};

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct AnalyzeArg {
    /// Path to the survival data CSV file (sgf_survival_data.csv)
    pub survival: PathBuf,

    /// Path to the state catalog CSV file (sgf_triples.csv)
    pub states: PathBuf,

    /// Analysis configuration JSON file; command-line options override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Grouping key: state, pair, transition or components
    #[arg(long)]
    pub group_by: Option<Grouping>,

    /// Drop groups with fewer records (default: 10 for state, 5 for pair, 1 otherwise)
    #[arg(long)]
    pub min_samples: Option<usize>,

    /// Only analyze these transition types (comma-separated, e.g. "Grupo->Solo,->Fermo")
    #[arg(long, value_delimiter = ',')]
    pub transition_types: Vec<TransitionType>,

    /// Estimate groups in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Number of groups to print
    #[arg(long, default_value_t = 15)]
    pub top: usize,

    /// Write the full ranked summary table to this CSV file
    #[arg(long)]
    pub summary_output: Option<PathBuf>,

    /// Output directory for hazard curve CSV files
    #[arg(long)]
    pub curves_output: Option<PathBuf>,

    /// Write the full report as JSON to this file
    #[arg(long)]
    pub json_output: Option<PathBuf>,
}

impl AnalyzeArg {
    fn config(&self) -> anyhow::Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file::<AnalysisConfig, _>("analysis config", path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(grouping) = self.group_by {
            config.grouping = grouping;
        }
        if let Some(min_samples) = self.min_samples {
            config.min_samples = Some(min_samples);
        }
        if !self.transition_types.is_empty() {
            config.transition_types.clone_from(&self.transition_types);
        }
        config.parallel |= self.parallel;
        Ok(config)
    }
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    let config = arg.config()?;
    let dataset = util::read_dataset(&arg.survival, &arg.states)?;
    let report = analysis::analyze(&dataset, &config);

    println!(
        "Nelson-Aalen Analysis of SGF State Transitions (group by {}, min samples {})",
        report.grouping, report.min_samples
    );
    println!("==========================================\n");

    table::print_legend();
    println!();

    print_report(&report, arg.top);

    if let Some(path) = &arg.summary_output {
        curves::save_summary(path, &report)?;
    }
    if let Some(dir) = &arg.curves_output {
        curves::save_hazard_curves(dir, &report)?;
    }
    if let Some(path) = &arg.json_output {
        Output::save_json(&report, Some(path.clone()))?;
        println!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn print_report(report: &AnalysisReport, top: usize) {
    let summary = &report.summary;
    if summary.is_empty() {
        println!(
            "No group reached {} records ({} records analyzed).",
            report.min_samples, report.analyzed_records
        );
        return;
    }

    println!(
        "Groups by Observation Count (top {} of {})",
        top.min(summary.len()),
        summary.len()
    );
    table::print_summary_table(summary.top(top));
    println!();

    println!("Groups by Empirical Hazard Rate");
    let by_rate = summary.ranked_by_hazard_rate();
    table::print_summary_table(by_rate.into_iter().take(top));
    println!();

    if let Some(insights) = summary.insights() {
        println!("Key Insights:");
        println!(
            "  Most active group      : {} with {} records",
            insights.most_active.label, insights.most_active.record_count
        );
        println!(
            "  Highest event rate     : {} ({:.3})",
            insights.highest_event_rate.label, insights.highest_event_rate.event_rate
        );
        println!(
            "  Highest final hazard   : {} ({:.3})",
            insights.highest_final_hazard.label,
            insights.highest_final_hazard.final_cumulative_hazard
        );
        println!();
    }
}
