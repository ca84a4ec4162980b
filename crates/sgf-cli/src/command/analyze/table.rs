//! Summary table display
//!
//! This module provides functions for displaying ranked hazard summaries
//! in a consistent tabular format.

use std::fmt::Display;

use sgf_analysis::summary::SummaryRow;

fn print_summary_table_header() {
    println!(
        "  {:<28} {:>8} {:>8} {:>8} {:>8} {:>10} {:>10} {:>12} {:>10}",
        "Group",
        "Records",
        "Events",
        "Censored",
        "EvRate",
        "Mean",
        "Median",
        "HazardRate",
        "Final H",
    );
}

fn print_summary_table_separator() {
    // label(28) + counts(8*4) + mean(10) + median(10) + rate(12) + final(10) + spaces(8)
    println!("  {}", "-".repeat(110));
}

fn print_summary_table_row<K>(row: &SummaryRow<K>)
where
    K: Display,
{
    println!(
        "  {:<28} {:>8} {:>8} {:>8} {:>8.3} {:>10.1} {:>10.1} {:>12.5} {:>10.3}",
        truncate(&row.label, 28),
        row.record_count,
        row.event_count,
        row.censored_count,
        row.event_rate,
        row.mean_duration,
        row.median_duration,
        row.empirical_hazard_rate,
        row.final_cumulative_hazard,
    );
}

/// Print a formatted summary table
pub(super) fn print_summary_table<'a, K, I>(rows: I)
where
    K: Display + 'a,
    I: IntoIterator<Item = &'a SummaryRow<K>>,
{
    print_summary_table_header();
    print_summary_table_separator();

    for row in rows {
        print_summary_table_row(row);
    }
}

/// Print legend explaining table columns
pub(super) fn print_legend() {
    println!("Legend:");
    println!("  EvRate      : Fraction of stays that ended in an observed transition");
    println!("  Mean/Median : Duration of all stays (censored included, biased low)");
    println!("  HazardRate  : Events per unit of observed time (ranking only)");
    println!("  Final H     : Nelson-Aalen cumulative hazard after the last event");
}

fn truncate(label: &str, width: usize) -> String {
    if label.chars().count() <= width {
        label.to_owned()
    } else {
        let mut truncated = label.chars().take(width - 1).collect::<String>();
        truncated.push('…');
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("(1, 2, 0)", 28), "(1, 2, 0)");
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("Grupo→Solo", 10), "Grupo→Solo");
    }
}
