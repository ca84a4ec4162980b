use std::path::PathBuf;

use clap::Args;

use crate::util;

#[derive(Debug, Clone, Args)]
pub(crate) struct OverviewArg {
    /// Path to the survival data CSV file (sgf_survival_data.csv)
    pub survival: PathBuf,

    /// Path to the state catalog CSV file (sgf_triples.csv)
    pub states: PathBuf,
}

pub(crate) fn run(arg: &OverviewArg) -> anyhow::Result<()> {
    let dataset = util::read_dataset(&arg.survival, &arg.states)?;
    let overview = dataset.overview();

    let population = overview
        .population
        .map_or("N/A".to_string(), |n| n.to_string());

    println!("Data Overview");
    println!("=============\n");
    println!("  {:<22} {population}", "Population:");
    println!("  {:<22} {}", "Catalog states:", overview.catalog_size);
    println!("  {:<22} {}", "Total records:", overview.record_count);
    println!("  {:<22} {}", "Observed transitions:", overview.event_count);
    println!("  {:<22} {}", "Censored stays:", overview.censored_count);
    println!(
        "  {:<22} {:.1}%",
        "Censoring rate:",
        100.0 * overview.censoring_rate
    );
    println!(
        "  {:<22} {}",
        "Unique from states:", overview.from_state_count
    );
    println!("  {:<22} {}", "Unique to states:", overview.to_state_count);

    Ok(())
}
