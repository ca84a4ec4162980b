use clap::{Parser, Subcommand};

use self::{analyze::AnalyzeArg, catalog::CatalogArg, overview::OverviewArg};

mod analyze;
mod catalog;
mod overview;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Print headline counts of a survival dataset
    Overview(#[clap(flatten)] OverviewArg),
    /// Estimate Nelson-Aalen hazards per group and rank the groups
    Analyze(#[clap(flatten)] AnalyzeArg),
    /// Write the state catalog of a trial population
    Catalog(#[clap(flatten)] CatalogArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    crate::logging::init(args.verbose);
    match args.mode {
        Mode::Overview(arg) => overview::run(&arg)?,
        Mode::Analyze(arg) => analyze::run(&arg)?,
        Mode::Catalog(arg) => catalog::run(&arg)?,
    }
    Ok(())
}
