use std::path::PathBuf;

use clap::Args;
use sgf_analysis::catalog::StateCatalog;

use crate::{schema::state::StateRow, util::Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct CatalogArg {
    /// Number of agents in a trial
    pub population: u16,

    /// Output CSV path (stdout if omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CatalogArg) -> anyhow::Result<()> {
    let catalog = StateCatalog::generate(arg.population);
    let mut output = Output::from_output_path(arg.output.clone())?;
    output.write_csv(catalog.iter().map(StateRow::from))?;

    if let Output::File { path, .. } = &output {
        tracing::info!(
            states = catalog.len(),
            path = %path.display(),
            "state catalog written"
        );
    }
    Ok(())
}
