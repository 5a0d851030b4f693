use super::{OutputArgs, shared::validate_run_id};
use crate::local_logger::init_logger;
use crate::prelude::*;
use crate::report::{self, ResultsLayout};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// The results file of a previous run, e.g. `test_results/<id>/results_<id>.json`
    #[arg(long)]
    pub results_file: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Where the report of `args` is written
///
/// Next to the results file, unless a results directory is given.
fn layout(args: &ReportArgs) -> Result<ResultsLayout> {
    if args.output.results_dir.is_some() {
        return args.output.layout();
    }

    let layout = ResultsLayout::for_results_file(&args.results_file, args.output.run_id.clone());
    validate_run_id(layout.run_id())?;
    Ok(layout)
}

pub fn run(args: ReportArgs) -> Result<()> {
    init_logger(None)?;

    let store = report::load(&args.results_file)?;
    let layout = layout(&args)?;
    layout.create()?;
    info!(
        "Reporting {} records of run {}",
        store.len(),
        layout.run_id()
    );

    report::present(&store, &layout, !args.output.no_chart)?;
    Ok(())
}
