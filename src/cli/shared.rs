use crate::VERSION;
use crate::prelude::*;
use crate::report::{DEFAULT_RESULTS_DIR, ResultsLayout, default_run_id};
use clap::Args;
use std::path::PathBuf;

pub(crate) fn show_banner() {
    let banner = format!(
        r#"
       __      __                    __
  ____/ /_____/ /_  ___  ____  _____/ /_
 / __  / ___/ __ \/ _ \/ __ \/ ___/ __ \
/ /_/ (__  ) /_/ /  __/ / / / /__/ / / /
\__,_/____/_.___/\___/_/ /_/\___/_/ /_/   v{VERSION}
"#
    );
    println!("{banner}");
    debug!("dsbench v{VERSION}");
}

/// Arguments shared between the run and report commands
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// The directory under which every run gets its own folder.
    /// Defaults to `./test_results`
    #[arg(long, env = "DSBENCH_RESULTS_DIR")]
    pub results_dir: Option<PathBuf>,

    /// The identifier of the run, used in every output file name.
    /// Defaults to the current UNIX timestamp
    #[arg(long, env = "DSBENCH_RUN_ID")]
    pub run_id: Option<String>,

    /// Skip the rendering of the charts
    #[arg(long, default_value = "false")]
    pub no_chart: bool,
}

impl OutputArgs {
    /// Layout of the run these arguments point to, with the default directory and id filled in
    pub fn layout(&self) -> Result<ResultsLayout> {
        let results_dir = self
            .results_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_DIR));
        let run_id = self.run_id.clone().unwrap_or_else(default_run_id);
        validate_run_id(&run_id)?;

        Ok(ResultsLayout::new(results_dir, run_id))
    }
}

pub(crate) fn validate_run_id(run_id: &str) -> Result<()> {
    ensure!(!run_id.is_empty(), "The run id cannot be empty");
    ensure!(
        !run_id.contains(['/', '\\']) && run_id != "." && run_id != "..",
        "The run id `{run_id}` must not be a path"
    );
    Ok(())
}
