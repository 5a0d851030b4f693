use super::{OutputArgs, show_banner};
use crate::executor::{BenchCommand, CommandResolver, DEFAULT_BIN_DIR, RunExecutor};
use crate::local_logger::init_logger;
use crate::prelude::*;
use crate::project_config::ProjectConfig;
use crate::project_config::merger::ConfigMerger;
use crate::report::{self, ResultsLayout};
use crate::{end_group, start_group};
use clap::Args;
use results_shared::{AggregationStore, ConfigurationId};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Comma-separated list of configurations to benchmark, each as `<name>:<threads>`,
    /// e.g. `art:4,masstree:8`
    #[arg(long, value_delimiter = ',', required = true)]
    pub configs: Vec<ConfigurationId>,

    /// The tests to run, handed as a single argument to every benchmark binary
    #[arg(long)]
    pub tests: String,

    /// The directory holding the benchmark binaries. Defaults to the current directory
    #[arg(long, env = "DSBENCH_BIN_DIR")]
    pub bin_dir: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl RunArgs {
    /// Merge CLI args with project config if available
    ///
    /// CLI arguments take precedence over config values.
    pub fn merge_with_project_config(mut self, project_config: Option<&ProjectConfig>) -> Self {
        self.output = ConfigMerger::merge_output_args(&self.output, project_config);
        self.bin_dir = ConfigMerger::merge_bin_dir(self.bin_dir.as_ref(), project_config);
        self
    }
}

#[cfg(test)]
impl RunArgs {
    /// Constructs a new `RunArgs` with default values for testing purposes
    pub fn test() -> Self {
        Self {
            configs: vec![ConfigurationId::new("art", 4)],
            tests: "rw1".to_string(),
            bin_dir: None,
            output: OutputArgs::default(),
        }
    }
}

/// The command of every configuration, resolved before anything is launched
fn plan(
    args: &RunArgs,
    project_config: Option<&ProjectConfig>,
) -> Result<Vec<(ConfigurationId, BenchCommand)>> {
    ensure!(!args.configs.is_empty(), "No configuration to run");

    let bin_dir = args
        .bin_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BIN_DIR));
    let special_binaries = ConfigMerger::merge_special_binaries(
        CommandResolver::default_special_binaries(),
        project_config,
    );
    let resolver = CommandResolver::new(bin_dir, special_binaries);

    args.configs
        .iter()
        .map(|config| {
            let command = resolver.resolve(config, &args.tests);
            ensure!(
                command.program.is_file(),
                "The benchmark binary {} of {config} does not exist",
                command.program.display()
            );
            Ok((config.clone(), command))
        })
        .collect()
}

/// Run every configuration in turn, stopping at the first failure
async fn execute_all(
    plan: &[(ConfigurationId, BenchCommand)],
    layout: &ResultsLayout,
    store: &mut AggregationStore,
) -> Result<()> {
    let executor = RunExecutor::new(layout.raw_log());

    for (config, command) in plan {
        start_group!(format!("Running {config}"));
        let outcome = executor.execute(config, command, store).await;
        end_group!();

        let outcome = outcome?;
        info!(
            "{config}: {} records collected from {} lines",
            outcome.records, outcome.lines
        );
    }

    Ok(())
}

pub async fn run(args: RunArgs, project_config: Option<&ProjectConfig>) -> Result<()> {
    let args = args.merge_with_project_config(project_config);
    let plan = plan(&args, project_config)?;

    let layout = args.output.layout()?;
    layout.create()?;
    init_logger(Some(layout.harness_log().as_path()))?;
    show_banner();
    debug!("args: {args:#?}");
    info!(
        "Run {} of {} configurations, results in {}",
        layout.run_id(),
        plan.len(),
        layout.run_dir().display()
    );

    let mut store = AggregationStore::new();
    let result = execute_all(&plan, &layout, &mut store).await;

    // What was collected before a failure is kept
    let persisted = report::persist(&store, &layout.results_file());
    first_failure(result, persisted)?;

    report::present(&store, &layout, !args.output.no_chart)?;
    Ok(())
}

/// The run error wins over the persist error, which is only logged then
fn first_failure(run: Result<()>, persisted: Result<()>) -> Result<()> {
    match (run, persisted) {
        (Err(run_error), Err(persist_error)) => {
            error!("Failed to save the partial results: {persist_error:#}");
            Err(run_error)
        }
        (run, persisted) => run.and(persisted),
    }
}
