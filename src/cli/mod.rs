mod report;
pub(crate) mod run;
mod shared;

pub use shared::OutputArgs;
pub(crate) use shared::show_banner;

use std::path::PathBuf;

use crate::{local_logger::DSBENCH_U8_COLOR_CODE, prelude::*, project_config::ProjectConfig};
use clap::{
    Parser, Subcommand,
    builder::{Styles, styling},
};

fn create_styles() -> Styles {
    styling::Styles::styled()
        .header(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .usage(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .literal(
            styling::Ansi256Color(DSBENCH_U8_COLOR_CODE).on_default() | styling::Effects::BOLD,
        )
        .placeholder(styling::AnsiColor::Cyan.on_default())
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Run data-structure benchmarks across configurations and aggregate their results",
    styles = create_styles()
)]
pub struct Cli {
    /// Path to project configuration file (dsbench.yaml)
    /// If provided, loads config from this path. Otherwise, searches for a config file
    /// in the current directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the benchmark binaries for every configuration, then persist and report the results
    #[command(alias = "r")]
    Run(Box<run::RunArgs>),
    /// Report the results of a previous run from its results file
    Report(report::ReportArgs),
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let project_config =
        ProjectConfig::discover_and_load(cli.config.as_deref(), &std::env::current_dir()?)?;

    match cli.command {
        Commands::Run(args) => run::run(*args, project_config.as_ref()).await?,
        Commands::Report(args) => report::run(args)?,
    }
    Ok(())
}
