mod command;
mod helpers;
mod run_executor;

pub use command::{BenchCommand, CommandResolver, DEFAULT_BIN_DIR};
pub use run_executor::{RunExecutor, RunOutcome};

/// Target of the benchmark output echoed to the console
pub const EXECUTOR_TARGET: &str = "dsbench::executor";
