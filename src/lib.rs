//! dsbench: run data-structure benchmark binaries across configurations, aggregate the
//! measurements they report and render the results.

mod executor;
mod local_logger;
mod prelude;
mod project_config;
mod scanner;

pub mod cli;
pub mod logger;
pub mod report;

pub use executor::{BenchCommand, CommandResolver, RunExecutor, RunOutcome};
pub use local_logger::clean_logger;
pub use project_config::ProjectConfig;
pub use scanner::scan_line;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
