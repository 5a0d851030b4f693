use super::BenchCommand;
use super::helpers::run_command_with_log_pipe::run_command_with_log_pipe;
use crate::local_logger::suspend_progress_bar;
use crate::prelude::*;
use crate::scanner::scan_line;
use results_shared::{AggregationStore, ConfigurationId};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

#[derive(Debug)]
pub struct RunOutcome {
    pub exit_status: ExitStatus,
    /// Number of stderr lines read
    pub lines: usize,
    /// Number of records inserted in the store
    pub records: usize,
}

/// Runs benchmark commands, appending their stderr to a raw log and collecting the records it
/// carries.
pub struct RunExecutor {
    raw_log_path: PathBuf,
}

impl RunExecutor {
    pub fn new(raw_log_path: impl Into<PathBuf>) -> Self {
        Self {
            raw_log_path: raw_log_path.into(),
        }
    }

    pub fn raw_log_path(&self) -> &Path {
        &self.raw_log_path
    }

    /// Run `command` for `config`, inserting every record found on its stderr into `store`.
    ///
    /// A non-zero exit status is only a warning. A malformed record aborts the run, the records
    /// inserted before it stay in the store. The raw log is flushed in every case.
    pub async fn execute(
        &self,
        config: &ConfigurationId,
        command: &BenchCommand,
        store: &mut AggregationStore,
    ) -> Result<RunOutcome> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.raw_log_path)
            .with_context(|| {
                format!(
                    "Failed to open the raw log {}",
                    self.raw_log_path.display()
                )
            })?;
        let mut raw_log = BufWriter::new(file);

        info!("Running {command}");
        let mut lines = 0;
        let mut records = 0;
        let result = run_command_with_log_pipe(command.to_command(), |line| {
            lines += 1;
            raw_log
                .write_all(line.as_bytes())
                .context("Failed to write to the raw log")?;

            if let Some(record) =
                scan_line(line).with_context(|| format!("Malformed record from {config}"))?
            {
                let test = record.test().to_owned();
                store.insert(&test, config, record);
                records += 1;
            }

            suspend_progress_bar(|| eprintln!("{}", line.trim_end_matches(['\r', '\n'])));
            Ok(())
        })
        .await;

        let flushed = raw_log.flush().with_context(|| {
            format!(
                "Failed to flush the raw log {}",
                self.raw_log_path.display()
            )
        });
        let exit_status = result.with_context(|| format!("Failed to run {config}"))?;
        flushed?;

        if exit_status.success() {
            debug!("{config} collected {records} records out of {lines} lines");
        } else {
            warn!("{config} exited with {exit_status}, keeping the {records} records collected");
        }

        Ok(RunOutcome {
            exit_status,
            lines,
            records,
        })
    }
}
