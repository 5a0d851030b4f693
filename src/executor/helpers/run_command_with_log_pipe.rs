use crate::executor::EXECUTOR_TARGET;
use crate::prelude::*;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// Read the next line, line ending included, replacing invalid UTF-8.
async fn next_line_lossy<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    buffer: &mut Vec<u8>,
) -> std::io::Result<Option<String>> {
    buffer.clear();
    if reader.read_until(b'\n', buffer).await? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(buffer).into_owned()))
}

/// Run a command, logging its stdout and handing each stderr line to `on_stderr_line`
///
/// # Arguments
/// - `cmd`: The command to run.
/// - `on_stderr_line`: Called with every stderr line, line ending included, as soon as it is
///   read. An error stops the reading and kills the process.
///
/// # Returns
///
/// The exit status of the command.
///
pub async fn run_command_with_log_pipe<F>(
    mut cmd: Command,
    mut on_stderr_line: F,
) -> Result<ExitStatus>
where
    F: FnMut(&str) -> Result<()>,
{
    let mut process = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .context("failed to spawn the process")?;
    let stdout = process.stdout.take().context("unable to get stdout")?;
    let stderr = process.stderr.take().context("unable to get stderr")?;

    // Drained on its own so that a chatty stdout never fills up its pipe
    let stdout_task = tokio::spawn(async move {
        let mut reader = BufReader::new(stdout);
        let mut buffer = Vec::new();
        while let Ok(Some(line)) = next_line_lossy(&mut reader, &mut buffer).await {
            debug!(target: EXECUTOR_TARGET, "[stdout] {}", line.trim_end());
        }
    });

    let mut reader = BufReader::new(stderr);
    let mut buffer = Vec::new();
    while let Some(line) = next_line_lossy(&mut reader, &mut buffer)
        .await
        .context("failed to read the process stderr")?
    {
        on_stderr_line(&line)?;
    }

    let status = process
        .wait()
        .await
        .context("failed to wait for the process")?;
    if let Err(e) = stdout_task.await {
        warn!("Failed to drain the process stdout: {e}");
    }

    Ok(status)
}
