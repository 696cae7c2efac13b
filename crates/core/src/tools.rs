use anyhow::{bail, Context, Result};
use std::ffi::OsStr;
use std::process::{Command, Output};
use std::time::Instant;

/// Runs an external program to completion and fails on a non-zero exit,
/// carrying the trimmed stderr in the error.
pub(crate) fn run_tool<I, S>(program: &str, args: I) -> Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command.args(args);
    tracing::debug!(tool = program, command = ?command, "running external tool");

    let started = Instant::now();
    let output = command
        .output()
        .with_context(|| format!("failed to launch {program}"))?;
    tracing::debug!(
        tool = program,
        status = ?output.status.code(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "external tool finished"
    );

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.trim().is_empty() {
            bail!("{program} exited with {:?}", output.status.code());
        }
        bail!("{program} failed: {}", stderr.trim());
    }

    Ok(output)
}
