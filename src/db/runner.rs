//! Subprocess execution for the database CLI tools
//!
//! One internal path for every CLI call: locate the binary, run it with a
//! timeout and captured output, classify the exit. The spawned process is
//! killed if the timeout drops the future mid-flight.

use crate::{DbError, DbResult};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Default timeout for short CLI invocations
pub(crate) const DEFAULT_CLI_TIMEOUT: Duration = Duration::from_secs(120);

/// Captured output of a finished CLI invocation
#[derive(Debug, Clone)]
pub struct CliOutput {
    /// Standard output content
    pub stdout: String,
    /// Standard error content
    pub stderr: String,
    /// Exit code; -1 when the process was killed by a signal
    pub exit_code: i32,
}

impl CliOutput {
    /// True when the command exited with code 0
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// The stdout if successful, otherwise a [`DbError::NonZeroExit`]
    pub fn require_success(&self) -> DbResult<&str> {
        if self.success() {
            Ok(&self.stdout)
        } else {
            Err(DbError::NonZeroExit {
                code: self.exit_code,
                stderr: crate::format_error(&self.stderr),
            })
        }
    }
}

/// Finds a tool on PATH
pub fn find_tool(tool: &str) -> Option<PathBuf> {
    which::which(tool).ok()
}

/// True when a tool is available on PATH
pub fn tool_available(tool: &str) -> bool {
    find_tool(tool).is_some()
}

/// Resolves a tool or fails with an install hint
pub fn require_tool(tool: &str, hint: &str) -> DbResult<PathBuf> {
    find_tool(tool).ok_or_else(|| {
        tracing::error!(tool, "Required CLI tool not found on PATH");
        DbError::CliMissing {
            tool: tool.to_string(),
            hint: hint.to_string(),
        }
    })
}

/// Runs a CLI command to completion, capturing its output
///
/// `stdin_input` is written to the child's stdin and then closed, for tools
/// that prompt. The child is killed if `timeout` elapses.
pub(crate) async fn run_cli(
    program: &Path,
    args: &[&str],
    cwd: Option<&Path>,
    stdin_input: Option<&str>,
    timeout: Duration,
) -> DbResult<CliOutput> {
    let tool = program
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| program.display().to_string());

    tracing::debug!(tool, ?args, "Running command");

    let mut command = Command::new(program);
    command
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .stdin(if stdin_input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .kill_on_drop(true);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let mut child = command.spawn()?;

    if let Some(input) = stdin_input {
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input.as_bytes()).await?;
            // dropping stdin closes the pipe
        }
    }

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result?,
        Err(_) => {
            tracing::warn!(tool, ?timeout, "Command timed out");
            return Err(DbError::Timeout { tool, timeout });
        }
    };

    let result = CliOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    };

    tracing::debug!(tool, exit_code = result.exit_code, "Command completed");

    Ok(result)
}
