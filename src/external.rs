//! Thin wrapper for running the build and install commands after generation.
//!
//! Commands are handed to the platform shell verbatim and run synchronously. Their stdout and
//! stderr are captured and returned together so the caller decides what to print.

use std::process::Command;

use crate::models::CommandOutput;

/// Failure of an external command.
#[derive(Debug, thiserror::Error)]
pub enum ExternalCommandError {
    /// The shell could not be started.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        /// Command line handed to the shell.
        command: String,
        /// Source I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The command ran but exited with a non-zero status.
    #[error("`{command}` failed with exit code {}\n{output}", describe_exit_code(.exit_code))]
    Failed {
        /// Command line handed to the shell.
        command: String,
        /// Exit status code, absent when the process was terminated by a signal.
        exit_code: Option<i32>,
        /// Captured stdout followed by captured stderr.
        output: String,
    },
}

/// Run `command` through the platform shell and capture its combined output.
///
/// Any non-zero exit status is turned into [`ExternalCommandError::Failed`].
pub fn run_external_command(
    command: &str,
    title: &str,
) -> Result<CommandOutput, ExternalCommandError> {
    tracing::info!(title = %title, command = %command, "running external command");

    let output = shell_command(command)
        .output()
        .map_err(|source| ExternalCommandError::Spawn {
            command: command.to_string(),
            source,
        })?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    let exit_code = output.status.code();

    if output.status.success() {
        tracing::debug!(command = %command, "command completed successfully");
        Ok(CommandOutput {
            command: command.to_string(),
            exit_code,
            output: combined,
        })
    } else {
        tracing::error!(command = %command, exit_code = ?exit_code, "command exited with error");
        Err(ExternalCommandError::Failed {
            command: command.to_string(),
            exit_code,
            output: combined,
        })
    }
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(not(windows))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

fn describe_exit_code(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}
