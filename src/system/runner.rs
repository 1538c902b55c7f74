// file: src/system/runner.rs
// version: 1.0.0
// guid: df466301-54bf-444b-8530-3b92e39ee90f

//! External command execution

use crate::error::PostInstallError;
use crate::logging::log_command_output;
use crate::Result;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Captured result of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Send stdout and stderr to the run log file
    pub fn log(&self) {
        log_command_output(&self.stdout, &self.stderr);
    }
}

/// Trait for running external programs to completion
#[async_trait::async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, wait for it, and capture its output.
    /// A non-zero exit status is not an error; failing to start is.
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;
}

/// Render a command the way it would be typed, for log lines and errors
pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs commands on the local machine with apt kept non-interactive
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let line = command_line(program, args);
        debug!("Executing local command: {}", line);

        let resolved = which::which(program).map_err(|e| PostInstallError::Process {
            command: line.clone(),
            exit_code: None,
            stderr: format!("Command not found: {}", e),
        })?;

        let output = Command::new(resolved)
            .args(args)
            .env("DEBIAN_FRONTEND", "noninteractive")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| PostInstallError::Process {
                command: line.clone(),
                exit_code: None,
                stderr: format!("Failed to execute command: {}", e),
            })?;

        let result = CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!("Command `{}` exited with {:?}", line, result.exit_code);

        Ok(result)
    }
}
