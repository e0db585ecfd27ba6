// src/system/executor.rs

use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command could not be parsed: {0}")]
    CommandParse(String),
    #[error("No command specified to run.")]
    EmptyCommand,
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    #[error("Command '{0}' exited with a non-zero error code.")]
    NonZeroExitStatus(String),
    #[error("Command '{command}' produced output that was not valid UTF-8")]
    InvalidUtf8Output {
        command: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

impl ExecutionError {
    /// True when the failure means "this tool is not there": it could not be spawned,
    /// or it ran and reported failure.
    pub fn is_absence(&self) -> bool {
        matches!(self, Self::NonZeroExitStatus(_) | Self::CommandFailed(..))
    }
}

/// Runs short, side-effect-free commands and hands back their standard output.
///
/// The compatibility checker only ever talks to the outside world through this trait,
/// so tests can substitute canned tool output.
pub trait CommandRunner {
    fn capture(&self, command_line: &str) -> Result<String, ExecutionError>;
}

/// The real runner: spawns the process in a fixed working directory.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    cwd: PathBuf,
}

impl SystemRunner {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }
}

impl CommandRunner for SystemRunner {
    fn capture(&self, command_line: &str) -> Result<String, ExecutionError> {
        execute_and_capture_output(command_line, &self.cwd)
    }
}

/// Runs a program with inherited stdio and waits for it. Used for long-running builds
/// whose progress the user should see.
pub fn execute_program(program: &str, args: &[String], cwd: &Path) -> Result<(), ExecutionError> {
    let display = std::iter::once(program.to_string())
        .chain(args.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ");
    let clean_cwd = dunce::simplified(cwd);
    log::debug!("Executing '{}' in {}", display, clean_cwd.display());

    let status = StdCommand::new(program)
        .args(args)
        .current_dir(clean_cwd)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|e| ExecutionError::CommandFailed(display.clone(), e))?;

    if !status.success() {
        return Err(ExecutionError::NonZeroExitStatus(display));
    }
    Ok(())
}

/// Executes a command and captures its standard output. Stderr is discarded, since a
/// missing tool's complaints are expected and not interesting.
pub fn execute_and_capture_output(
    command_line: &str,
    cwd: &Path,
) -> Result<String, ExecutionError> {
    let trimmed_command = command_line.trim();
    let (program, args) = split_command_line(trimmed_command)?;
    let clean_cwd = dunce::simplified(cwd);

    let command_output = StdCommand::new(&program)
        .args(&args)
        .current_dir(clean_cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .map_err(|e| ExecutionError::CommandFailed(trimmed_command.to_string(), e))?;

    if !command_output.status.success() {
        return Err(ExecutionError::NonZeroExitStatus(
            trimmed_command.to_string(),
        ));
    }

    String::from_utf8(command_output.stdout).map_err(|e| ExecutionError::InvalidUtf8Output {
        command: trimmed_command.to_string(),
        source: e,
    })
}

fn split_command_line(command_line: &str) -> Result<(String, Vec<String>), ExecutionError> {
    let parts = shlex::split(command_line.trim())
        .ok_or_else(|| ExecutionError::CommandParse(command_line.to_string()))?;
    let mut parts = parts.into_iter();
    let program = parts.next().ok_or(ExecutionError::EmptyCommand)?;
    Ok((program, parts.collect()))
}
