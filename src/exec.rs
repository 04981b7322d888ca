use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{GsiError, Result};
use crate::log::Logger;

/// How a spawned command's output is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Stream stdout/stderr straight to the user's terminal.
    Inherit,
    /// Discard all output. Only the exit status matters.
    Quiet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandExit {
    Success,
    Failure(Option<i32>),
}

impl CommandExit {
    pub fn success(self) -> bool {
        matches!(self, CommandExit::Success)
    }
}

/// Runs a shell command line to completion.
pub trait CommandRunner {
    fn run(&self, command: &str, dir: &Path, output: OutputMode) -> std::io::Result<CommandExit>;
}

/// Runs commands through `sh -c`, blocking until they exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, dir: &Path, output: OutputMode) -> std::io::Result<CommandExit> {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command).current_dir(dir);
        if output == OutputMode::Quiet {
            cmd.stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
        }

        let status = cmd.status()?;
        Ok(if status.success() {
            CommandExit::Success
        } else {
            CommandExit::Failure(status.code())
        })
    }
}

/// Quote `value` as a single `sh` word.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Dry-run aware command execution rooted at the project directory.
pub struct Executor<'a> {
    runner: &'a dyn CommandRunner,
    dir: PathBuf,
    dry_run: bool,
}

impl<'a> Executor<'a> {
    pub fn new(runner: &'a dyn CommandRunner, dir: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            runner,
            dir: dir.into(),
            dry_run,
        }
    }

    /// Run `command` with live output, or only log it under dry-run.
    ///
    /// A non-zero exit becomes [`GsiError::CommandFailed`] tagged with `description`.
    pub fn execute(&self, log: &Logger, command: &str, description: &str) -> Result<()> {
        log.info(description);
        log.verbose(format!("Command: {command}"));

        if self.dry_run {
            log.dry_run(format!("Would execute: {command}"));
            return Ok(());
        }

        let exit = self
            .runner
            .run(command, &self.dir, OutputMode::Inherit)
            .map_err(|e| GsiError::CommandSpawn {
                description: description.to_string(),
                source: e,
            })?;

        match exit {
            CommandExit::Success => {
                log.success(format!("{description} - Done"));
                Ok(())
            }
            CommandExit::Failure(code) => {
                log.error(format!("{description} - Failed"));
                Err(GsiError::CommandFailed {
                    description: description.to_string(),
                    code,
                })
            }
        }
    }

    /// Existence/state probe with output suppressed.
    ///
    /// Runs even under dry-run, so it must only be given side-effect free commands.
    pub fn probe(&self, command: &str) -> bool {
        self.runner
            .run(command, &self.dir, OutputMode::Quiet)
            .map(CommandExit::success)
            .unwrap_or(false)
    }
}
