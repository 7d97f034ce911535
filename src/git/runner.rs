//! External command execution.
//!
//! Every git mutation goes through [`Runner`], which distinguishes commands
//! whose failure is tolerated from commands whose failure must stop the run.

use crate::error::{PaintError, Result};
use std::fmt;
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, warn};

const GIT_COMMAND: &str = "git";

/// A program invocation: program, arguments and extra environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
}

impl Invocation {
    pub fn git<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: GIT_COMMAND.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            envs: Vec::new(),
        }
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// True when this is `git <prefix...>`.
    pub fn is_git(&self, prefix: &[&str]) -> bool {
        self.program == GIT_COMMAND
            && self.args.len() >= prefix.len()
            && self.args.iter().zip(prefix).all(|(a, p)| a == p)
    }

    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.envs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.envs {
            write!(f, "{key}={value} ")?;
        }
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Captured result of a process that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completed {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl Completed {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Spawns processes. Implemented by [`ShellExecutor`] and by scripted fakes in tests.
pub trait Execute {
    fn execute(&mut self, invocation: &Invocation) -> std::io::Result<Completed>;
}

/// Runs commands inside a working directory with output captured.
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    workdir: PathBuf,
}

impl ShellExecutor {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }
}

impl Execute for ShellExecutor {
    fn execute(&mut self, invocation: &Invocation) -> std::io::Result<Completed> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(invocation.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&self.workdir)
            .output()?;

        Ok(Completed {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// How a failing command is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    BestEffort,
    Checked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub command: String,
    pub code: Option<i32>,
    pub stderr: String,
}

impl From<Failure> for PaintError {
    fn from(failure: Failure) -> Self {
        PaintError::CommandFailed {
            command: failure.command,
            code: failure.code,
            stderr: failure.stderr,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(Completed),
    /// Failed under [`Policy::BestEffort`]; the caller carries on.
    Ignored(Failure),
    /// Failed under [`Policy::Checked`]; the caller must abort.
    Fatal(Failure),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn into_result(self) -> Result<Completed> {
        match self {
            Outcome::Success(completed) => Ok(completed),
            Outcome::Ignored(failure) | Outcome::Fatal(failure) => Err(failure.into()),
        }
    }
}

pub struct Runner<E> {
    executor: E,
}

impl<E: Execute> Runner<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn run_with(&mut self, invocation: &Invocation, policy: Policy) -> Outcome {
        debug!(command = %invocation, ?policy, "running");

        let failure = match self.executor.execute(invocation) {
            Ok(completed) if completed.success => return Outcome::Success(completed),
            Ok(completed) => Failure {
                command: invocation.to_string(),
                code: completed.code,
                stderr: completed.stderr,
            },
            Err(e) => Failure {
                command: invocation.to_string(),
                code: None,
                stderr: e.to_string(),
            },
        };

        match policy {
            Policy::BestEffort => {
                warn!(command = %failure.command, code = ?failure.code, "ignoring failed command");
                Outcome::Ignored(failure)
            }
            Policy::Checked => Outcome::Fatal(failure),
        }
    }

    /// Fire-and-forget: failures are reported as [`Outcome::Ignored`].
    pub fn run(&mut self, invocation: &Invocation) -> Outcome {
        self.run_with(invocation, Policy::BestEffort)
    }

    /// Failures become [`PaintError::CommandFailed`].
    pub fn run_checked(&mut self, invocation: &Invocation) -> Result<Completed> {
        self.run_with(invocation, Policy::Checked).into_result()
    }
}
