use crate::error::Result;
use crate::git::runner::{Execute, Invocation, Outcome, Runner};
use chrono::NaiveDateTime;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::trace;

pub const GIT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn format_git_date(timestamp: &NaiveDateTime) -> String {
    timestamp.format(GIT_DATE_FORMAT).to_string()
}

/// Produces backdated commits by appending to the scratch log.
pub struct CommitWriter<'r, E> {
    runner: &'r mut Runner<E>,
    log_path: PathBuf,
    log_arg: String,
}

impl<'r, E: Execute> CommitWriter<'r, E> {
    /// `scratch_log` is relative to `workdir`.
    pub fn new(runner: &'r mut Runner<E>, workdir: &Path, scratch_log: &Path) -> Self {
        Self {
            runner,
            log_path: workdir.join(scratch_log),
            log_arg: scratch_log.to_string_lossy().into_owned(),
        }
    }

    /// Appends `message`, stages the scratch log and commits it with author and
    /// committer dates set to `timestamp`.
    ///
    /// Staging and committing are best effort; only a failure to write the
    /// scratch log is an error.
    pub fn write_commit(&mut self, timestamp: &NaiveDateTime, message: &str) -> Result<Outcome> {
        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(log, "{message}")?;
        drop(log);

        let date = format_git_date(timestamp);
        trace!(%date, message, "writing commit");

        self.runner.run(&Invocation::git(["add", self.log_arg.as_str()]));
        let commit = Invocation::git(["commit", "-m", message])
            .env("GIT_AUTHOR_DATE", date.as_str())
            .env("GIT_COMMITTER_DATE", date.as_str());
        Ok(self.runner.run(&commit))
    }

    /// Empties the scratch log once a run is over.
    pub fn truncate_log(&self) -> Result<()> {
        if self.log_path.exists() {
            fs::write(&self.log_path, "")?;
        }
        Ok(())
    }
}
