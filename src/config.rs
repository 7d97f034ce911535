use crate::cli::CommonArgs;
use crate::error::{PaintError, Result};
use crate::layout::{GridAlignment, Message};
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_SCRATCH_LOG: &str = "src/commit_log.txt";

/// Everything a run needs, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Repository root.
    pub workdir: PathBuf,
    pub repository_url: Option<String>,
    pub branch: String,
    pub target_year: i32,
    pub min_commits_per_day: u32,
    pub max_commits_per_day: u32,
    pub commits_per_cell: u32,
    pub message: String,
    pub alignment: GridAlignment,
    /// Relative to `workdir`.
    pub scratch_log: PathBuf,
}

impl Config {
    pub fn from_args(common: &CommonArgs, workdir: PathBuf) -> Result<Self> {
        let config = Self {
            workdir,
            repository_url: common.repo_url.clone().filter(|url| !url.trim().is_empty()),
            branch: common.branch.clone(),
            target_year: common.year,
            min_commits_per_day: common.min_commits,
            max_commits_per_day: common.max_commits,
            commits_per_cell: common.commits_per_cell,
            message: common.message.clone(),
            alignment: common.alignment,
            scratch_log: common.scratch_log.clone(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=9998).contains(&self.target_year) {
            return Err(PaintError::InvalidConfig(format!(
                "target year {} is out of range",
                self.target_year
            )));
        }
        if self.branch.trim().is_empty() {
            return Err(PaintError::InvalidConfig("branch name is empty".to_string()));
        }
        if self.min_commits_per_day > self.max_commits_per_day {
            return Err(PaintError::InvalidDateRange(format!(
                "min commits per day ({}) exceeds max ({})",
                self.min_commits_per_day, self.max_commits_per_day
            )));
        }
        if self.commits_per_cell == 0 {
            return Err(PaintError::InvalidConfig(
                "commits per ink cell must be at least 1".to_string(),
            ));
        }
        if !is_inside_repository(&self.scratch_log) {
            return Err(PaintError::InvalidConfig(format!(
                "scratch log {} must be a relative path inside the repository",
                self.scratch_log.display()
            )));
        }
        Ok(())
    }

    pub fn parsed_message(&self) -> Result<Message> {
        Message::parse(&self.message)
    }
}

fn is_inside_repository(path: &Path) -> bool {
    path.file_name().is_some()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        && !path.starts_with(".git")
}
