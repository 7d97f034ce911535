use crate::error::{PaintError, Result};
use crate::git::runner::{Execute, Invocation, Outcome, Runner};
use gix::discover;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const REMOTE_NAME: &str = "origin";

pub struct GitRepo {
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or(std::env::current_dir()?);

        let repo = discover(&repo_path)?;
        let path = repo
            .workdir()
            .ok_or_else(|| PaintError::GitRepo(format!("{} is a bare repository", repo.path().display())))?
            .to_path_buf();

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Resolves the working directory for a generator run.
///
/// A directory inside an existing worktree resolves to that worktree's root.
/// Unlike [`GitRepo::open`] this also accepts a directory outside any
/// repository; the generator initializes it.
pub fn resolve_workdir<P: AsRef<Path>>(path: Option<P>) -> Result<PathBuf> {
    let dir = path
        .map(|p| p.as_ref().to_path_buf())
        .unwrap_or(std::env::current_dir()?);
    match GitRepo::open(Some(&dir)) {
        Ok(repo) => Ok(repo.path().to_path_buf()),
        // Bare repository: nothing to paint into, and no place for a nested init.
        Err(err @ PaintError::GitRepo(_)) => Err(err),
        Err(err) => {
            debug!(path = %dir.display(), %err, "no enclosing repository");
            Ok(dir)
        }
    }
}

pub fn init_if_missing<E: Execute>(runner: &mut Runner<E>, workdir: &Path) -> Result<()> {
    if !workdir.join(".git").exists() {
        info!(path = %workdir.display(), "initializing repository");
        runner.run_checked(&Invocation::git(["init"]))?;
    }
    Ok(())
}

/// Fails with [`PaintError::DirtyWorkTree`] when `git status --porcelain` lists anything.
pub fn ensure_clean<E: Execute>(runner: &mut Runner<E>) -> Result<()> {
    let status = runner.run_checked(&Invocation::git(["status", "--porcelain"]))?;
    if status.stdout.trim().is_empty() {
        Ok(())
    } else {
        Err(PaintError::DirtyWorkTree)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushMode {
    Normal,
    Force,
}

/// Result of the rename/remote/push sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Published {
    Pushed,
    PushFailed,
    NoRemote,
}

/// Renames the current branch, makes sure `origin` exists and pushes.
///
/// Every step is best effort.
pub fn publish<E: Execute>(
    runner: &mut Runner<E>,
    branch: &str,
    repository_url: Option<&str>,
    mode: PushMode,
) -> Published {
    runner.run(&Invocation::git(["branch", "-M", branch]));

    let has_remote = runner
        .run(&Invocation::git(["remote", "get-url", REMOTE_NAME]))
        .is_success();
    if !has_remote {
        match repository_url {
            Some(url) => {
                runner.run(&Invocation::git(["remote", "add", REMOTE_NAME, url]));
            }
            None => {
                warn!("no remote '{REMOTE_NAME}' and no repository URL configured; skipping push");
                return Published::NoRemote;
            }
        }
    }

    let push = match mode {
        PushMode::Normal => Invocation::git(["push", REMOTE_NAME, branch]),
        PushMode::Force => Invocation::git(["push", "-f", REMOTE_NAME, branch]),
    };
    match runner.run(&push) {
        Outcome::Success(_) => Published::Pushed,
        _ => Published::PushFailed,
    }
}
