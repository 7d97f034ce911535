//! Removes every commit authored within a year from all branches.

pub mod filter;

pub use filter::{author_date_in_range, commit_filter_script, parse_author_date};

use crate::cli::CommonArgs;
use crate::config::Config;
use crate::error::Result;
use crate::git::{ensure_clean, publish, Execute, GitRepo, Invocation, PushMode, Published, Runner, ShellExecutor};
use crate::model::DateRange;
use crate::prompt::{Confirm, LineConfirm};
use anyhow::Context;
use console::style;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info, warn};

const ORIGINAL_REFS: &str = "refs/original/";

pub fn exec(common: &CommonArgs) -> anyhow::Result<()> {
    let repo = GitRepo::open(common.repo.as_ref()).context("Failed to open git repository")?;
    let config = Config::from_args(common, repo.path().to_path_buf()).context("Invalid configuration")?;
    let program = std::env::current_exe().context("Failed to locate the commitpaint executable")?;

    println!(
        "{} This rewrites history on every branch of {}.",
        style("[WARNING]").red().bold(),
        repo.path().display()
    );
    println!("Make sure you have a backup before continuing.\n");

    let mut runner = Runner::new(ShellExecutor::new(repo.path()));
    let mut pruner = Pruner::new(&config, &mut runner, LineConfirm::stdin(), program)?;
    match pruner.run().context("Pruning failed")? {
        PruneOutcome::Declined => println!("Aborted. Nothing was changed."),
        PruneOutcome::Pruned { matched, published } => {
            println!(
                "{} Removed {} commit(s) from {}.",
                style("[Done]").green().bold(),
                matched,
                config.target_year
            );
            match published {
                Some(Published::Pushed) => println!("{} New history force-pushed.", style("[Done]").green().bold()),
                Some(Published::PushFailed) => {
                    println!("{} Force push failed; the local history is already rewritten.", style("[WARN]").yellow().bold())
                }
                Some(Published::NoRemote) => println!("No remote configured; nothing pushed."),
                None => println!("History rewritten locally. Push manually with: git push -f origin {}", config.branch),
            }
        }
    }
    Ok(())
}

/// Commit-filter predicate: success when `date` (a git author date) lies in
/// `[start, end]`, failure otherwise.
///
/// Nothing is written to stdout; the commit filter captures it as the new
/// commit id. An unreadable date keeps the commit.
pub fn date_in_range(start: i64, end: i64, date: Option<&str>) -> ExitCode {
    let Some(raw) = date else {
        warn!("no author date given, keeping commit");
        return ExitCode::FAILURE;
    };
    let range = match DateRange::new(start, end) {
        Ok(range) => range,
        Err(err) => {
            warn!(%err, "invalid range, keeping commit");
            return ExitCode::FAILURE;
        }
    };
    match author_date_in_range(raw, &range) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            warn!(%err, raw, "unparseable author date, keeping commit");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneState {
    Idle,
    PreflightChecked,
    Confirmed,
    Rewritten,
    Cleaned,
    PushConfirmed,
    Done,
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneOutcome {
    /// The user did not approve the rewrite; nothing changed.
    Declined,
    Pruned {
        /// Commits in range before the rewrite.
        matched: usize,
        published: Option<Published>,
    },
}

pub struct Pruner<'a, E, C> {
    config: &'a Config,
    runner: &'a mut Runner<E>,
    confirm: C,
    /// Program the commit filter calls for `date-in-range`.
    filter_program: PathBuf,
    range: DateRange,
    state: PruneState,
}

impl<'a, E: Execute, C: Confirm> Pruner<'a, E, C> {
    pub fn new(config: &'a Config, runner: &'a mut Runner<E>, confirm: C, filter_program: PathBuf) -> Result<Self> {
        Ok(Self {
            range: DateRange::local_year(config.target_year)?,
            config,
            runner,
            confirm,
            filter_program,
            state: PruneState::Idle,
        })
    }

    pub fn state(&self) -> PruneState {
        self.state
    }

    fn transition(&mut self, next: PruneState) {
        debug!(from = ?self.state, to = ?next, "prune state");
        self.state = next;
    }

    pub fn run(&mut self) -> Result<PruneOutcome> {
        let year = self.config.target_year;

        ensure_clean(&mut *self.runner)?;
        self.transition(PruneState::PreflightChecked);

        let matched = self.count_matching()?;
        info!(year, matched, "commits authored in target year");

        let question = format!("Are you sure you want to remove {matched} commit(s) from {year}?");
        if !self.confirm.confirm(&question)? {
            self.transition(PruneState::Declined);
            return Ok(PruneOutcome::Declined);
        }
        self.transition(PruneState::Confirmed);

        self.rewrite()?;
        self.transition(PruneState::Rewritten);

        self.cleanup()?;
        self.transition(PruneState::Cleaned);

        let published = if self.confirm.confirm("Do you want to FORCE push the new history to remote?")? {
            self.transition(PruneState::PushConfirmed);
            Some(publish(
                &mut *self.runner,
                &self.config.branch,
                self.config.repository_url.as_deref(),
                PushMode::Force,
            ))
        } else {
            None
        };
        self.transition(PruneState::Done);

        Ok(PruneOutcome::Pruned { matched, published })
    }

    /// Commits on any ref whose author date falls in the range.
    fn count_matching(&mut self) -> Result<usize> {
        let log = self
            .runner
            .run(&Invocation::git(["log", "--all", "--format=%at"]));
        let stdout = match log.into_result() {
            Ok(completed) => completed.stdout,
            // Unborn branch: nothing to count.
            Err(_) => return Ok(0),
        };
        Ok(stdout
            .lines()
            .filter_map(|line| line.trim().parse::<i64>().ok())
            .filter(|ts| self.range.contains(*ts))
            .count())
    }

    fn rewrite(&mut self) -> Result<()> {
        let script = commit_filter_script(&self.filter_program, &self.range);
        let filter_branch = Invocation::git(["filter-branch", "--force", "--commit-filter", script.as_str(), "--", "--all"])
            .env("FILTER_BRANCH_SQUELCH_WARNING", "1");
        info!(start = self.range.start, end = self.range.end, "rewriting history");
        self.runner.run_checked(&filter_branch)?;
        Ok(())
    }

    /// Drops the rewrite backups and everything only they kept alive.
    fn cleanup(&mut self) -> Result<()> {
        let backups = self
            .runner
            .run_checked(&Invocation::git(["for-each-ref", "--format=%(refname)", ORIGINAL_REFS]))?;
        for reference in backups.stdout.lines().map(str::trim).filter(|r| !r.is_empty()) {
            self.runner
                .run_checked(&Invocation::git(["update-ref", "-d", reference]))?;
        }
        self.runner
            .run_checked(&Invocation::git(["reflog", "expire", "--expire=now", "--all"]))?;
        self.runner
            .run_checked(&Invocation::git(["gc", "--prune=now", "--aggressive"]))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PaintError;
    use crate::git::Completed;
    use crate::testing::{testing_config, ScriptedExecutor};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn answers(list: &'static [bool]) -> impl FnMut(&str) -> bool {
        let mut iter = list.iter().copied();
        move |_: &str| iter.next().unwrap_or(false)
    }

    fn healthy_repo(author_times: impl Into<String>) -> ScriptedExecutor {
        let author_times = author_times.into();
        ScriptedExecutor::new(move |inv| {
            if inv.is_git(&["log"]) {
                Ok(Completed::ok(author_times.clone()))
            } else if inv.is_git(&["for-each-ref"]) {
                Ok(Completed::ok("refs/original/refs/heads/main\nrefs/original/refs/heads/side\n"))
            } else {
                Ok(Completed::ok(""))
            }
        })
    }

    #[test]
    fn declining_leaves_history_alone() {
        let config = testing_config(2023);
        let mut runner = Runner::new(healthy_repo(""));
        let mut pruner = Pruner::new(&config, &mut runner, answers(&[false]), PathBuf::from("commitpaint")).unwrap();
        assert_eq!(pruner.run().unwrap(), PruneOutcome::Declined);
        assert_eq!(pruner.state(), PruneState::Declined);
        assert!(runner.executor().calls_matching(&["filter-branch"]).is_empty());
    }

    #[test]
    fn dirty_tree_fails_before_asking() {
        let config = testing_config(2023);
        let asked = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&asked);
        let mut runner = Runner::new(ScriptedExecutor::new(|inv| {
            if inv.is_git(&["status"]) {
                Ok(Completed::ok("?? notes.txt\n"))
            } else {
                Ok(Completed::ok(""))
            }
        }));
        let confirm = move |_: &str| {
            *counter.borrow_mut() += 1;
            true
        };
        let mut pruner = Pruner::new(&config, &mut runner, confirm, PathBuf::from("commitpaint")).unwrap();
        assert!(matches!(pruner.run(), Err(PaintError::DirtyWorkTree)));
        assert_eq!(*asked.borrow(), 0);
        assert_eq!(runner.executor().calls().len(), 1);
    }

    #[test]
    fn confirmed_prune_rewrites_then_cleans_up() {
        let config = testing_config(2023);
        let range = DateRange::local_year(2023).unwrap();
        let hits = format!("{}\n{}\n{}\n", range.start, range.end, range.end + 1);
        let mut runner = Runner::new(healthy_repo(hits));
        let mut pruner = Pruner::new(&config, &mut runner, answers(&[true, false]), PathBuf::from("/bin/commitpaint")).unwrap();

        assert_eq!(
            pruner.run().unwrap(),
            PruneOutcome::Pruned {
                matched: 2,
                published: None
            }
        );
        assert_eq!(pruner.state(), PruneState::Done);

        let commands: Vec<String> = runner
            .executor()
            .calls()
            .iter()
            .map(|c| c.args.iter().take(3).cloned().collect::<Vec<_>>().join(" "))
            .collect();
        assert_eq!(
            commands,
            vec![
                "status --porcelain",
                "log --all --format=%at",
                "filter-branch --force --commit-filter",
                "for-each-ref --format=%(refname) refs/original/",
                "update-ref -d refs/original/refs/heads/main",
                "update-ref -d refs/original/refs/heads/side",
                "reflog expire --expire=now",
                "gc --prune=now --aggressive",
            ]
        );

        let filter = &runner.executor().calls_matching(&["filter-branch"])[0];
        assert_eq!(filter.args.last().map(String::as_str), Some("--all"));
        assert!(filter.args[3].contains(&format!("--start {} --end {}", range.start, range.end)));
        assert_eq!(filter.env_value("FILTER_BRANCH_SQUELCH_WARNING"), Some("1"));
    }

    #[test]
    fn push_after_second_confirmation_is_forced() {
        let config = testing_config(2023);
        let mut runner = Runner::new(healthy_repo(""));
        let mut pruner = Pruner::new(&config, &mut runner, answers(&[true, true]), PathBuf::from("commitpaint")).unwrap();
        let outcome = pruner.run().unwrap();
        assert_eq!(
            outcome,
            PruneOutcome::Pruned {
                matched: 0,
                published: Some(Published::Pushed)
            }
        );
        assert_eq!(runner.executor().calls_matching(&["push", "-f", "origin", "main"]).len(), 1);
    }

    #[test]
    fn failed_gc_aborts() {
        let config = testing_config(2023);
        let mut runner = Runner::new(ScriptedExecutor::new(|inv| {
            if inv.is_git(&["gc"]) {
                Ok(Completed::failed(128, "fatal: gc is already running"))
            } else {
                Ok(Completed::ok(""))
            }
        }));
        let mut pruner = Pruner::new(&config, &mut runner, answers(&[true, true]), PathBuf::from("commitpaint")).unwrap();
        assert!(matches!(pruner.run(), Err(PaintError::CommandFailed { code: Some(128), .. })));
        assert!(runner.executor().calls_matching(&["push"]).is_empty());
    }

    #[test]
    fn failed_rewrite_skips_cleanup() {
        let config = testing_config(2023);
        let mut runner = Runner::new(ScriptedExecutor::new(|inv| {
            if inv.is_git(&["filter-branch"]) {
                Ok(Completed::failed(1, "Cannot rewrite branches"))
            } else {
                Ok(Completed::ok(""))
            }
        }));
        let mut pruner = Pruner::new(&config, &mut runner, answers(&[true]), PathBuf::from("commitpaint")).unwrap();
        assert!(pruner.run().is_err());
        assert!(runner.executor().calls_matching(&["gc"]).is_empty());
    }
}
