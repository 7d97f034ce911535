use super::{finish_run, print_summary, RunSummary};
use crate::cli::CommonArgs;
use crate::config::Config;
use crate::error::Result;
use crate::git::repo::resolve_workdir;
use crate::git::writer::format_git_date;
use crate::git::{ensure_clean, init_if_missing, CommitWriter, Execute, Invocation, PushMode, Runner, ShellExecutor};
use crate::layout::year_days;
use crate::model::{CommitRecord, GenerationReport};
use crate::progress;
use anyhow::Context;
use chrono::NaiveDate;
use console::style;
use indicatif::ProgressBar;
use rand::Rng;
use tracing::{debug, info};

pub fn exec(common: &CommonArgs) -> anyhow::Result<()> {
    let workdir = resolve_workdir(common.repo.as_ref()).context("Failed to resolve working directory")?;
    let config = Config::from_args(common, workdir).context("Invalid configuration")?;

    println!(
        "\n{}",
        style(format!("Starting commit generation for {}...", config.target_year)).cyan().bold()
    );
    let mut runner = Runner::new(ShellExecutor::new(&config.workdir));
    let pb = progress::bar(0, "Progress");
    let summary = generate_uniform(&config, &mut runner, &mut rand::thread_rng(), &pb)
        .context("Uniform generation failed")?;
    progress::finish(&pb);
    print_summary(&config, &summary);
    Ok(())
}

/// Random commits for one day: a count in `[min, max]`, each at a random
/// hour and minute, second zero.
pub fn plan_day<R: Rng + ?Sized>(date: NaiveDate, min: u32, max: u32, rng: &mut R) -> Vec<CommitRecord> {
    let count = rng.gen_range(min..=max);
    (0..count)
        .filter_map(|_| {
            let hour = rng.gen_range(0..=23);
            let minute = rng.gen_range(0..=59);
            date.and_hms_opt(hour, minute, 0)
        })
        .map(|timestamp| CommitRecord {
            message: format!("Commit from {}", format_git_date(&timestamp)),
            timestamp,
        })
        .collect()
}

/// Fills every day of the target year with a random number of commits.
pub fn generate_uniform<E, R>(
    config: &Config,
    runner: &mut Runner<E>,
    rng: &mut R,
    progress: &ProgressBar,
) -> Result<RunSummary>
where
    E: Execute,
    R: Rng + ?Sized,
{
    init_if_missing(runner, &config.workdir)?;
    ensure_clean(runner)?;

    runner.run(&Invocation::git(["pull", "origin", config.branch.as_str(), "--rebase"]));

    let days = year_days(config.target_year)?;
    info!(year = config.target_year, days = days.len(), "starting uniform generation");
    progress.set_length(days.len() as u64);

    let mut report = GenerationReport::default();
    let mut writer = CommitWriter::new(runner, &config.workdir, &config.scratch_log);
    for day in days {
        let planned = plan_day(day, config.min_commits_per_day, config.max_commits_per_day, rng);
        debug!(%day, commits = planned.len(), "day planned");
        for record in planned {
            let outcome = writer.write_commit(&record.timestamp, &record.message)?;
            report.record(outcome.is_success());
        }
        report.units += 1;
        progress.inc(1);
    }
    writer.truncate_log()?;

    Ok(finish_run(config, runner, report, PushMode::Normal))
}
