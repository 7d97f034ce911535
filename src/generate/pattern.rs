use super::{finish_run, print_summary, RunSummary};
use crate::cli::CommonArgs;
use crate::config::Config;
use crate::error::Result;
use crate::git::writer::format_git_date;
use crate::git::{ensure_clean, CommitWriter, Execute, GitRepo, PushMode, Runner, ShellExecutor};
use crate::layout::{render, CalendarAnchor, Message};
use crate::model::{CommitRecord, GenerationReport, InkCell};
use crate::progress;
use anyhow::Context;
use chrono::NaiveTime;
use console::style;
use indicatif::ProgressBar;
use tracing::{debug, info};

pub fn exec(common: &CommonArgs) -> anyhow::Result<()> {
    let repo = GitRepo::open(common.repo.as_ref()).context("Failed to open git repository")?;
    let config = Config::from_args(common, repo.path().to_path_buf()).context("Invalid configuration")?;

    println!(
        "\n{}",
        style(format!("Drawing {:?} into {}...", config.message, config.target_year)).cyan().bold()
    );
    let mut runner = Runner::new(ShellExecutor::new(repo.path()));
    let pb = progress::bar(0, "Progress");
    let summary = generate_pattern(&config, &mut runner, &pb).context("Pattern generation failed")?;
    progress::finish(&pb);
    print_summary(&config, &summary);
    Ok(())
}

/// Lays out `message` for the configured year.
pub fn layout(config: &Config, message: &Message) -> Result<(CalendarAnchor, Vec<InkCell>)> {
    let anchor = CalendarAnchor::for_year(config.target_year, config.alignment)?;
    let cells = render(message, &anchor)?;
    Ok((anchor, cells))
}

/// `per_cell` identical midnight commits for one ink cell.
pub fn plan_cell(cell: &InkCell, per_cell: u32) -> Vec<CommitRecord> {
    let timestamp = cell.date.and_time(NaiveTime::MIN);
    let message = format!("{} letter commit {}", cell.glyph, format_git_date(&timestamp));
    (0..per_cell)
        .map(|_| CommitRecord {
            timestamp,
            message: message.clone(),
        })
        .collect()
}

/// Draws the configured message into the target year's contribution grid.
pub fn generate_pattern<E: Execute>(
    config: &Config,
    runner: &mut Runner<E>,
    progress: &ProgressBar,
) -> Result<RunSummary> {
    ensure_clean(runner)?;

    let message = config.parsed_message()?;
    let (anchor, cells) = layout(config, &message)?;
    let total = u64::from(config.commits_per_cell) * cells.len() as u64;
    info!(
        year = config.target_year,
        anchor = %anchor.date,
        start_offset = anchor.start_offset,
        cells = cells.len(),
        total,
        "starting pattern generation"
    );
    progress.set_length(total);

    let mut report = GenerationReport::default();
    let mut writer = CommitWriter::new(runner, &config.workdir, &config.scratch_log);
    for cell in &cells {
        debug!(glyph = %cell.glyph, row = cell.row, column = cell.column, date = %cell.date, "drawing cell");
        for record in plan_cell(cell, config.commits_per_cell) {
            let outcome = writer.write_commit(&record.timestamp, &record.message)?;
            report.record(outcome.is_success());
            progress.inc(1);
        }
        report.units += 1;
    }
    writer.truncate_log()?;

    Ok(finish_run(config, runner, report, PushMode::Force))
}
