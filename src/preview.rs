//! Terminal and JSON rendering of a message layout, without touching any repository.

use crate::cli::CommonArgs;
use crate::config::Config;
use crate::generate::layout;
use crate::layout::{grid_columns, grid_position, CalendarAnchor};
use crate::model::{InkCell, LayoutOutput, SCHEMA_VERSION};
use anyhow::Context;
use chrono::{Datelike, NaiveDate, Utc};
use console::style;
use std::collections::HashSet;

const WEEKDAY_LABELS: [&str; 7] = ["   ", "Mon", "   ", "Wed", "   ", "Fri", "   "];
const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const INK_MARK: char = '#';
pub const EMPTY_MARK: char = '.';

pub fn exec(common: &CommonArgs, json: bool) -> anyhow::Result<()> {
    let workdir = match &common.repo {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };
    let config = Config::from_args(common, workdir).context("Invalid configuration")?;
    let message = config.parsed_message().context("Failed to parse message")?;
    let (anchor, cells) = layout(&config, &message).context("Failed to lay out message")?;

    if json {
        output_json(&config, &anchor, cells)?;
    } else {
        output_grid(&config, &anchor, &cells);
    }
    Ok(())
}

fn output_json(config: &Config, anchor: &CalendarAnchor, cells: Vec<InkCell>) -> anyhow::Result<()> {
    let output = LayoutOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        message: config.message.clone(),
        target_year: config.target_year,
        alignment: config.alignment,
        anchor: anchor.date,
        start_offset: anchor.start_offset,
        commits_per_cell: config.commits_per_cell,
        total_ink_cells: cells.len(),
        total_commits: u64::from(config.commits_per_cell) * cells.len() as u64,
        cells,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn output_grid(config: &Config, anchor: &CalendarAnchor, cells: &[InkCell]) {
    let year = config.target_year;
    println!(
        "{} {}",
        style(format!("Contribution grid for {year}")).bold(),
        style(format!(
            "({:?}, anchor {}, offset {} via {} alignment)",
            config.message, anchor.date, anchor.start_offset, config.alignment
        ))
        .dim()
    );
    println!("{}", "─".repeat(60));

    println!("    {}", month_header(year));
    for (label, row) in WEEKDAY_LABELS.iter().zip(plain_grid(year, cells)) {
        let styled: String = row
            .chars()
            .map(|c| match c {
                INK_MARK => style("█").green().to_string(),
                EMPTY_MARK => style("·").dim().to_string(),
                other => other.to_string(),
            })
            .collect();
        println!("{label} {styled}");
    }

    println!(
        "\n{} ink cells × {} commits = {} commits",
        style(cells.len()).cyan(),
        style(config.commits_per_cell).cyan(),
        style(u64::from(config.commits_per_cell) * cells.len() as u64).green()
    );
}

/// Seven rows, Sunday first, one character per week column.
///
/// Ink days are [`INK_MARK`], other days of the year [`EMPTY_MARK`] and slots
/// outside the year a space.
pub fn plain_grid(year: i32, cells: &[InkCell]) -> Vec<String> {
    let columns = grid_columns(year).unwrap_or(0);
    let mut grid = vec![vec![' '; columns]; 7];
    let ink: HashSet<NaiveDate> = cells.iter().map(|c| c.date).collect();

    let days = NaiveDate::from_ymd_opt(year, 1, 1)
        .into_iter()
        .flat_map(|start| start.iter_days())
        .take_while(|d| d.year() == year);
    for day in days {
        if let Some((column, row)) = grid_position(year, day) {
            grid[row][column] = if ink.contains(&day) { INK_MARK } else { EMPTY_MARK };
        }
    }

    grid.into_iter().map(|row| row.into_iter().collect()).collect()
}

fn month_header(year: i32) -> String {
    let columns = grid_columns(year).unwrap_or(0);
    let mut header = vec![' '; columns];
    let mut free_from = 0;
    for (month, name) in MONTH_LABELS.iter().enumerate() {
        let Some(first) = NaiveDate::from_ymd_opt(year, month as u32 + 1, 1) else {
            continue;
        };
        let Some((column, _)) = grid_position(year, first) else {
            continue;
        };
        let column = column.max(free_from);
        if column + name.len() > columns {
            break;
        }
        for (i, ch) in name.chars().enumerate() {
            header[column + i] = ch;
        }
        free_from = column + name.len() + 1;
    }
    header.into_iter().collect()
}
