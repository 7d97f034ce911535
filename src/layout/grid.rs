//! Contribution-grid arithmetic.
//!
//! The grid is column-major: one column per week, one row per weekday with
//! Sunday on top. Moving one glyph column right is therefore exactly seven
//! days, and moving one row down is one day.

use crate::error::{PaintError, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DAYS_PER_WEEK: i64 = 7;

/// Glyph column 0 never starts before this many days past the anchor.
const MIN_START_OFFSET: i64 = 30;

const LEGACY_FALLBACK_OFFSET: i64 = 35;
const LEGACY_OFFSETS: &[(i32, i64)] = &[
    (2025, 33),
    (2024, 35),
    (2023, 36),
    (2022, 30),
    (2021, 31),
    (2020, 33),
];

/// How the starting offset for a year is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GridAlignment {
    /// First Sunday at least [`MIN_START_OFFSET`] days after the anchor.
    #[default]
    Computed,
    /// Hand-tuned per-year table with a fixed fallback.
    Table,
}

impl fmt::Display for GridAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridAlignment::Computed => f.write_str("computed"),
            GridAlignment::Table => f.write_str("table"),
        }
    }
}

/// Reference point for turning glyph cells into dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarAnchor {
    /// December 31 of the year before the target year.
    pub date: NaiveDate,
    /// Days from `date` to glyph column 0, row 0.
    pub start_offset: i64,
}

impl CalendarAnchor {
    pub fn for_year(year: i32, alignment: GridAlignment) -> Result<Self> {
        let date = anchor_date(year)?;
        let start_offset = match alignment {
            GridAlignment::Computed => grid_start_offset(year)?,
            GridAlignment::Table => legacy_start_offset(year),
        };
        Ok(Self { date, start_offset })
    }

    pub fn date_at(&self, day_index: i64) -> Result<NaiveDate> {
        offset_date(self.date, day_index)
    }
}

pub fn anchor_date(year: i32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year - 1, 12, 31)
        .ok_or_else(|| PaintError::InvalidDate(format!("no December 31 before year {year}")))
}

/// Smallest offset of at least [`MIN_START_OFFSET`] days that lands on a Sunday.
///
/// Reproduces every entry of the legacy table.
pub fn grid_start_offset(year: i32) -> Result<i64> {
    let earliest = offset_date(anchor_date(year)?, MIN_START_OFFSET)?;
    let to_sunday = (DAYS_PER_WEEK - earliest.weekday().num_days_from_sunday() as i64) % DAYS_PER_WEEK;
    Ok(MIN_START_OFFSET + to_sunday)
}

/// Per-year table; years outside it fall back to 35 days, which is not
/// guaranteed to start on a Sunday.
pub fn legacy_start_offset(year: i32) -> i64 {
    LEGACY_OFFSETS
        .iter()
        .find(|(y, _)| *y == year)
        .map(|(_, offset)| *offset)
        .unwrap_or(LEGACY_FALLBACK_OFFSET)
}

/// `offset + column * 7 + row`.
pub fn day_index(offset: i64, column: usize, row: usize) -> i64 {
    offset + column as i64 * DAYS_PER_WEEK + row as i64
}

pub fn cell_date(anchor: NaiveDate, offset: i64, column: usize, row: usize) -> Result<NaiveDate> {
    offset_date(anchor, day_index(offset, column, row))
}

fn offset_date(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| PaintError::InvalidDate(format!("{date} + {days} days is out of range")))
}

pub fn year_start(year: i32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| PaintError::InvalidDate(format!("invalid year {year}")))
}

/// Every date of `year`, January 1 through December 31.
pub fn year_days(year: i32) -> Result<Vec<NaiveDate>> {
    let start = year_start(year)?;
    let end = year_start(year + 1)?;
    let days: Vec<NaiveDate> = start.iter_days().take_while(|d| *d < end).collect();
    if days.is_empty() {
        return Err(PaintError::InvalidDateRange(format!("start={start} end={end}")));
    }
    Ok(days)
}

/// Grid cell `(column, row)` of `date` in `year`'s calendar, rows starting on Sunday.
pub fn grid_position(year: i32, date: NaiveDate) -> Option<(usize, usize)> {
    if date.year() != year {
        return None;
    }
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let lead = jan1.weekday().num_days_from_sunday() as usize;
    let slot = date.ordinal0() as usize + lead;
    Some((slot / DAYS_PER_WEEK as usize, slot % DAYS_PER_WEEK as usize))
}

/// Number of week columns needed to show `year`.
pub fn grid_columns(year: i32) -> Option<usize> {
    let dec31 = NaiveDate::from_ymd_opt(year, 12, 31)?;
    grid_position(year, dec31).map(|(column, _)| column + 1)
}

pub fn is_sunday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sun
}
