use crate::error::{PaintError, Result};
use crate::layout::GridAlignment;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// One ink mark of the message, placed on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InkCell {
    pub date: NaiveDate,
    pub glyph: char,
    pub glyph_index: usize,
    pub row: usize,
    pub column: usize,
}

/// A commit to fabricate: naive local timestamp plus message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub timestamp: NaiveDateTime,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub message: String,
    pub target_year: i32,
    pub alignment: GridAlignment,
    pub anchor: NaiveDate,
    pub start_offset: i64,
    pub commits_per_cell: u32,
    pub total_ink_cells: usize,
    pub total_commits: u64,
    pub cells: Vec<InkCell>,
}

/// Tally of a generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Days (uniform) or ink cells (pattern) visited.
    pub units: usize,
    pub commits_created: u64,
    pub commits_failed: u64,
}

impl GenerationReport {
    pub fn record(&mut self, created: bool) {
        if created {
            self.commits_created += 1;
        } else {
            self.commits_failed += 1;
        }
    }

    pub fn attempted(&self) -> u64 {
        self.commits_created + self.commits_failed
    }
}

/// Closed interval of epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: i64,
    pub end: i64,
}

impl DateRange {
    pub fn new(start: i64, end: i64) -> Result<Self> {
        if start > end {
            return Err(PaintError::InvalidDateRange(format!(
                "start ({start}) is after end ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// `[Y-01-01T00:00:00, Y-12-31T23:59:59]` in local time.
    pub fn local_year(year: i32) -> Result<Self> {
        let start = local_timestamp(year, 1, 1, 0, 0, 0, true)?;
        let end = local_timestamp(year, 12, 31, 23, 59, 59, false)?;
        Self::new(start, end)
    }

    pub fn contains(&self, timestamp: i64) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

fn local_timestamp(year: i32, month: u32, day: u32, h: u32, m: u32, s: u32, earliest: bool) -> Result<i64> {
    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(h, m, s))
        .ok_or_else(|| PaintError::InvalidDate(format!("{year}-{month:02}-{day:02} {h:02}:{m:02}:{s:02}")))?;
    let mapped = Local.from_local_datetime(&naive);
    let local = if earliest { mapped.earliest() } else { mapped.latest() };
    local
        .map(|dt| dt.timestamp())
        .ok_or_else(|| PaintError::InvalidDate(format!("{naive} does not exist in local time")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
        local_timestamp(y, mo, d, h, mi, s, true).unwrap()
    }

    #[test]
    fn year_range_is_inclusive_at_both_ends() {
        let range = DateRange::local_year(2023).unwrap();
        assert!(range.contains(local(2023, 1, 1, 0, 0, 0)));
        assert!(range.contains(local(2023, 12, 31, 23, 59, 59)));
        assert!(!range.contains(local(2024, 1, 1, 0, 0, 0)));
        assert!(!range.contains(local(2022, 12, 31, 23, 59, 59)));
    }

    #[test]
    fn reversed_range_is_rejected() {
        assert!(DateRange::new(10, 5).is_err());
        assert!(DateRange::new(5, 5).unwrap().contains(5));
    }

    #[test]
    fn report_tallies_outcomes() {
        let mut report = GenerationReport::default();
        report.record(true);
        report.record(false);
        report.record(true);
        assert_eq!(report.commits_created, 2);
        assert_eq!(report.commits_failed, 1);
        assert_eq!(report.attempted(), 3);
    }
}
