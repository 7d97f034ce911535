//! Author-date predicate used by the history rewrite.

use crate::error::{PaintError, Result};
use crate::model::DateRange;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::path::Path;

const WITH_OFFSET: &[&str] = &["%a %b %d %H:%M:%S %Y %z", "%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%d %H:%M:%S %z"];
const WITHOUT_OFFSET: &[&str] = &["%a %b %d %H:%M:%S %Y", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parses an author date into epoch seconds.
///
/// Accepts git's internal `@<epoch> <tz>` form, the default
/// `Www Mmm DD HH:MM:SS YYYY ±hhmm` form with or without its offset, RFC 2822
/// and ISO-8601. Dates without an offset are local time.
pub fn parse_author_date(raw: &str) -> Result<i64> {
    let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let invalid = || PaintError::InvalidDate(format!("unrecognized author date {raw:?}"));

    if normalized.is_empty() {
        return Err(invalid());
    }

    if let Some(rest) = normalized.strip_prefix('@') {
        let seconds = rest.split(' ').next().unwrap_or_default();
        return seconds.parse::<i64>().map_err(|_| invalid());
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(&normalized) {
        return Ok(dt.timestamp());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(dt.timestamp());
    }
    for format in WITH_OFFSET {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, format) {
            return Ok(dt.timestamp());
        }
    }

    // Without an offset, or with a trailing token none of the above understood.
    let candidates = [
        Some(normalized.as_str()),
        normalized.rsplit_once(' ').map(|(head, _)| head),
    ];
    for candidate in candidates.into_iter().flatten() {
        for format in WITHOUT_OFFSET {
            if let Ok(naive) = NaiveDateTime::parse_from_str(candidate, format) {
                return Local
                    .from_local_datetime(&naive)
                    .earliest()
                    .map(|dt| dt.timestamp())
                    .ok_or_else(invalid);
            }
        }
    }

    Err(invalid())
}

/// True when the author date lies inside `range`.
pub fn author_date_in_range(raw: &str, range: &DateRange) -> Result<bool> {
    parse_author_date(raw).map(|ts| range.contains(ts))
}

/// Builds the `--commit-filter` script: commits whose author date falls in
/// `range` are skipped, the rest are recreated unchanged.
pub fn commit_filter_script(program: &Path, range: &DateRange) -> String {
    format!(
        "if {} date-in-range --start {} --end {}; then skip_commit \"$@\"; else git commit-tree \"$@\"; fi",
        shell_quote(&program.to_string_lossy()),
        range.start,
        range.end
    )
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
        let naive = NaiveDate::from_ymd_opt(y, mo, d).unwrap().and_hms_opt(h, mi, s).unwrap();
        Local.from_local_datetime(&naive).earliest().unwrap().timestamp()
    }

    #[test]
    fn parses_internal_epoch_form() {
        assert_eq!(parse_author_date("@1672531200 +0000").unwrap(), 1_672_531_200);
        assert_eq!(parse_author_date("@1672531200 -0700").unwrap(), 1_672_531_200);
        assert_eq!(parse_author_date("@1672531200").unwrap(), 1_672_531_200);
    }

    #[test]
    fn parses_default_format_with_offset() {
        assert_eq!(parse_author_date("Sun Jan 01 00:00:00 2023 +0000").unwrap(), 1_672_531_200);
        assert_eq!(parse_author_date("Sun Jan 01 01:00:00 2023 +0100").unwrap(), 1_672_531_200);
    }

    #[test]
    fn parses_naive_forms_as_local_time() {
        let expected = local(2023, 6, 15, 12, 30, 0);
        assert_eq!(parse_author_date("Thu Jun 15 12:30:00 2023").unwrap(), expected);
        assert_eq!(parse_author_date("2023-06-15T12:30:00").unwrap(), expected);
    }

    #[test]
    fn parses_rfc_forms() {
        assert_eq!(parse_author_date("Sun, 01 Jan 2023 00:00:00 +0000").unwrap(), 1_672_531_200);
        assert_eq!(parse_author_date("2023-01-01T00:00:00Z").unwrap(), 1_672_531_200);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_author_date("").is_err());
        assert!(parse_author_date("yesterday").is_err());
        assert!(parse_author_date("@soon +0000").is_err());
    }

    #[test]
    fn boundaries_are_inclusive() {
        let range = DateRange::local_year(2023).unwrap();
        assert!(author_date_in_range("2023-01-01T00:00:00", &range).unwrap());
        assert!(author_date_in_range("2023-12-31T23:59:59", &range).unwrap());
        assert!(!author_date_in_range("2024-01-01T00:00:00", &range).unwrap());
        assert!(!author_date_in_range("2022-12-31T23:59:59", &range).unwrap());
    }

    #[test]
    fn filter_script_calls_back_into_binary() {
        let range = DateRange::new(100, 200).unwrap();
        let script = commit_filter_script(Path::new("/opt/it's here/commitpaint"), &range);
        assert_eq!(
            script,
            "if '/opt/it'\\''s here/commitpaint' date-in-range --start 100 --end 200; \
             then skip_commit \"$@\"; else git commit-tree \"$@\"; fi"
        );
    }
}
