//! Date helpers shared by the CLI and the bulk loader

use anyhow::{anyhow, Result};
use chrono::{Datelike, NaiveDate};

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid date '{}'. Use YYYY-MM-DD", s))
}

/// First and last day of a month
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| anyhow!("Invalid month {}-{:02}", year, month))?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last = next_month
        .and_then(|nm| nm.pred_opt())
        .ok_or_else(|| anyhow!("Invalid month {}-{:02}", year, month))?;
    Ok((first, last))
}

/// Parse `YYYY-MM` into the month's first and last day
pub fn parse_month(s: &str) -> Result<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid month '{}'. Use YYYY-MM", s))?;
    month_bounds(first.year(), first.month())
}

/// Date from an archive file name such as `2025-10-14.txt`
pub fn date_from_file_name(name: &str) -> Option<NaiveDate> {
    let stem = name.strip_suffix(".txt")?;
    NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()
}
