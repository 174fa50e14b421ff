//! Analyze and summary command implementations

use super::AppContext;
use crate::analytics::{self, PortfolioReport};
use crate::cli::{formatters, RangeArgs};
use crate::utils;
use anyhow::{anyhow, bail, Result};
use chrono::{Days, Local, NaiveDate};
use serde_json::json;

/// Resolve `--from`/`--to`: `to` defaults to today, `from` to `to - lookback_days`
pub fn resolve_range(range: &RangeArgs, lookback_days: u64) -> Result<(NaiveDate, NaiveDate)> {
    let end = match range.to.as_deref() {
        Some(d) => utils::parse_date(d)?,
        None => Local::now().date_naive(),
    };
    let start = match range.from.as_deref() {
        Some(d) => utils::parse_date(d)?,
        None => end
            .checked_sub_days(Days::new(lookback_days))
            .ok_or_else(|| anyhow!("Lookback of {} days is out of range", lookback_days))?,
    };
    if start > end {
        bail!("Start date {} cannot be after end date {}", start, end);
    }
    Ok((start, end))
}

fn load_report(
    ctx: &AppContext,
    range: &RangeArgs,
    top_n: usize,
) -> Result<(NaiveDate, NaiveDate, Option<PortfolioReport>)> {
    let (start, end) = resolve_range(range, ctx.config.lookback_days)?;
    let conn = ctx.open_store()?;
    let report = analytics::build_report(&conn, start, end, top_n)?;
    Ok((start, end, report))
}

fn print_no_data(ctx: &AppContext, start: NaiveDate, end: NaiveDate) -> Result<()> {
    if ctx.json_output {
        let payload = json!({ "start": start, "end": end, "report": null });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print!("{}", formatters::format_no_data(start, end));
    }
    Ok(())
}

pub fn dispatch_analyze(ctx: &AppContext, range: &RangeArgs, top: Option<usize>) -> Result<()> {
    let top_n = top.unwrap_or(ctx.config.top_n);
    let (start, end, report) = load_report(ctx, range, top_n)?;

    let Some(report) = report else {
        return print_no_data(ctx, start, end);
    };

    if ctx.json_output {
        let payload = json!({ "start": start, "end": end, "report": report });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print!("{}", formatters::format_report(&report));
    }
    Ok(())
}

pub fn dispatch_summary(ctx: &AppContext, range: &RangeArgs) -> Result<()> {
    let (start, end, report) = load_report(ctx, range, ctx.config.top_n)?;

    let Some(report) = report else {
        return print_no_data(ctx, start, end);
    };

    let funds = report.funds.as_ref().map(|f| f.total_summary);
    let assets = report.assets.as_ref().map(|a| a.total_summary);

    if ctx.json_output {
        let payload = json!({
            "start": start,
            "end": end,
            "portfolio": report.portfolio.summary,
            "funds": funds,
            "assets": assets,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Portfolio summary {} → {}", start, end);
    if let Some(summary) = &report.portfolio.summary {
        print!("{}", formatters::format_summary("Portfolio", summary));
    }
    if let Some(summary) = &funds {
        print!("{}", formatters::format_summary("Funds", summary));
    }
    if let Some(summary) = &assets {
        print!("{}", formatters::format_summary("Assets", summary));
    }
    Ok(())
}
