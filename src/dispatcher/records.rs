//! Add, import and delete command implementations

use super::AppContext;
use crate::cli::formatters;
use crate::importers::{self, archive, AssetValues, Family, FundEntry};
use crate::{db, utils};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use colored::Colorize;
use rusqlite::Connection;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

fn resolve_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(d) => utils::parse_date(d),
        None => Ok(Local::now().date_naive()),
    }
}

fn read_batch_text(file: &str) -> Result<String> {
    if file == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read batch from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(file).context(format!("Failed to read batch file {}", file))
    }
}

fn should_archive(ctx: &AppContext, no_archive: bool, summary: &importers::ImportSummary) -> bool {
    ctx.config.archive_raw && !no_archive && summary.added > 0
}

/// The day's archive file is rewritten from the stored rows, so values the
/// store rejected as duplicates never reach it and earlier batches of the
/// same day are kept.
fn archive_fund_day(ctx: &AppContext, conn: &Connection, date: NaiveDate) -> Result<PathBuf> {
    let entries: Vec<FundEntry> = db::fetch_fund_records(conn, date, date)?
        .into_iter()
        .map(|r| FundEntry {
            code: r.fund_code,
            name: r.fund_name,
            value: r.value,
        })
        .collect();
    archive::save_raw(
        &ctx.archive_root()?,
        Family::Funds,
        date,
        &importers::format_fund_batch(&entries),
    )
}

fn print_added(
    ctx: &AppContext,
    what: &str,
    date: NaiveDate,
    summary: &importers::ImportSummary,
    archived: Option<&Path>,
) -> Result<()> {
    if ctx.json_output {
        let payload = serde_json::json!({
            "date": date,
            "added": summary.added,
            "duplicates": summary.duplicates,
            "archived": archived,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        print!("{}", formatters::format_import_summary(what, date, summary));
        if let Some(path) = archived {
            println!("  Raw batch saved to {}", path.display());
        }
    }
    Ok(())
}

pub fn dispatch_add_funds(
    ctx: &AppContext,
    file: &str,
    date: Option<&str>,
    no_archive: bool,
) -> Result<()> {
    let date = resolve_date(date)?;
    let text = read_batch_text(file)?;

    // Parse before touching the store so a bad batch leaves no trace
    let entries = importers::parse_fund_batch(&text)?;
    let conn = ctx.open_store()?;
    let summary = importers::ingest_fund_entries(&conn, &entries, date)?;

    let archived = if should_archive(ctx, no_archive, &summary) {
        Some(archive_fund_day(ctx, &conn, date)?)
    } else {
        None
    };

    print_added(ctx, "Fund values", date, &summary, archived.as_deref())
}

pub fn dispatch_add_assets(
    ctx: &AppContext,
    raw_values: [&str; 3],
    date: Option<&str>,
    no_archive: bool,
) -> Result<()> {
    let date = resolve_date(date)?;
    let [precious_metals, crypto, physical_gold] = raw_values;
    let values = AssetValues {
        precious_metals: importers::parse_value(precious_metals)?,
        crypto: importers::parse_value(crypto)?,
        physical_gold: importers::parse_value(physical_gold)?,
    };

    let conn = ctx.open_store()?;
    let summary = importers::ingest_asset_values(&conn, &values, date)?;

    let archived = if should_archive(ctx, no_archive, &summary) {
        Some(archive::save_raw(
            &ctx.archive_root()?,
            Family::Assets,
            date,
            &values.to_batch_text(),
        )?)
    } else {
        None
    };

    print_added(ctx, "Asset values", date, &summary, archived.as_deref())
}

pub fn dispatch_import(ctx: &AppContext, dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        anyhow::bail!("Import directory {:?} does not exist", dir);
    }
    info!("Bulk loading batches from {:?}", dir);

    let conn = ctx.open_store()?;
    let summary = importers::load_directory(&conn, dir)?;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", formatters::format_bulk_summary(&summary));
    }
    Ok(())
}

fn print_deleted(
    ctx: &AppContext,
    label: &str,
    funds: usize,
    assets: usize,
    files: usize,
) -> Result<()> {
    if ctx.json_output {
        let payload = serde_json::json!({
            "deleted": label,
            "fund_records": funds,
            "asset_records": assets,
            "archive_files": files,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else if funds + assets == 0 {
        println!("{} Nothing recorded for {}", "ℹ".blue().bold(), label);
    } else {
        println!(
            "{} Deleted {} fund and {} asset records for {} ({} archive files removed)",
            "✓".green().bold(),
            funds,
            assets,
            label,
            files
        );
    }
    Ok(())
}

pub fn dispatch_delete_funds(ctx: &AppContext, date: &str) -> Result<()> {
    let date = utils::parse_date(date)?;
    let conn = ctx.open_store()?;
    let deleted = db::delete_fund_records_on(&conn, date)?;
    let removed = archive::remove_raw(&ctx.archive_root()?, Family::Funds, date)?;
    print_deleted(ctx, &date.to_string(), deleted, 0, usize::from(removed))
}

pub fn dispatch_delete_assets(ctx: &AppContext, date: &str) -> Result<()> {
    let date = utils::parse_date(date)?;
    let conn = ctx.open_store()?;
    let deleted = db::delete_asset_records_on(&conn, date)?;
    let removed = archive::remove_raw(&ctx.archive_root()?, Family::Assets, date)?;
    print_deleted(ctx, &date.to_string(), 0, deleted, usize::from(removed))
}

pub fn dispatch_delete_month(ctx: &AppContext, month: &str) -> Result<()> {
    let (start, end) = utils::parse_month(month)?;
    let mut conn = ctx.open_store()?;
    let (funds, assets) = db::delete_records_between(&mut conn, start, end)?;
    let removed = archive::remove_between(&ctx.archive_root()?, start, end)?;
    print_deleted(ctx, month.trim(), funds, assets, removed)
}
