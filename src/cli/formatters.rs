//! Output formatting module for CLI display
//!
//! All rounding and "value (pct%)" rendering lives here; the analytics core
//! hands over raw decimals.

use crate::analytics::{ChangeSet, FamilyAnalysis, PeriodSummary, PortfolioReport, RankedEntry};
use crate::importers::{BulkLoadSummary, ImportSummary};
use chrono::NaiveDate;
use colored::Colorize;
use itertools::Itertools;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Style},
};

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Money with two decimals
pub fn format_amount(value: Decimal) -> String {
    format!("{:.2}", round2(value))
}

pub fn format_percent(pct: Decimal) -> String {
    format!("{:.2}%", round2(pct))
}

/// "value (pct%)" cell
pub fn format_value_pct(value: Decimal, pct: Decimal) -> String {
    format!("{} ({})", format_amount(value), format_percent(pct))
}

fn colorize_signed(text: String, value: Decimal) -> String {
    if value > Decimal::ZERO {
        text.green().to_string()
    } else if value < Decimal::ZERO {
        text.red().to_string()
    } else {
        text
    }
}

fn section_title(title: &str) -> String {
    format!("\n{} {}\n", "▸".cyan().bold(), title.bold())
}

/// Start/end/change block of a period summary
pub fn format_summary(title: &str, summary: &PeriodSummary) -> String {
    let mut output = section_title(title);
    output.push_str(&format!(
        "  {:<16} {}\n",
        "Start value:",
        format_amount(summary.start_value).cyan()
    ));
    output.push_str(&format!(
        "  {:<16} {}\n",
        "End value:",
        format_amount(summary.end_value).cyan()
    ));

    let change = match summary.percent_if_defined() {
        Some(pct) => format_value_pct(summary.change_absolute, pct),
        None => format!("{} (n/a)", format_amount(summary.change_absolute)),
    };
    output.push_str(&format!(
        "  {:<16} {}\n",
        "Change:",
        colorize_signed(change, summary.change_absolute)
    ));
    output
}

/// "value (pct%)" cell colored by the day's change, or the bare amount when
/// the family has no change series
fn value_change_cell(value: Decimal, pct: Option<Decimal>) -> String {
    match pct {
        Some(pct) => colorize_signed(format_value_pct(value, pct), pct),
        None => format_amount(value),
    }
}

/// Combined portfolio rows: family totals and asset categories with their
/// daily change, then the total and its daily change
pub fn format_combined_table(report: &PortfolioReport) -> String {
    let categories = crate::db::AssetCategory::ALL;

    let mut builder = Builder::default();
    let mut header = vec!["Date".to_string(), "Funds".to_string(), "Assets".to_string()];
    header.extend(categories.iter().map(|c| c.label().to_string()));
    header.push("Total".to_string());
    header.push("Daily %".to_string());
    builder.push_record(header);

    for row in &report.portfolio.rows {
        let date = row.date;
        let fund_pct = report
            .funds
            .as_ref()
            .map(|f| f.changes.row_total_pct_delta.get(&date).unwrap_or_default());
        let asset_pct = report
            .assets
            .as_ref()
            .map(|a| a.changes.row_total_pct_delta.get(&date).unwrap_or_default());

        let mut record = vec![
            date.to_string(),
            value_change_cell(row.funds, fund_pct),
            value_change_cell(row.assets, asset_pct),
        ];
        record.extend(categories.iter().map(|c| {
            let Some(assets) = &report.assets else {
                return "-".to_string();
            };
            match assets.matrix.value(date, c.as_str()) {
                Some(value) => value_change_cell(
                    value,
                    Some(
                        assets
                            .changes
                            .entity_pct_delta
                            .value(date, c.as_str())
                            .unwrap_or_default(),
                    ),
                ),
                None => "-".to_string(),
            }
        }));
        record.push(format_amount(row.total));
        record.push(colorize_signed(
            format_percent(row.total_pct_change),
            row.total_pct_change,
        ));
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.modify(Columns::new(1..), Alignment::right());
    table.to_string()
}

/// Daily per-entity change matrix, one "delta (pct%)" cell per entity.
/// The first row has no previous day and is left out.
pub fn format_change_table(
    changes: &ChangeSet,
    labels: &BTreeMap<String, String>,
) -> String {
    let deltas = &changes.entity_delta;
    let pcts = &changes.entity_pct_delta;

    let mut builder = Builder::default();
    let mut header = vec!["Date".to_string()];
    header.extend(
        deltas
            .entities()
            .iter()
            .map(|e| labels.get(e).cloned().unwrap_or_else(|| e.clone())),
    );
    header.push("Total".to_string());
    builder.push_record(header);

    let totals = changes.row_total_delta.values();
    let total_pcts = changes.row_total_pct_delta.values();

    for (idx, date) in deltas.dates().iter().enumerate().skip(1) {
        let (Some(delta_row), Some(pct_row)) = (deltas.row(idx), pcts.row(idx)) else {
            continue;
        };
        let mut record = vec![date.to_string()];
        record.extend(
            delta_row
                .iter()
                .zip(pct_row)
                .map(|(d, p)| colorize_signed(format_value_pct(*d, *p), *d)),
        );
        let total = totals.get(idx).copied().unwrap_or_default();
        let total_pct = total_pcts.get(idx).copied().unwrap_or_default();
        record.push(colorize_signed(format_value_pct(total, total_pct), total));
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.modify(Columns::new(1..), Alignment::right());
    table.to_string()
}

fn format_ranking(
    title: &str,
    entries: &[RankedEntry],
    labels: &BTreeMap<String, String>,
    percent: bool,
) -> String {
    if entries.is_empty() {
        return format!("  {}: -\n", title);
    }

    let line = entries
        .iter()
        .map(|e| {
            let label = labels.get(&e.entity).unwrap_or(&e.entity);
            let value = if percent {
                format_percent(e.value)
            } else {
                format_amount(e.value)
            };
            format!("{} {}", label, colorize_signed(value, e.value))
        })
        .join(", ");
    format!("  {}: {}\n", title.bold(), line)
}

/// Top/bottom lists of one family
pub fn format_rankings(family: &FamilyAnalysis, labels: &BTreeMap<String, String>) -> String {
    let r = &family.rankings;
    let mut output = String::new();
    output.push_str(&format_ranking("Top by amount", &r.top_by_amount, labels, false));
    output.push_str(&format_ranking("Bottom by amount", &r.bottom_by_amount, labels, false));
    output.push_str(&format_ranking("Top by percent", &r.top_by_percent, labels, true));
    output.push_str(&format_ranking(
        "Bottom by percent",
        &r.bottom_by_percent,
        labels,
        true,
    ));
    output
}

fn asset_labels() -> BTreeMap<String, String> {
    crate::db::AssetCategory::ALL
        .into_iter()
        .map(|c| (c.as_str().to_string(), c.label().to_string()))
        .collect()
}

/// Full terminal report
pub fn format_report(report: &PortfolioReport) -> String {
    let mut output = format!(
        "\n{} Portfolio analysis {} → {}\n",
        "📊".cyan().bold(),
        report.start,
        report.end
    );

    if let Some(summary) = &report.portfolio.summary {
        output.push_str(&format_summary("Portfolio", summary));
    }

    output.push_str(&section_title("Daily totals"));
    output.push_str(&format_combined_table(report));
    output.push('\n');

    // Funds are labelled by code; names are listed once below the table
    let no_labels = BTreeMap::new();
    if let Some(funds) = &report.funds {
        output.push_str(&format_summary("Funds", &funds.total_summary));
        output.push_str(&section_title("Daily fund changes"));
        output.push_str(&format_change_table(&funds.changes, &no_labels));
        output.push('\n');
        for (code, name) in report.fund_names.iter().filter(|(_, n)| !n.is_empty()) {
            output.push_str(&format!("  {:<8} {}\n", code.bold(), name));
        }
        output.push_str(&section_title("Fund rankings"));
        output.push_str(&format_rankings(funds, &no_labels));
    }

    let labels = asset_labels();
    if let Some(assets) = &report.assets {
        output.push_str(&format_summary("Assets", &assets.total_summary));
        output.push_str(&section_title("Daily asset changes"));
        output.push_str(&format_change_table(&assets.changes, &labels));
        output.push('\n');
        output.push_str(&section_title("Asset rankings"));
        output.push_str(&format_rankings(assets, &labels));
    }

    output
}

/// Empty range message
pub fn format_no_data(start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{} No data between {} and {}\nRecord values first using: {} add funds <file>\n",
        "ℹ".blue().bold(),
        start,
        end,
        "fundfolio".bold()
    )
}

pub fn format_import_summary(what: &str, date: NaiveDate, summary: &ImportSummary) -> String {
    let mut output = format!(
        "{} {} for {}: {} added",
        "✓".green().bold(),
        what,
        date,
        summary.added
    );
    if summary.duplicates > 0 {
        output.push_str(&format!(
            ", {} already recorded",
            summary.duplicates.to_string().yellow()
        ));
    }
    output.push('\n');
    output
}

pub fn format_bulk_summary(summary: &BulkLoadSummary) -> String {
    let mut output = format!(
        "{} Loaded {} files: {} fund values ({} duplicates), {} asset days ({} duplicates)\n",
        "✓".green().bold(),
        summary.files,
        summary.funds.added,
        summary.funds.duplicates,
        summary.assets.added,
        summary.assets.duplicates
    );
    for (path, reason) in &summary.skipped {
        output.push_str(&format!(
            "  {} skipped {}: {}\n",
            "⚠".yellow(),
            path.display(),
            reason
        ));
    }
    output
}
