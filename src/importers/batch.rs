//! Parsers for the two-line tab-separated daily batches.
//!
//! Fund batch:
//! ```text
//! GTZ Garanti Hisse Fonu<TAB>AFT Ak Portföy Teknoloji
//! 12500,75<TAB>8300
//! ```
//! Asset batch (header order is free, names are matched loosely):
//! ```text
//! precious_metals<TAB>crypto<TAB>physical_gold
//! 10000<TAB>5000<TAB>2000
//! ```
//! A malformed batch is rejected as a whole so nothing partial reaches the
//! store.

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

use crate::db::AssetCategory;
use crate::error::TrackerError;

/// One fund column of a fund batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundEntry {
    pub code: String,
    pub name: String,
    pub value: Decimal,
}

/// One asset batch, by category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetValues {
    pub precious_metals: Decimal,
    pub crypto: Decimal,
    pub physical_gold: Decimal,
}

impl AssetValues {
    /// Canonical archive text: fixed header line and value line
    pub fn to_batch_text(&self) -> String {
        format!(
            "{}\t{}\t{}\n{}\t{}\t{}\n",
            AssetCategory::PreciousMetals.as_str(),
            AssetCategory::Crypto.as_str(),
            AssetCategory::PhysicalGold.as_str(),
            self.precious_metals,
            self.crypto,
            self.physical_gold
        )
    }
}

/// Fund batch text for `entries`, the inverse of [`parse_fund_batch`]
pub fn format_fund_batch(entries: &[FundEntry]) -> String {
    let labels: Vec<String> = entries
        .iter()
        .map(|e| {
            if e.name.is_empty() {
                e.code.clone()
            } else {
                format!("{} {}", e.code, e.name)
            }
        })
        .collect();
    let values: Vec<String> = entries.iter().map(|e| e.value.to_string()).collect();
    format!("{}\n{}\n", labels.join("\t"), values.join("\t"))
}

/// Split text into non-blank tab-separated rows, trailing empty cells dropped
fn read_tab_rows(text: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("Failed to read tab-separated line")?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        while row.last().is_some_and(|cell| cell.is_empty()) {
            row.pop();
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Parse a monetary value; a decimal comma is accepted ("12,5" == 12.5)
pub fn parse_value(raw: &str) -> Result<Decimal, TrackerError> {
    let normalized = raw.trim().replace(',', ".");
    Decimal::from_str(&normalized)
        .map_err(|_| TrackerError::ParseError(format!("value '{}' is not a number", raw)))
}

fn header_and_values(text: &str) -> Result<(Vec<String>, Vec<String>)> {
    let mut rows = read_tab_rows(text)?.into_iter();
    match (rows.next(), rows.next()) {
        (Some(header), Some(values)) => {
            if header.len() != values.len() {
                return Err(TrackerError::ValidationError(format!(
                    "{} names but {} values",
                    header.len(),
                    values.len()
                ))
                .into());
            }
            Ok((header, values))
        }
        _ => Err(TrackerError::ValidationError(
            "expected a name line and a value line".to_string(),
        )
        .into()),
    }
}

/// Parse a fund batch into entries, in column order
pub fn parse_fund_batch(text: &str) -> Result<Vec<FundEntry>> {
    let (labels, values) = header_and_values(text)?;

    let entries = labels
        .iter()
        .zip(&values)
        .map(|(label, raw)| {
            let mut words = label.split_whitespace();
            let code = words.next().ok_or_else(|| {
                TrackerError::ValidationError("empty fund label".to_string())
            })?;
            Ok(FundEntry {
                code: code.to_string(),
                name: words.collect::<Vec<_>>().join(" "),
                value: parse_value(raw)?,
            })
        })
        .collect::<Result<Vec<_>, TrackerError>>()?;

    debug!("Parsed fund batch with {} entries", entries.len());
    Ok(entries)
}

/// Parse an asset batch; the header decides which value is which category
pub fn parse_asset_batch(text: &str) -> Result<AssetValues> {
    let (header, values) = header_and_values(text)?;
    if header.len() != AssetCategory::ALL.len() {
        return Err(TrackerError::ValidationError(format!(
            "expected {} asset columns, found {}",
            AssetCategory::ALL.len(),
            header.len()
        ))
        .into());
    }

    let mut precious_metals = None;
    let mut crypto = None;
    let mut physical_gold = None;

    for (name, raw) in header.iter().zip(&values) {
        let category = name.parse::<AssetCategory>().map_err(|_| {
            TrackerError::ValidationError(format!("unknown asset column '{}'", name))
        })?;
        let slot = match category {
            AssetCategory::PreciousMetals => &mut precious_metals,
            AssetCategory::Crypto => &mut crypto,
            AssetCategory::PhysicalGold => &mut physical_gold,
        };
        if slot.replace(parse_value(raw)?).is_some() {
            return Err(TrackerError::ValidationError(format!(
                "asset column '{}' appears twice",
                category.as_str()
            ))
            .into());
        }
    }

    // Three distinct columns out of three categories: all slots are filled
    match (precious_metals, crypto, physical_gold) {
        (Some(precious_metals), Some(crypto), Some(physical_gold)) => Ok(AssetValues {
            precious_metals,
            crypto,
            physical_gold,
        }),
        _ => Err(TrackerError::ValidationError("missing asset column".to_string()).into()),
    }
}
