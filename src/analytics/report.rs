//! Full-range portfolio report: both families through the pipeline, then
//! combined.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::changes::{compute_changes, ChangeSet};
use super::combine::{combine, CombinedPortfolio};
use super::matrix::{assemble_with_columns, DailySeries, Observation, ValueMatrix};
use super::ranking::{entity_changes, EntityChange, Rankings};
use super::summary::{summarize, PeriodSummary};
use crate::db::{AssetCategory, AssetRecord, FundRecord, RecordStore};

/// Analytics of one entity family (funds or asset categories) over a range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyAnalysis {
    pub matrix: ValueMatrix,
    pub changes: ChangeSet,
    /// First/last summary of the family total
    pub total_summary: PeriodSummary,
    pub entity_changes: Vec<EntityChange>,
    pub rankings: Rankings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub funds: Option<FamilyAnalysis>,
    /// Fund code -> display name
    pub fund_names: BTreeMap<String, String>,
    pub assets: Option<FamilyAnalysis>,
    pub portfolio: CombinedPortfolio,
}

/// assemble → compute_changes → summaries → rankings for one family.
///
/// Returns `None` when the family has no observation in the range.
pub fn analyze_family(
    observations: &[Observation],
    start: NaiveDate,
    end: NaiveDate,
    columns: &[&str],
    top_n: usize,
) -> Option<FamilyAnalysis> {
    let matrix = assemble_with_columns(observations, start, end, columns)?;
    let changes = compute_changes(&matrix);
    let total_summary = summarize(&changes.row_total.values())?;
    let entity_changes = entity_changes(&matrix);
    let rankings = Rankings::from_changes(&entity_changes, top_n);

    Some(FamilyAnalysis {
        matrix,
        changes,
        total_summary,
        entity_changes,
        rankings,
    })
}

pub fn fund_observations(records: &[FundRecord]) -> Vec<Observation> {
    records
        .iter()
        .map(|r| Observation::new(r.date, r.fund_code.clone(), r.value))
        .collect()
}

pub fn asset_observations(records: &[AssetRecord]) -> Vec<Observation> {
    records
        .iter()
        .flat_map(|r| {
            AssetCategory::ALL
                .into_iter()
                .map(move |c| Observation::new(r.date, c.as_str(), r.value_of(c)))
        })
        .collect()
}

/// Build the report for `[start, end]` from a record store.
///
/// `Ok(None)` when neither family has data in the range.
pub fn build_report(
    store: &impl RecordStore,
    start: NaiveDate,
    end: NaiveDate,
    top_n: usize,
) -> Result<Option<PortfolioReport>> {
    if start > end {
        bail!("Start date {} cannot be after end date {}", start, end);
    }

    let fund_records = store.fetch_fund_records(start, end)?;
    let asset_records = store.fetch_asset_records(start, end)?;
    debug!(
        "Building report {} → {} from {} fund and {} asset records",
        start,
        end,
        fund_records.len(),
        asset_records.len()
    );

    let fund_names: BTreeMap<String, String> = fund_records
        .iter()
        .map(|r| (r.fund_code.clone(), r.fund_name.clone()))
        .collect();

    let asset_columns: Vec<&str> = AssetCategory::ALL.into_iter().map(|c| c.as_str()).collect();

    let funds = analyze_family(&fund_observations(&fund_records), start, end, &[], top_n);
    let assets = analyze_family(
        &asset_observations(&asset_records),
        start,
        end,
        &asset_columns,
        top_n,
    );

    if funds.is_none() && assets.is_none() {
        info!("No data between {} and {}", start, end);
        return Ok(None);
    }

    let empty = DailySeries::new();
    let portfolio = combine(
        funds.as_ref().map_or(&empty, |f| &f.changes.row_total),
        assets.as_ref().map_or(&empty, |a| &a.changes.row_total),
    );

    Ok(Some(PortfolioReport {
        start,
        end,
        funds,
        fund_names,
        assets,
        portfolio,
    }))
}
