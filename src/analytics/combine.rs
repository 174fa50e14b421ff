//! Fund + asset portfolio combination.
//!
//! The two family totals usually share dates, but either side may be missing
//! some. The combined row set is the union of both; a side with no value on
//! a date contributes 0 there.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;

use super::changes::percent_changes;
use super::matrix::DailySeries;
use super::summary::{summarize, PeriodSummary};

/// One date of the combined portfolio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CombinedRow {
    pub date: NaiveDate,
    pub funds: Decimal,
    pub assets: Decimal,
    pub total: Decimal,
    /// Daily change of `total` against the previous combined row, guarded
    pub total_pct_change: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedPortfolio {
    pub rows: Vec<CombinedRow>,
    pub total: DailySeries,
    /// `None` only when both inputs are empty
    pub summary: Option<PeriodSummary>,
}

/// Merge the fund and asset total series on the union of their dates
pub fn combine(fund_total: &DailySeries, asset_total: &DailySeries) -> CombinedPortfolio {
    let dates: BTreeSet<NaiveDate> = fund_total
        .dates()
        .chain(asset_total.dates())
        .copied()
        .collect();

    let components: Vec<(NaiveDate, Decimal, Decimal)> = dates
        .into_iter()
        .map(|date| {
            (
                date,
                fund_total.get(&date).unwrap_or(Decimal::ZERO),
                asset_total.get(&date).unwrap_or(Decimal::ZERO),
            )
        })
        .collect();

    // An overflowing total is 0, as in the change computations
    let totals: Vec<Decimal> = components
        .iter()
        .map(|(_, f, a)| f.checked_add(*a).unwrap_or(Decimal::ZERO))
        .collect();
    let pct = percent_changes(&totals);

    let rows: Vec<CombinedRow> = components
        .iter()
        .zip(totals.iter().zip(pct))
        .map(|((date, funds, assets), (total, total_pct_change))| CombinedRow {
            date: *date,
            funds: *funds,
            assets: *assets,
            total: *total,
            total_pct_change,
        })
        .collect();

    let total: DailySeries = rows.iter().map(|r| (r.date, r.total)).collect();
    let summary = summarize(&totals);

    CombinedPortfolio {
        rows,
        total,
        summary,
    }
}
