//! Integration tests for the fundfolio tracker
//!
//! These tests run the analytics against a real SQLite store:
//! - batch ingestion and duplicate handling
//! - daily change matrices and row totals
//! - zero-fill of missing cells
//! - rankings with zero baselines
//! - month deletion boundaries

use anyhow::Result;
use chrono::NaiveDate;
use fundfolio::analytics::build_report;
use fundfolio::db::{
    delete_records_between, fetch_asset_records, fetch_fund_records, init_database,
    insert_fund_record, open_db, FundRecord, RecordStore,
};
use fundfolio::importers::{ingest_asset_batch, ingest_fund_batch, ImportSummary};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use rusqlite::Connection;
use tempfile::TempDir;

/// Test helper: Create a temporary database
fn create_test_db() -> Result<(TempDir, Connection)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    init_database(Some(db_path.clone()))?;
    let conn = open_db(Some(db_path))?;
    Ok((temp_dir, conn))
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
}

fn add_fund(conn: &Connection, date: NaiveDate, code: &str, value: Decimal) -> Result<()> {
    insert_fund_record(
        conn,
        &FundRecord {
            id: None,
            date,
            fund_code: code.to_string(),
            fund_name: String::new(),
            value,
        },
    )?;
    Ok(())
}

#[test]
fn test_two_fund_daily_changes_from_store() -> Result<()> {
    let (_dir, conn) = create_test_db()?;
    add_fund(&conn, day(1), "A", dec!(100))?;
    add_fund(&conn, day(2), "A", dec!(110))?;
    add_fund(&conn, day(1), "B", dec!(50))?;
    add_fund(&conn, day(2), "B", dec!(45))?;

    let report = build_report(&conn, day(1), day(2), 5)?.expect("report");
    let funds = report.funds.expect("fund analysis");

    assert_eq!(funds.changes.row_total.values(), vec![dec!(150), dec!(155)]);
    assert_eq!(funds.changes.row_total_delta.values(), vec![dec!(0), dec!(5)]);
    assert_eq!(funds.changes.entity_pct_delta.value(day(2), "A"), Some(dec!(10)));
    assert_eq!(funds.changes.entity_pct_delta.value(day(2), "B"), Some(dec!(-10)));

    // First row of every change series is zero
    assert!(funds.changes.entity_delta.row(0).unwrap().iter().all(|v| v.is_zero()));
    assert!(funds.changes.entity_pct_delta.row(0).unwrap().iter().all(|v| v.is_zero()));
    Ok(())
}

#[test]
fn test_single_day_range_has_no_change() -> Result<()> {
    let (_dir, conn) = create_test_db()?;
    add_fund(&conn, day(3), "A", dec!(1234.56))?;

    let report = build_report(&conn, day(3), day(3), 5)?.expect("report");
    let summary = report.portfolio.summary.expect("summary");
    assert_eq!(summary.start_value, dec!(1234.56));
    assert_eq!(summary.change_absolute, Decimal::ZERO);
    assert_eq!(summary.change_percent, Decimal::ZERO);
    Ok(())
}

#[test]
fn test_missing_days_are_zero_filled() -> Result<()> {
    let (_dir, conn) = create_test_db()?;
    add_fund(&conn, day(1), "C", dec!(70))?;
    add_fund(&conn, day(1), "A", dec!(10))?;
    add_fund(&conn, day(2), "A", dec!(11))?;
    add_fund(&conn, day(3), "A", dec!(12))?;

    let report = build_report(&conn, day(1), day(3), 5)?.expect("report");
    let funds = report.funds.expect("fund analysis");

    assert_eq!(
        funds.matrix.column("C"),
        Some(vec![dec!(70), dec!(0), dec!(0)])
    );
    // C drops to zero on day 2: -100%, then a zero baseline on day 3
    assert_eq!(funds.changes.entity_pct_delta.value(day(2), "C"), Some(dec!(-100)));
    assert_eq!(funds.changes.entity_pct_delta.value(day(3), "C"), Some(dec!(0)));
    Ok(())
}

#[test]
fn test_zero_start_entity_ranked_by_amount_only() -> Result<()> {
    let (_dir, conn) = create_test_db()?;
    add_fund(&conn, day(1), "A", dec!(100))?;
    add_fund(&conn, day(2), "A", dec!(110))?;
    add_fund(&conn, day(1), "D", dec!(0))?;
    add_fund(&conn, day(2), "D", dec!(40))?;

    let report = build_report(&conn, day(1), day(2), 5)?.expect("report");
    let rankings = report.funds.expect("fund analysis").rankings;

    let by_amount: Vec<&str> = rankings.top_by_amount.iter().map(|e| e.entity.as_str()).collect();
    assert_eq!(by_amount, vec!["D", "A"]);

    let by_percent: Vec<&str> =
        rankings.top_by_percent.iter().map(|e| e.entity.as_str()).collect();
    assert_eq!(by_percent, vec!["A"]);
    assert!(rankings.bottom_by_percent.iter().all(|e| e.entity != "D"));
    Ok(())
}

#[test]
fn test_bottom_ranking_reverses_top_for_small_families() -> Result<()> {
    let (_dir, conn) = create_test_db()?;
    for (code, start, end) in [("A", 100, 120), ("B", 100, 90), ("C", 100, 100)] {
        add_fund(&conn, day(1), code, Decimal::from(start))?;
        add_fund(&conn, day(2), code, Decimal::from(end))?;
    }

    let report = build_report(&conn, day(1), day(2), 5)?.expect("report");
    let rankings = report.funds.expect("fund analysis").rankings;

    let mut reversed = rankings.top_by_amount.clone();
    reversed.reverse();
    assert_eq!(rankings.bottom_by_amount, reversed);
    Ok(())
}

#[test]
fn test_funds_and_assets_on_different_days_are_combined() -> Result<()> {
    let (_dir, conn) = create_test_db()?;
    ingest_fund_batch(&conn, "A Alpha\tB Beta\n100\t50\n", day(1))?;
    ingest_fund_batch(&conn, "A Alpha\tB Beta\n110\t45\n", day(2))?;
    ingest_asset_batch(&conn, "precious_metals\tcrypto\tphysical_gold\n10\t20\t30\n", day(2))?;
    ingest_asset_batch(&conn, "precious_metals\tcrypto\tphysical_gold\n10\t25\t30\n", day(3))?;

    let report = build_report(&conn, day(1), day(3), 5)?.expect("report");

    let totals: Vec<Decimal> = report.portfolio.rows.iter().map(|r| r.total).collect();
    assert_eq!(totals, vec![dec!(150), dec!(215), dec!(65)]);
    assert_eq!(report.fund_names.get("A").map(String::as_str), Some("Alpha"));

    let summary = report.portfolio.summary.expect("summary");
    assert_eq!(summary.change_absolute, dec!(-85));
    Ok(())
}

#[test]
fn test_duplicate_batch_is_counted_and_not_stored() -> Result<()> {
    let (_dir, conn) = create_test_db()?;
    let text = "A Alpha\n100\n";

    assert_eq!(
        ingest_fund_batch(&conn, text, day(1))?,
        ImportSummary { added: 1, duplicates: 0 }
    );
    assert_eq!(
        ingest_fund_batch(&conn, "A Alpha\n999\n", day(1))?,
        ImportSummary { added: 0, duplicates: 1 }
    );

    let records = conn.fetch_fund_records(day(1), day(1))?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].value, dec!(100));
    Ok(())
}

#[test]
fn test_month_deletion_keeps_neighbouring_months() -> Result<()> {
    let (_dir, mut conn) = create_test_db()?;
    let jan_31 = day(31);
    let feb_1 = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
    let feb_28 = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap();
    let mar_1 = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

    for date in [jan_31, feb_1, feb_28, mar_1] {
        add_fund(&conn, date, "A", dec!(1))?;
        ingest_asset_batch(&conn, "metals\tcrypto\tgold\n1\t1\t1\n", date)?;
    }

    let (funds, assets) = delete_records_between(&mut conn, feb_1, feb_28)?;
    assert_eq!((funds, assets), (2, 2));

    let left: Vec<NaiveDate> = fetch_fund_records(&conn, jan_31, mar_1)?
        .into_iter()
        .map(|r| r.date)
        .collect();
    assert_eq!(left, vec![jan_31, mar_1]);
    assert_eq!(fetch_asset_records(&conn, jan_31, mar_1)?.len(), 2);
    Ok(())
}

#[test]
fn test_empty_range_yields_no_report() -> Result<()> {
    let (_dir, conn) = create_test_db()?;
    add_fund(&conn, day(1), "A", dec!(1))?;
    assert!(build_report(&conn, day(10), day(20), 5)?.is_none());
    Ok(())
}
