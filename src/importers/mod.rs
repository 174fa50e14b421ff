// Import module - daily fund/asset batches and bulk directory loading

pub mod archive;
pub mod batch;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::db::{self, AssetRecord, FundRecord, InsertOutcome};
use crate::utils::date_from_file_name;

pub use archive::Family;
pub use batch::{
    format_fund_batch, parse_asset_batch, parse_fund_batch, parse_value, AssetValues, FundEntry,
};

/// Counts of one ingestion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub added: usize,
    pub duplicates: usize,
}

impl ImportSummary {
    fn record(&mut self, outcome: InsertOutcome) {
        match outcome {
            InsertOutcome::Inserted(_) => self.added += 1,
            InsertOutcome::Duplicate => self.duplicates += 1,
        }
    }

    fn merge(&mut self, other: ImportSummary) {
        self.added += other.added;
        self.duplicates += other.duplicates;
    }
}

/// Store parsed fund entries for a date
pub fn ingest_fund_entries(
    conn: &Connection,
    entries: &[FundEntry],
    date: NaiveDate,
) -> Result<ImportSummary> {
    let tx = conn.unchecked_transaction()?;
    let mut summary = ImportSummary::default();

    for entry in entries {
        let record = FundRecord {
            id: None,
            date,
            fund_code: entry.code.clone(),
            fund_name: entry.name.clone(),
            value: entry.value,
        };
        let outcome = db::insert_fund_record(&tx, &record)?;
        if outcome == InsertOutcome::Duplicate {
            warn!("Fund {} already has a value for {}, skipped", entry.code, date);
        }
        summary.record(outcome);
    }

    tx.commit().context("Failed to commit fund batch")?;
    info!(
        "Fund batch for {}: {} added, {} duplicates",
        date, summary.added, summary.duplicates
    );
    Ok(summary)
}

/// Parse and store a fund batch; a malformed batch stores nothing
pub fn ingest_fund_batch(conn: &Connection, text: &str, date: NaiveDate) -> Result<ImportSummary> {
    let entries = parse_fund_batch(text)?;
    ingest_fund_entries(conn, &entries, date)
}

/// Store the asset values of a date
pub fn ingest_asset_values(
    conn: &Connection,
    values: &AssetValues,
    date: NaiveDate,
) -> Result<ImportSummary> {
    let record = AssetRecord {
        id: None,
        date,
        precious_metals: values.precious_metals,
        crypto: values.crypto,
        physical_gold: values.physical_gold,
    };

    let mut summary = ImportSummary::default();
    let outcome = db::insert_asset_record(conn, &record)?;
    if outcome == InsertOutcome::Duplicate {
        warn!("Asset values for {} already exist, skipped", date);
    }
    summary.record(outcome);
    Ok(summary)
}

/// Parse and store an asset batch
pub fn ingest_asset_batch(conn: &Connection, text: &str, date: NaiveDate) -> Result<ImportSummary> {
    let values = parse_asset_batch(text)?;
    ingest_asset_values(conn, &values, date)
}

/// Outcome of a bulk directory load
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkLoadSummary {
    pub files: usize,
    pub funds: ImportSummary,
    pub assets: ImportSummary,
    /// Files not loaded, with the reason
    pub skipped: Vec<(PathBuf, String)>,
}

/// Every `.txt` file below `dir`, sorted by path. A missing directory is empty.
fn collect_text_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if !dir.is_dir() {
        return Ok(files);
    }

    for entry in fs::read_dir(dir).context(format!("Failed to read directory {:?}", dir))? {
        let path = entry?.path();
        if path.is_dir() {
            files.extend(collect_text_files(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "txt") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Load every dated batch under `<root>/data_funds` and `<root>/data_assets`.
///
/// Badly named or malformed files are skipped and listed in the summary;
/// database failures abort the load.
pub fn load_directory(conn: &Connection, root: &Path) -> Result<BulkLoadSummary> {
    let mut summary = BulkLoadSummary::default();

    for family in Family::ALL {
        for path in collect_text_files(&root.join(family.dir_name()))? {
            let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            let Some(date) = date_from_file_name(file_name) else {
                warn!("Skipping {:?}: file name is not YYYY-MM-DD.txt", path);
                summary
                    .skipped
                    .push((path, "file name is not YYYY-MM-DD.txt".to_string()));
                continue;
            };

            let text =
                fs::read_to_string(&path).context(format!("Failed to read {:?}", path))?;

            let parsed = match family {
                Family::Funds => parse_fund_batch(&text).map(|entries| {
                    ingest_fund_entries(conn, &entries, date).map(|s| summary.funds.merge(s))
                }),
                Family::Assets => parse_asset_batch(&text).map(|values| {
                    ingest_asset_values(conn, &values, date).map(|s| summary.assets.merge(s))
                }),
            };

            match parsed {
                Ok(stored) => {
                    stored?;
                    summary.files += 1;
                }
                Err(e) => {
                    warn!("Skipping {:?}: {}", path, e);
                    summary.skipped.push((path, e.to_string()));
                }
            }
        }
    }

    info!(
        "Loaded {} files from {:?} ({} skipped)",
        summary.files,
        root,
        summary.skipped.len()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        db::apply_schema(&conn).unwrap();
        conn
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, d).unwrap()
    }

    #[test]
    fn test_ingest_fund_batch_counts_duplicates() {
        let conn = test_conn();
        let text = "A Fund A\tB Fund B\n100\t50\n";

        let first = ingest_fund_batch(&conn, text, date(1)).unwrap();
        assert_eq!(first, ImportSummary { added: 2, duplicates: 0 });

        let second = ingest_fund_batch(&conn, text, date(1)).unwrap();
        assert_eq!(second, ImportSummary { added: 0, duplicates: 2 });

        let records = db::fetch_fund_records(&conn, date(1), date(1)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fund_name, "Fund A");
    }

    #[test]
    fn test_malformed_batch_inserts_nothing() {
        let conn = test_conn();
        assert!(ingest_fund_batch(&conn, "A\tB\n100\tlots\n", date(1)).is_err());
        assert!(db::fetch_fund_records(&conn, date(1), date(1)).unwrap().is_empty());
    }

    #[test]
    fn test_ingest_asset_batch() {
        let conn = test_conn();
        let text = "precious_metals\tcrypto\tphysical_gold\n1\t2\t3\n";
        assert_eq!(ingest_asset_batch(&conn, text, date(2)).unwrap().added, 1);
        assert_eq!(ingest_asset_batch(&conn, text, date(2)).unwrap().duplicates, 1);

        let records = db::fetch_asset_records(&conn, date(1), date(3)).unwrap();
        assert_eq!(records[0].crypto, dec!(2));
    }

    #[test]
    fn test_load_directory_walks_archive_layout() {
        let conn = test_conn();
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        archive::save_raw(root, Family::Funds, date(1), "A Alpha\n10\n").unwrap();
        archive::save_raw(root, Family::Funds, date(2), "A Alpha\n12\n").unwrap();
        archive::save_raw(root, Family::Funds, date(3), "A Alpha\nnope\n").unwrap();
        let values = AssetValues {
            precious_metals: dec!(1),
            crypto: dec!(2),
            physical_gold: dec!(3),
        };
        archive::save_raw(root, Family::Assets, date(1), &values.to_batch_text()).unwrap();
        fs::write(root.join("data_funds").join("readme.txt"), "hello").unwrap();

        let summary = load_directory(&conn, root).unwrap();
        assert_eq!(summary.files, 3);
        assert_eq!(summary.funds.added, 2);
        assert_eq!(summary.assets.added, 1);
        assert_eq!(summary.skipped.len(), 2);
    }

    #[test]
    fn test_load_directory_without_family_dirs() {
        let conn = test_conn();
        let dir = tempfile::tempdir().unwrap();
        let summary = load_directory(&conn, dir.path()).unwrap();
        assert_eq!(summary.files, 0);
        assert!(summary.skipped.is_empty());
    }
}
