// Database module - SQLite record store for fund and asset values

pub mod models;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, ErrorCode};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::TrackerError;

pub use models::{AssetCategory, AssetRecord, FundRecord, InsertOutcome};

/// Read interface the analytics layer consumes.
///
/// Both methods return records with `start <= date <= end`, ordered by date,
/// and an empty vector when nothing matches.
pub trait RecordStore {
    fn fetch_fund_records(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<FundRecord>>;
    fn fetch_asset_records(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<AssetRecord>>;
}

impl RecordStore for Connection {
    fn fetch_fund_records(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<FundRecord>> {
        fetch_fund_records(self, start, end)
    }

    fn fetch_asset_records(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<AssetRecord>> {
        fetch_asset_records(self, start, end)
    }
}

/// Get the default data directory (~/.fundfolio)
pub fn get_default_data_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".fundfolio"))
}

/// Get the default database path (~/.fundfolio/data.db)
pub fn get_default_db_path() -> Result<PathBuf> {
    Ok(get_default_data_dir()?.join("data.db"))
}

/// Open database connection
pub fn open_db(db_path: Option<PathBuf>) -> Result<Connection> {
    let path = match db_path {
        Some(p) => p,
        None => get_default_db_path()?,
    };
    let conn = Connection::open(&path).map_err(|e| {
        TrackerError::DbError(format!("failed to open database at {:?}: {}", path, e))
    })?;
    Ok(conn)
}

/// Initialize the database with schema
///
/// Creates the parent directory and database file when missing, then runs
/// the (idempotent) schema SQL.
pub fn init_database(db_path: Option<PathBuf>) -> Result<()> {
    let path = match db_path {
        Some(p) => p,
        None => get_default_db_path()?,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .context(format!("Failed to create data directory {:?}", parent))?;
    }

    debug!("Initializing database at: {:?}", path);

    let conn = open_db(Some(path))?;
    apply_schema(&conn)?;

    Ok(())
}

/// Run the embedded schema on an open connection
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(include_str!("schema.sql"))
        .map_err(|e| TrackerError::DbError(format!("failed to execute schema: {}", e)))?;
    Ok(())
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

/// Insert a fund value; a second record for the same (fund_code, date) is rejected
pub fn insert_fund_record(conn: &Connection, record: &FundRecord) -> Result<InsertOutcome> {
    let result = conn.execute(
        "INSERT INTO fund_values (fund_code, fund_name, value_date, value)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            record.fund_code,
            record.fund_name,
            record.date,
            record.value.to_string(),
        ],
    );

    match result {
        Ok(_) => Ok(InsertOutcome::Inserted(conn.last_insert_rowid())),
        Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::Duplicate),
        Err(e) => Err(e).context(format!(
            "Failed to insert fund value {} ({})",
            record.fund_code, record.date
        )),
    }
}

/// Insert the asset values of a day; a second record for the same date is rejected
pub fn insert_asset_record(conn: &Connection, record: &AssetRecord) -> Result<InsertOutcome> {
    let result = conn.execute(
        "INSERT INTO asset_values (value_date, precious_metals, crypto, physical_gold)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            record.date,
            record.precious_metals.to_string(),
            record.crypto.to_string(),
            record.physical_gold.to_string(),
        ],
    );

    match result {
        Ok(_) => Ok(InsertOutcome::Inserted(conn.last_insert_rowid())),
        Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::Duplicate),
        Err(e) => Err(e).context(format!("Failed to insert asset values ({})", record.date)),
    }
}

/// Fund values within [start, end], ordered by date then fund code
pub fn fetch_fund_records(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<FundRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, value_date, fund_code, fund_name, value
         FROM fund_values
         WHERE value_date >= ?1 AND value_date <= ?2
         ORDER BY value_date ASC, fund_code ASC",
    )?;

    let records = stmt
        .query_map(params![start, end], |row| {
            Ok(FundRecord {
                id: Some(row.get(0)?),
                date: row.get(1)?,
                fund_code: row.get(2)?,
                fund_name: row.get(3)?,
                value: get_decimal_value(row, 4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "Fetched {} fund records for {} → {}",
        records.len(),
        start,
        end
    );
    Ok(records)
}

/// Asset values within [start, end], ordered by date
pub fn fetch_asset_records(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<AssetRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, value_date, precious_metals, crypto, physical_gold
         FROM asset_values
         WHERE value_date >= ?1 AND value_date <= ?2
         ORDER BY value_date ASC",
    )?;

    let records = stmt
        .query_map(params![start, end], |row| {
            Ok(AssetRecord {
                id: Some(row.get(0)?),
                date: row.get(1)?,
                precious_metals: get_decimal_value(row, 2)?,
                crypto: get_decimal_value(row, 3)?,
                physical_gold: get_decimal_value(row, 4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "Fetched {} asset records for {} → {}",
        records.len(),
        start,
        end
    );
    Ok(records)
}

/// Delete every fund value recorded on a date, returns rows deleted
pub fn delete_fund_records_on(conn: &Connection, date: NaiveDate) -> Result<usize> {
    let deleted = conn
        .execute("DELETE FROM fund_values WHERE value_date = ?1", params![date])
        .context("Failed to delete fund values")?;
    info!("Deleted {} fund records for {}", deleted, date);
    Ok(deleted)
}

/// Delete the asset values recorded on a date, returns rows deleted
pub fn delete_asset_records_on(conn: &Connection, date: NaiveDate) -> Result<usize> {
    let deleted = conn
        .execute("DELETE FROM asset_values WHERE value_date = ?1", params![date])
        .context("Failed to delete asset values")?;
    info!("Deleted {} asset records for {}", deleted, date);
    Ok(deleted)
}

/// Delete both families within [start, end] in one transaction.
/// Returns (fund rows deleted, asset rows deleted).
pub fn delete_records_between(
    conn: &mut Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(usize, usize)> {
    let tx = conn.transaction()?;
    let funds = tx.execute(
        "DELETE FROM fund_values WHERE value_date >= ?1 AND value_date <= ?2",
        params![start, end],
    )?;
    let assets = tx.execute(
        "DELETE FROM asset_values WHERE value_date >= ?1 AND value_date <= ?2",
        params![start, end],
    )?;
    tx.commit().context("Failed to commit range deletion")?;

    info!(
        "Deleted {} fund and {} asset records between {} and {}",
        funds, assets, start, end
    );
    Ok((funds, assets))
}

/// Helper to read Decimal from SQLite (handles INTEGER, REAL and TEXT)
pub fn get_decimal_value(row: &rusqlite::Row, idx: usize) -> Result<Decimal, rusqlite::Error> {
    use rusqlite::types::{Type, ValueRef};

    match row.get_ref(idx)? {
        ValueRef::Text(bytes) => {
            let s = std::str::from_utf8(bytes)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))?;
            Decimal::from_str(s)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
        }
        ValueRef::Integer(i) => Ok(Decimal::from(i)),
        ValueRef::Real(f) => Decimal::try_from(f)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Real, Box::new(e))),
        _ => Err(rusqlite::Error::InvalidColumnType(
            idx,
            "decimal".to_string(),
            Type::Null,
        )),
    }
}
