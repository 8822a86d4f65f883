//! Price loading for the in-memory SQLite database.
//!
//! # CSV Format
//!
//! Price CSVs have headers: `commodity,county,market,price,unit,date`.
//! Rows are converted through [`PriceRecord`], so a row whose price is not a
//! non-negative number is skipped; missing text columns load as empty strings.

use crate::Database;
use chrono::Local;
use rusqlite::{params, Connection};
use soko_prices::record::PriceRecord;
use soko_utils::dates::format_timestamp;

fn insert_records(conn: &Connection, records: &[PriceRecord]) -> anyhow::Result<usize> {
    let mut stmt = conn.prepare(
        "INSERT INTO prices (commodity, county, market, price, unit, date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for r in records {
        stmt.execute(params![r.commodity, r.county, r.market, r.price, r.unit, r.date])?;
    }
    Ok(records.len())
}

impl Database {
    /// Append price rows from a CSV string.
    ///
    /// # Example CSV
    /// ```text
    /// commodity,county,market,price,unit,date
    /// Maize,Nakuru,Nakuru Town,45,kg,2024-01-01
    /// ```
    pub fn load_prices(&self, csv_data: &str) -> anyhow::Result<usize> {
        let records = PriceRecord::parse_price_csv(csv_data)?;
        let conn = self.conn.borrow();
        let count = insert_records(&conn, &records)?;
        log::info!("[Soko] loader: Loaded {} price records", count);
        Ok(count)
    }

    /// Replace the whole price table with `records` and log the refresh.
    ///
    /// Runs in one transaction: either the new list fully replaces the old one
    /// or nothing changes.
    pub fn replace_prices(&self, records: &[PriceRecord], source: &str) -> anyhow::Result<usize> {
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM prices", [])?;
        let count = insert_records(&tx, records)?;
        let fetched_at = format_timestamp(&Local::now().naive_local());
        tx.execute(
            "INSERT INTO refreshes (fetched_at, source, record_count) VALUES (?1, ?2, ?3)",
            params![fetched_at, source, count as i64],
        )?;
        tx.commit()?;
        log::info!(
            "[Soko] loader: Replaced prices with {} records from {}",
            count,
            source
        );
        Ok(count)
    }
}
