//! Typed query methods for retrieving prices from the database.
//!
//! Every list query returns rows in source order: records by `id`, keys by
//! the `id` of their first row.

use crate::models::{CommoditySummary, RefreshInfo};
use crate::Database;
use rusqlite::OptionalExtension;
use soko_prices::record::PriceRecord;

impl Database {
    /// All price records in the order they were loaded.
    pub fn query_prices(&self) -> anyhow::Result<Vec<PriceRecord>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT commodity, county, market, price, unit, date
             FROM prices
             ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(PriceRecord {
                    commodity: row.get(0)?,
                    county: row.get(1)?,
                    market: row.get(2)?,
                    price: row.get(3)?,
                    unit: row.get(4)?,
                    date: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("[Soko] query: query_prices returned {} records", rows.len());
        Ok(rows)
    }

    fn query_first_seen(&self, column: &str) -> anyhow::Result<Vec<String>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(&format!(
            "SELECT {col} FROM prices GROUP BY {col} ORDER BY MIN(id)",
            col = column
        ))?;
        let rows = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(rows)
    }

    /// Distinct counties in first-seen order.
    pub fn query_counties(&self) -> anyhow::Result<Vec<String>> {
        self.query_first_seen("county")
    }

    /// Distinct commodities in first-seen order.
    pub fn query_commodities(&self) -> anyhow::Result<Vec<String>> {
        self.query_first_seen("commodity")
    }

    /// Per (commodity, unit) price statistics in first-seen order.
    ///
    /// Units are not normalized, so "Maize per kg" and "Maize per bag" are
    /// separate summaries.
    pub fn query_commodity_summaries(&self) -> anyhow::Result<Vec<CommoditySummary>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT commodity, unit, AVG(price), MIN(price), MAX(price),
                    COUNT(*), COUNT(DISTINCT county)
             FROM prices
             GROUP BY commodity, unit
             ORDER BY MIN(id)",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(CommoditySummary {
                    commodity: row.get(0)?,
                    unit: row.get(1)?,
                    average: row.get(2)?,
                    min: row.get(3)?,
                    max: row.get(4)?,
                    observations: row.get(5)?,
                    counties: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[Soko] query: query_commodity_summaries returned {} records",
            rows.len()
        );
        Ok(rows)
    }

    /// The most recent replacement of the price table, if any.
    pub fn query_last_refresh(&self) -> anyhow::Result<Option<RefreshInfo>> {
        let conn = self.conn.borrow();
        let info = conn
            .query_row(
                "SELECT fetched_at, source, record_count
                 FROM refreshes
                 ORDER BY id DESC
                 LIMIT 1",
                [],
                |row| {
                    Ok(RefreshInfo {
                        fetched_at: row.get(0)?,
                        source: row.get(1)?,
                        record_count: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(info)
    }
}
