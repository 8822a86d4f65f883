//! Ready-to-render price state assembled from the database.

use crate::Database;
use serde::Serialize;
use soko_data::PriceIndex;
use soko_utils::dates::{format_date, latest_date};

/// Everything a price view needs after one load.
///
/// The index is built once here; views select from it directly instead of
/// regrouping the records.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PriceSnapshot {
    pub index: PriceIndex,
    pub headlines: Vec<String>,
    /// Latest refresh time, or the newest observation date when nothing was
    /// refreshed in this process.
    pub last_update: Option<String>,
    pub record_count: usize,
}

impl Database {
    /// Current prices grouped by county and by commodity, with headlines.
    ///
    /// `headline_limit` caps the number of headline strings.
    pub fn all_commodity_prices(&self, headline_limit: usize) -> anyhow::Result<PriceSnapshot> {
        let records = self.query_prices()?;
        let index = PriceIndex::build(&records);
        let headlines = self
            .query_commodity_summaries()?
            .iter()
            .take(headline_limit)
            .map(|s| s.headline())
            .collect();
        let last_update = match self.query_last_refresh()? {
            Some(refresh) => Some(refresh.fetched_at),
            None => latest_date(records.iter().map(|r| r.date.as_str())).map(|d| format_date(&d)),
        };
        log::info!(
            "[Soko] snapshot: {} records, last update {:?}",
            records.len(),
            last_update
        );
        Ok(PriceSnapshot {
            index,
            headlines,
            last_update,
            record_count: records.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::queries::tests::sample_db;
    use crate::Database;
    use soko_data::{select_prices, ViewMode, ALL};

    #[test]
    fn snapshot_indexes_every_record() {
        let db = sample_db();
        let snapshot = db.all_commodity_prices(10).unwrap();
        assert_eq!(snapshot.record_count, 6);
        assert_eq!(snapshot.index.len(), 6);
        let all = select_prices(&snapshot.index, ViewMode::County, ALL, ALL, "");
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn snapshot_headlines_are_limited() {
        let db = sample_db();
        let snapshot = db.all_commodity_prices(2).unwrap();
        assert_eq!(
            snapshot.headlines,
            vec![
                "Maize: KES 45.00/kg avg across 2 counties (40.00 - 50.00)".to_string(),
                "Beans: KES 90.00/kg avg across 1 county (90.00 - 90.00)".to_string(),
            ]
        );
    }

    #[test]
    fn last_update_falls_back_to_newest_date() {
        let db = sample_db();
        let snapshot = db.all_commodity_prices(0).unwrap();
        assert_eq!(snapshot.last_update.as_deref(), Some("2024-01-03"));
        assert!(snapshot.headlines.is_empty());
    }

    #[test]
    fn last_update_prefers_refresh_time() {
        let db = sample_db();
        let prices = db.query_prices().unwrap();
        db.replace_prices(&prices, "test").unwrap();
        let snapshot = db.all_commodity_prices(1).unwrap();
        let refreshed = db.query_last_refresh().unwrap().unwrap();
        assert_eq!(snapshot.last_update, Some(refreshed.fetched_at));
    }

    #[test]
    fn empty_database_snapshot() {
        let db = Database::new().unwrap();
        let snapshot = db.all_commodity_prices(5).unwrap();
        assert!(snapshot.index.is_empty());
        assert!(snapshot.last_update.is_none());
        assert_eq!(snapshot.record_count, 0);
    }
}
