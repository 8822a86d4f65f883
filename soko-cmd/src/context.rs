//! Explicitly owned state shared by interactive commands.

use anyhow::Context;
use soko_db::snapshot::PriceSnapshot;
use soko_db::Database;
use soko_utils::cache::TtlCache;
use soko_utils::monitor::LogBuffer;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

/// Price files kept loaded at once.
const CACHE_CAPACITY: usize = 8;

/// Log events kept for the `logs` command.
const LOG_CAPACITY: usize = 200;

/// Build a snapshot from price CSV text in a fresh database.
pub fn snapshot_from_csv(csv_data: &str, headline_limit: usize) -> anyhow::Result<PriceSnapshot> {
    let db = Database::new()?;
    db.load_prices(csv_data)?;
    db.all_commodity_prices(headline_limit)
}

/// Read a price CSV from disk and build its snapshot.
pub fn load_snapshot(prices_csv: &Path, headline_limit: usize) -> anyhow::Result<PriceSnapshot> {
    let csv_data = std::fs::read_to_string(prices_csv)
        .with_context(|| format!("Failed to read price CSV {}", prices_csv.display()))?;
    snapshot_from_csv(&csv_data, headline_limit)
}

pub struct AppContext {
    cache: TtlCache<Rc<PriceSnapshot>>,
    pub monitor: LogBuffer,
    headline_limit: usize,
}

impl AppContext {
    pub fn new(cache_ttl: Duration, headline_limit: usize) -> Self {
        AppContext {
            cache: TtlCache::new(CACHE_CAPACITY, cache_ttl),
            monitor: LogBuffer::new(LOG_CAPACITY),
            headline_limit,
        }
    }

    /// Snapshot of a price file, reused from the cache while it is fresh.
    pub fn snapshot(&mut self, prices_csv: &Path) -> anyhow::Result<Rc<PriceSnapshot>> {
        let key = prices_csv.display().to_string();
        if let Some(snapshot) = self.cache.get(&key) {
            let snapshot = Rc::clone(snapshot);
            self.monitor.info(format!("Served {} from cache", key));
            return Ok(snapshot);
        }
        match load_snapshot(prices_csv, self.headline_limit) {
            Ok(snapshot) => {
                let snapshot = Rc::new(snapshot);
                self.monitor.info(format!(
                    "Loaded {} records from {}",
                    snapshot.record_count, key
                ));
                self.cache.insert(key, Rc::clone(&snapshot));
                Ok(snapshot)
            }
            Err(e) => {
                self.monitor.error(format!("Loading {} failed: {:#}", key, e));
                Err(e)
            }
        }
    }

    /// Read a price file again, ignoring any cached snapshot.
    pub fn reload(&mut self, prices_csv: &Path) -> anyhow::Result<Rc<PriceSnapshot>> {
        self.cache.invalidate(&prices_csv.display().to_string());
        self.snapshot(prices_csv)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::PathBuf;

    pub(crate) const SAMPLE_CSV: &str = "\
commodity,county,market,price,unit,date
Maize,Nakuru,Nakuru Town,45,kg,2024-01-01
Beans,Kiambu,Thika,90,kg,2024-01-01
Maize,Uasin Gishu,Eldoret,40,kg,2024-01-02
";

    /// Write `contents` to a per-test file under the system temp directory.
    pub(crate) fn temp_csv(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "soko-cmd-{}-{}.csv",
            std::process::id(),
            name
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn snapshot_is_cached_until_reload() {
        let path = temp_csv("cached", SAMPLE_CSV);
        let mut ctx = AppContext::new(Duration::from_secs(3600), 3);
        let first = ctx.snapshot(&path).unwrap();
        assert_eq!(first.record_count, 3);

        // File changes are not seen while the cached snapshot is fresh
        std::fs::write(&path, "commodity,county,market,price,unit,date\n").unwrap();
        let second = ctx.snapshot(&path).unwrap();
        assert!(Rc::ptr_eq(&first, &second));

        let reloaded = ctx.reload(&path).unwrap();
        assert_eq!(reloaded.record_count, 0);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn zero_ttl_reads_every_time() {
        let path = temp_csv("uncached", SAMPLE_CSV);
        let mut ctx = AppContext::new(Duration::ZERO, 3);
        let first = ctx.snapshot(&path).unwrap();
        let second = ctx.snapshot(&path).unwrap();
        assert!(!Rc::ptr_eq(&first, &second));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_logged() {
        let mut ctx = AppContext::new(Duration::from_secs(60), 3);
        let missing = std::env::temp_dir().join("soko-cmd-does-not-exist.csv");
        assert!(ctx.snapshot(&missing).is_err());
        assert_eq!(ctx.monitor.count_at_least(log::Level::Error), 1);
    }

    #[test]
    fn snapshot_from_csv_builds_index() {
        let snapshot = snapshot_from_csv(SAMPLE_CSV, 1).unwrap();
        assert_eq!(snapshot.index.len(), 3);
        assert_eq!(snapshot.headlines.len(), 1);
        assert_eq!(snapshot.last_update.as_deref(), Some("2024-01-02"));
    }
}
