//! Daily price refresh from the AMIS feed.

use anyhow::Context;
use chrono::NaiveDate;
use log::{info, warn};
use soko_db::Database;
use soko_prices::amis::AmisClient;
use soko_prices::county::{normalize_name, County};
use soko_prices::record::PriceRecord;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::DEFAULT_HEADLINES;

/// How the refresh job reaches the price feed.
pub struct RefreshOptions {
    pub source_url: String,
    pub date: Option<NaiveDate>,
    pub max_tries: u32,
    pub backoff: Duration,
}

/// County names in `records` that are not one of the 47 counties, sorted and deduplicated.
///
/// Such rows are still kept; this only feeds a warning.
pub fn unknown_counties(records: &[PriceRecord], counties: &[County]) -> Vec<String> {
    let known: HashSet<String> = counties.iter().map(|c| normalize_name(&c.name)).collect();
    let mut unknown: Vec<String> = records
        .iter()
        .filter(|r| !known.contains(&normalize_name(&r.county)))
        .map(|r| r.county.clone())
        .collect();
    unknown.sort();
    unknown.dedup();
    unknown
}

/// Write `records` to a sibling `.tmp` file, then rename it over `prices_csv`.
///
/// A failed write removes the temporary file and leaves `prices_csv` as it was.
pub fn write_prices_file(prices_csv: &Path, records: &[PriceRecord]) -> anyhow::Result<()> {
    let mut tmp_name = prices_csv.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let written = File::create(&tmp_path)
        .with_context(|| format!("Failed to create {}", tmp_path.display()))
        .and_then(|file| {
            PriceRecord::write_price_csv(records, BufWriter::new(file)).map_err(anyhow::Error::from)
        })
        .and_then(|()| {
            std::fs::rename(&tmp_path, prices_csv).with_context(|| {
                format!("Failed to move prices into {}", prices_csv.display())
            })
        });
    if written.is_err() && tmp_path.exists() {
        if let Err(e) = std::fs::remove_file(&tmp_path) {
            warn!("Could not remove {}: {}", tmp_path.display(), e);
        }
    }
    written
}

/// Fetch the price list, replace the local copy and write it to `prices_csv`.
///
/// On failure the existing CSV is left untouched.
pub async fn run_refresh(options: &RefreshOptions, prices_csv: &str) -> anyhow::Result<()> {
    let client = AmisClient::new(options.source_url.as_str())?
        .with_retries(options.max_tries, options.backoff);
    info!("Fetching daily prices from {}", client.daily_url(options.date));
    let records = client.fetch_daily_prices(options.date).await?;

    let counties = County::get_county_vector()?;
    let unknown = unknown_counties(&records, &counties);
    if !unknown.is_empty() {
        warn!(
            "{} county names are not Kenyan counties: {}",
            unknown.len(),
            unknown.join(", ")
        );
    }

    let db = Database::new()?;
    db.replace_prices(&records, &options.source_url)?;
    write_prices_file(Path::new(prices_csv), &records)?;

    let snapshot = db.all_commodity_prices(DEFAULT_HEADLINES)?;
    for headline in &snapshot.headlines {
        println!("{}", headline);
    }
    info!(
        "Refresh complete. {} records written to {} (updated {})",
        snapshot.record_count,
        prices_csv,
        snapshot.last_update.as_deref().unwrap_or("never")
    );
    Ok(())
}
