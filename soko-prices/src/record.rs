use crate::error::{PriceError, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Date format used for observation dates in price CSVs: "YYYY-MM-DD"
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Header row written to and expected from price CSVs.
pub const CSV_HEADER: [&str; 6] = ["commodity", "county", "market", "price", "unit", "date"];

/// Currency tags stripped from the price column before parsing.
const CURRENCY_TAGS: [&str; 3] = ["kes", "kshs", "ksh"];

/// A single market price observation.
///
/// Records have no identity beyond their position in the source; two
/// records with identical fields are both kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub commodity: String,
    pub county: String,
    pub market: String,
    /// Price in KES per `unit`
    pub price: f64,
    pub unit: String,
    /// Observation date as formatted upstream
    pub date: String,
}

impl PriceRecord {
    pub fn new(
        commodity: &str,
        county: &str,
        market: &str,
        price: f64,
        unit: &str,
        date: &str,
    ) -> Self {
        PriceRecord {
            commodity: commodity.to_string(),
            county: county.to_string(),
            market: market.to_string(),
            price,
            unit: unit.to_string(),
            date: date.to_string(),
        }
    }

    /// True when commodity, county or market contains `folded_query`.
    ///
    /// The query must already be lowercased.
    pub fn matches(&self, folded_query: &str) -> bool {
        self.commodity.to_lowercase().contains(folded_query)
            || self.county.to_lowercase().contains(folded_query)
            || self.market.to_lowercase().contains(folded_query)
    }

    /// Parse the price column, tolerating a currency tag and thousands separators.
    ///
    /// "KES 1,250.50" -> 1250.5
    pub fn parse_price(raw: &str) -> Result<f64> {
        let lowered = raw.trim().to_lowercase();
        let mut ess = lowered.as_str();
        for tag in CURRENCY_TAGS {
            if let Some(rest) = ess.strip_prefix(tag) {
                ess = rest.trim_start_matches('.').trim_start();
                break;
            }
        }
        let cleaned: String = ess.chars().filter(|c| *c != ',').collect();
        match cleaned.parse::<f64>() {
            Ok(p) if p.is_finite() && p >= 0.0 => Ok(p),
            _ => Err(PriceError::InvalidPrice(raw.to_string())),
        }
    }

    /// Parse a price CSV body (with headers) into records.
    ///
    /// Expected columns: commodity, county, market, price, unit, date.
    /// Rows with an unusable price are skipped and logged.
    pub fn parse_price_csv(csv_object: &str) -> Result<Vec<PriceRecord>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_object.as_bytes());
        let mut records: Vec<PriceRecord> = Vec::new();
        let mut skipped = 0u32;
        for row in rdr.records() {
            let string_record = row?;
            match PriceRecord::try_from(&string_record) {
                Ok(record) => records.push(record),
                Err(e) => {
                    skipped += 1;
                    warn!("Skipping price row {:?}: {}", string_record, e);
                }
            }
        }
        info!(
            "Parsed {} price records, skipped {}",
            records.len(),
            skipped
        );
        Ok(records)
    }

    /// Write records as a price CSV (with headers).
    pub fn write_price_csv<'a, I, W>(records: I, writer: W) -> Result<()>
    where
        I: IntoIterator<Item = &'a PriceRecord>,
        W: Write,
    {
        let mut wtr = WriterBuilder::new().from_writer(writer);
        wtr.write_record(CSV_HEADER)?;
        for r in records {
            let price = r.price.to_string();
            wtr.write_record([
                r.commodity.as_str(),
                r.county.as_str(),
                r.market.as_str(),
                price.as_str(),
                r.unit.as_str(),
                r.date.as_str(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl TryFrom<&StringRecord> for PriceRecord {
    type Error = PriceError;

    fn try_from(value: &StringRecord) -> Result<Self> {
        let field = |idx: usize| value.get(idx).unwrap_or("").trim().to_string();
        let price = PriceRecord::parse_price(value.get(3).unwrap_or(""))?;
        Ok(PriceRecord {
            commodity: field(0),
            county: field(1),
            market: field(2),
            price,
            unit: field(4),
            date: field(5),
        })
    }
}
