//! County and commodity indices over price records.

use serde::ser::{Serialize, SerializeMap, Serializer};
use soko_prices::record::PriceRecord;
use std::collections::HashMap;

/// String-keyed buckets iterated in the order keys were first seen.
#[derive(Debug, Clone, PartialEq)]
pub struct Buckets<V> {
    positions: HashMap<String, usize>,
    entries: Vec<(String, V)>,
}

impl<V> Default for Buckets<V> {
    fn default() -> Self {
        Buckets {
            positions: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<V> Buckets<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.positions.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Default> Buckets<V> {
    /// The bucket for `key`, created empty at the end if it is new.
    pub fn entry_mut(&mut self, key: &str) -> &mut V {
        let idx = match self.positions.get(key) {
            Some(&i) => i,
            None => {
                self.entries.push((key.to_string(), V::default()));
                let i = self.entries.len() - 1;
                self.positions.insert(key.to_string(), i);
                i
            }
        };
        &mut self.entries[idx].1
    }
}

impl<V: Serialize> Serialize for Buckets<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// county -> records
pub type CountyIndex = Buckets<Vec<PriceRecord>>;

/// commodity -> county -> records
pub type CommodityIndex = Buckets<Buckets<Vec<PriceRecord>>>;

/// Both lookups over one fetch of price records.
///
/// Every record lands in exactly one county bucket and exactly one
/// (commodity, county) bucket, in source order within each bucket.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct PriceIndex {
    pub county_prices: CountyIndex,
    pub commodity_prices: CommodityIndex,
}

impl PriceIndex {
    /// Build both indices in a single pass. No validation is performed.
    pub fn build(records: &[PriceRecord]) -> Self {
        let mut index = PriceIndex::default();
        for record in records {
            index
                .county_prices
                .entry_mut(&record.county)
                .push(record.clone());
            index
                .commodity_prices
                .entry_mut(&record.commodity)
                .entry_mut(&record.county)
                .push(record.clone());
        }
        log::debug!(
            "index: {} records over {} counties and {} commodities",
            records.len(),
            index.county_prices.len(),
            index.commodity_prices.len()
        );
        index
    }

    /// Total number of indexed records.
    pub fn len(&self) -> usize {
        self.county_prices.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.county_prices.is_empty()
    }

    /// Every indexed record, county buckets in first-seen order.
    pub fn records(&self) -> impl Iterator<Item = &PriceRecord> {
        self.county_prices.values().flatten()
    }

    pub fn counties(&self) -> impl Iterator<Item = &str> {
        self.county_prices.keys()
    }

    pub fn commodities(&self) -> impl Iterator<Item = &str> {
        self.commodity_prices.keys()
    }

    /// Every record of one commodity, county buckets in first-seen order.
    pub fn commodity_records(&self, commodity: &str) -> Vec<&PriceRecord> {
        self.commodity_prices
            .get(commodity)
            .map(|by_county| by_county.values().flatten().collect())
            .unwrap_or_default()
    }
}
