//! Selection of the records a price view shows.

use crate::index::PriceIndex;
use serde::{Deserialize, Serialize};
use soko_prices::record::PriceRecord;
use std::fmt;
use std::str::FromStr;

/// Selector value meaning "no restriction".
pub const ALL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    County,
    Commodity,
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "county" => Ok(ViewMode::County),
            "commodity" => Ok(ViewMode::Commodity),
            other => Err(format!(
                "unknown view {:?}, expected \"county\" or \"commodity\"",
                other
            )),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::County => write!(f, "county"),
            ViewMode::Commodity => write!(f, "commodity"),
        }
    }
}

/// Current view state: mode, the two selectors and the search box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub view: ViewMode,
    pub county: String,
    pub commodity: String,
    pub search: String,
}

impl Default for Selection {
    fn default() -> Self {
        Selection {
            view: ViewMode::County,
            county: ALL.to_string(),
            commodity: ALL.to_string(),
            search: String::new(),
        }
    }
}

impl Selection {
    pub fn select<'a>(&self, index: &'a PriceIndex) -> Vec<&'a PriceRecord> {
        select_prices(
            index,
            self.view,
            &self.county,
            &self.commodity,
            &self.search,
        )
    }
}

/// Flatten the part of `index` chosen by the view and selectors, then apply the search.
///
/// Unknown county or commodity keys select nothing. A non-empty search keeps
/// records whose commodity, county or market contains it, ignoring case.
pub fn select_prices<'a>(
    index: &'a PriceIndex,
    view: ViewMode,
    selected_county: &str,
    selected_commodity: &str,
    search_query: &str,
) -> Vec<&'a PriceRecord> {
    let selected: Vec<&PriceRecord> = match view {
        ViewMode::County => {
            if selected_county == ALL {
                index.records().collect()
            } else {
                index
                    .county_prices
                    .get(selected_county)
                    .map(|bucket| bucket.iter().collect())
                    .unwrap_or_default()
            }
        }
        ViewMode::Commodity => {
            if selected_commodity == ALL {
                index
                    .commodity_prices
                    .values()
                    .flat_map(|by_county| by_county.values().flatten())
                    .collect()
            } else {
                index.commodity_records(selected_commodity)
            }
        }
    };

    if search_query.is_empty() {
        return selected;
    }
    let folded = search_query.to_lowercase();
    let filtered: Vec<&PriceRecord> = selected.into_iter().filter(|r| r.matches(&folded)).collect();
    log::debug!(
        "view: {} records match search {:?}",
        filtered.len(),
        search_query
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::sample_records;

    fn two_records() -> Vec<PriceRecord> {
        vec![
            PriceRecord::new("Maize", "Nakuru", "Nakuru Town", 45.0, "kg", "2024-01-01"),
            PriceRecord::new("Beans", "Kiambu", "Thika", 90.0, "kg", "2024-01-01"),
        ]
    }

    #[test]
    fn commodity_view_selects_one_commodity() {
        let records = two_records();
        let index = PriceIndex::build(&records);
        let selected = select_prices(&index, ViewMode::Commodity, ALL, "Maize", "");
        assert_eq!(selected, vec![&records[0]]);
    }

    #[test]
    fn search_thika_finds_market_in_any_view() {
        let records = two_records();
        let index = PriceIndex::build(&records);
        for view in [ViewMode::County, ViewMode::Commodity] {
            let selected = select_prices(&index, view, ALL, ALL, "thika");
            assert_eq!(selected, vec![&records[1]], "view {}", view);
        }
    }

    #[test]
    fn county_all_is_permutation_of_records() {
        let records = sample_records();
        let index = PriceIndex::build(&records);
        let selected = select_prices(&index, ViewMode::County, ALL, ALL, "");
        assert_eq!(selected.len(), records.len());
        for record in &records {
            let expected = records.iter().filter(|r| *r == record).count();
            let found = selected.iter().filter(|r| **r == record).count();
            assert_eq!(found, expected);
        }
        // County buckets concatenated in first-seen county order
        let counties: Vec<&str> = selected.iter().map(|r| r.county.as_str()).collect();
        assert_eq!(
            counties,
            vec!["Nakuru", "Nakuru", "Nakuru", "Kiambu", "Kiambu", "Uasin Gishu"]
        );
    }

    #[test]
    fn commodity_all_orders_by_commodity_then_county() {
        let index = PriceIndex::build(&sample_records());
        let selected = select_prices(&index, ViewMode::Commodity, ALL, ALL, "");
        let pairs: Vec<(&str, &str)> = selected
            .iter()
            .map(|r| (r.commodity.as_str(), r.county.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Maize", "Nakuru"),
                ("Maize", "Nakuru"),
                ("Maize", "Uasin Gishu"),
                ("Beans", "Kiambu"),
                ("Beans", "Kiambu"),
                ("Beans", "Nakuru"),
            ]
        );
    }

    #[test]
    fn county_view_returns_bucket_verbatim() {
        let records = sample_records();
        let index = PriceIndex::build(&records);
        let selected = select_prices(&index, ViewMode::County, "Kiambu", ALL, "");
        assert_eq!(selected, vec![&records[1], &records[5]]);
    }

    #[test]
    fn unknown_keys_select_nothing() {
        let index = PriceIndex::build(&sample_records());
        assert!(select_prices(&index, ViewMode::County, "Atlantis", ALL, "").is_empty());
        assert!(select_prices(&index, ViewMode::Commodity, ALL, "Saffron", "").is_empty());
    }

    #[test]
    fn selectors_for_the_other_view_are_ignored() {
        let index = PriceIndex::build(&sample_records());
        let by_county = select_prices(&index, ViewMode::County, ALL, "Saffron", "");
        assert_eq!(by_county.len(), 6);
        let by_commodity = select_prices(&index, ViewMode::Commodity, "Atlantis", "Beans", "");
        assert_eq!(by_commodity.len(), 3);
    }

    #[test]
    fn search_is_case_insensitive_or_across_fields() {
        let index = PriceIndex::build(&sample_records());
        // county field
        let nakuru = select_prices(&index, ViewMode::County, ALL, ALL, "NAKURU");
        assert_eq!(nakuru.len(), 3);
        // commodity field
        let beans = select_prices(&index, ViewMode::County, ALL, ALL, "bEaNs");
        assert_eq!(beans.len(), 3);
        // market field only
        let molo = select_prices(&index, ViewMode::Commodity, ALL, ALL, "molo");
        assert_eq!(molo.len(), 1);
        // not the unit or date
        assert!(select_prices(&index, ViewMode::County, ALL, ALL, "2024").is_empty());
    }

    #[test]
    fn search_applies_within_selection() {
        let index = PriceIndex::build(&sample_records());
        let selected = select_prices(&index, ViewMode::County, "Nakuru", ALL, "maize");
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|r| r.commodity == "Maize"));
    }

    #[test]
    fn empty_search_returns_selection_unfiltered() {
        let index = PriceIndex::build(&sample_records());
        let selection = Selection {
            view: ViewMode::Commodity,
            commodity: "Maize".to_string(),
            ..Selection::default()
        };
        assert_eq!(selection.select(&index).len(), 3);
    }

    #[test]
    fn view_mode_parses_and_displays() {
        assert_eq!("County".parse::<ViewMode>().unwrap(), ViewMode::County);
        assert_eq!(" commodity ".parse::<ViewMode>().unwrap(), ViewMode::Commodity);
        assert!("market".parse::<ViewMode>().is_err());
        assert_eq!(ViewMode::Commodity.to_string(), "commodity");
    }
}
