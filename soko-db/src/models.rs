//! Query result model structs.
//!
//! All structs derive `Serialize` so the CLI can print them as JSON.

use serde::Serialize;

/// Aggregate prices of one commodity in one unit.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommoditySummary {
    pub commodity: String,
    pub unit: String,
    /// Mean price in KES per `unit`.
    pub average: f64,
    pub min: f64,
    pub max: f64,
    /// Number of price rows.
    pub observations: i64,
    /// Number of distinct counties reporting.
    pub counties: i64,
}

impl CommoditySummary {
    /// One-line headline, e.g. "Maize: KES 45.00/kg avg across 2 counties (40.00 - 50.00)".
    pub fn headline(&self) -> String {
        let unit = if self.unit.is_empty() {
            String::new()
        } else {
            format!("/{}", self.unit)
        };
        let counties = if self.counties == 1 {
            "1 county".to_string()
        } else {
            format!("{} counties", self.counties)
        };
        format!(
            "{}: KES {:.2}{} avg across {} ({:.2} - {:.2})",
            self.commodity, self.average, unit, counties, self.min, self.max
        )
    }
}

/// A recorded replacement of the price table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RefreshInfo {
    /// Local time of the fetch ("YYYY-MM-DD HH:MM").
    pub fetched_at: String,
    pub source: String,
    pub record_count: i64,
}
