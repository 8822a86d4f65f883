use crate::error::{PriceError, Result};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};

/// Embedded CSV of Kenya's 47 counties.
pub static CSV_OBJECT: &str = include_str!("../../fixtures/counties.csv");

/// A Kenyan county with its official code.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct County {
    /// Official county code, 1 (Mombasa) through 47 (Nairobi)
    pub code: u8,
    pub name: String,
    /// Province the county belonged to before 2013
    pub former_province: String,
}

/// Fold a county name for comparison: lowercase, drop spaces, hyphens and apostrophes.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(*c, ' ' | '-' | '\'' | '\u{2019}'))
        .flat_map(char::to_lowercase)
        .collect()
}

impl County {
    /// Get the county vector from the embedded CSV.
    pub fn get_county_vector() -> Result<Vec<County>> {
        County::parse_county_csv(CSV_OBJECT)
    }

    /// Find a county by name, ignoring case, spaces, hyphens and apostrophes.
    pub fn find(name: &str) -> Result<Option<County>> {
        let wanted = normalize_name(name);
        Ok(County::get_county_vector()?
            .into_iter()
            .find(|c| normalize_name(&c.name) == wanted))
    }

    /// Parse a CSV string of county data into a vector of Counties.
    ///
    /// Expected CSV columns: code, name, former_province
    pub fn parse_county_csv(csv_object: &str) -> Result<Vec<County>> {
        let mut county_list: Vec<County> = Vec::new();
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .from_reader(csv_object.as_bytes());
        for row in rdr.records() {
            let rho = row?;
            let code = rho
                .get(0)
                .and_then(|s| s.trim().parse::<u8>().ok())
                .ok_or_else(|| PriceError::InvalidCounty(format!("{:?}", rho)))?;
            let name = rho
                .get(1)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| PriceError::InvalidCounty(format!("{:?}", rho)))?;
            let former_province = rho.get(2).unwrap_or("").trim().to_string();
            county_list.push(County {
                code,
                name,
                former_province,
            });
        }
        Ok(county_list)
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_name, County};

    #[test]
    fn test_county_vector() {
        let counties = County::get_county_vector().unwrap();
        assert_eq!(counties.len(), 47);
        assert_eq!(counties[0].name, "Mombasa");
        assert_eq!(counties[46].name, "Nairobi");
        let codes: Vec<u8> = counties.iter().map(|c| c.code).collect();
        assert_eq!(codes, (1..=47).collect::<Vec<u8>>());
    }

    #[test]
    fn test_find_ignores_punctuation_and_case() {
        let muranga = County::find("MURANGA").unwrap().unwrap();
        assert_eq!(muranga.code, 21);
        assert_eq!(County::find("taita taveta").unwrap().unwrap().code, 6);
        assert_eq!(County::find("Uasin-Gishu").unwrap().unwrap().code, 27);
        assert!(County::find("Atlantis").unwrap().is_none());
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Murang'a"), "muranga");
        assert_eq!(normalize_name("Homa Bay"), "homabay");
    }

    #[test]
    fn test_parse_rejects_bad_code() {
        let csv = "CODE,NAME,FORMER PROVINCE\nx,Nowhere,None\n";
        assert!(County::parse_county_csv(csv).is_err());
    }
}
