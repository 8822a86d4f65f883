//! Shared utility functions for Soko crates.

pub mod cache;
pub mod monitor;

/// Date utility functions
pub mod dates {
    use chrono::{NaiveDate, NaiveDateTime};

    /// Formats accepted by [`parse_date_flexible`], tried in order.
    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y%m%d", "%d/%m/%Y", "%d-%b-%Y"];

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Format a timestamp as "YYYY-MM-DD HH:MM"
    pub fn format_timestamp(at: &NaiveDateTime) -> String {
        at.format("%Y-%m-%d %H:%M").to_string()
    }

    /// Parse an upstream display date.
    ///
    /// Accepts "YYYY-MM-DD", "YYYYMMDD", "DD/MM/YYYY" and "DD-Mon-YYYY".
    /// A trailing time component after a space is ignored.
    pub fn parse_date_flexible(s: &str) -> Option<NaiveDate> {
        let day_part = s.split_whitespace().next()?;
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(day_part, fmt).ok())
    }

    /// Latest parsable date among `dates`, ignoring unparsable entries.
    pub fn latest_date<'a, I>(dates: I) -> Option<NaiveDate>
    where
        I: IntoIterator<Item = &'a str>,
    {
        dates.into_iter().filter_map(parse_date_flexible).max()
    }

}
