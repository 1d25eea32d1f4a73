//! Date parsing for the hire / termination columns.

use crate::data::columns::string_values;
use chrono::NaiveDate;
use polars::prelude::*;

const DATE_FORMATS: [&str; 4] = ["%m/%d/%Y", "%Y-%m-%d", "%m/%d/%y", "%d-%b-%Y"];

/// Parse a single date cell, trying each supported format in order.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    // "7/5/2011 0:00" style exports carry a time part
    let date_part = raw.split_whitespace().next().unwrap_or(raw);

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Dates parsed from one column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDates {
    pub dates: Vec<NaiveDate>,
    /// Non-empty cells that matched no format.
    pub invalid: usize,
}

/// Parse every non-empty cell of `column`. Empty cells are skipped silently.
pub fn parse_date_column(df: &DataFrame, column: &str) -> PolarsResult<ParsedDates> {
    let mut parsed = ParsedDates::default();
    for cell in string_values(df, column)?.into_iter().flatten() {
        match parse_date(&cell) {
            Some(date) => parsed.dates.push(date),
            None => parsed.invalid += 1,
        }
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_supported_formats() {
        assert_eq!(parse_date("7/5/2011"), Some(ymd(2011, 7, 5)));
        assert_eq!(parse_date("2011-07-05"), Some(ymd(2011, 7, 5)));
        assert_eq!(parse_date("05-Jul-2011"), Some(ymd(2011, 7, 5)));
        assert_eq!(parse_date(" 10/26/2015 0:00 "), Some(ymd(2015, 10, 26)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("N/A"), None);
        assert_eq!(parse_date("13/45/2011"), None);
    }

    #[test]
    fn column_parse_counts_invalid_cells() {
        let df = df!(
            "Date of Termination" => &[Some("1/1/2015"), None, Some("soon"), Some("2016-03-01")],
        )
        .unwrap();

        let parsed = parse_date_column(&df, "Date of Termination").unwrap();
        assert_eq!(parsed.dates, vec![ymd(2015, 1, 1), ymd(2016, 3, 1)]);
        assert_eq!(parsed.invalid, 1);
    }
}
