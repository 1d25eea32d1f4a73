//! Workforce Summary Module
//! Headline figures for the Workforce tab.

use crate::data::columns::{
    has_column, string_values, DATE_OF_HIRE, DATE_OF_TERMINATION, EMPLOYMENT_STATUS,
};
use crate::data::dates::parse_date;
use crate::stats::counts::{CategoryCount, CountCalculator};
use crate::stats::error::{require_column, AnalyticsError};
use chrono::NaiveDate;
use polars::prelude::*;
use statrs::statistics::{Data, Median, Statistics};

const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone, PartialEq)]
pub struct WorkforceSummary {
    pub total: usize,
    pub active: usize,
    pub terminated: usize,
    /// Tenure in years; NaN when no hire date could be parsed.
    pub mean_tenure_years: f64,
    pub median_tenure_years: f64,
    /// Latest hire or termination date in the table, used as "today" for active staff.
    pub as_of: Option<NaiveDate>,
    /// Present only when the table carries an employment status column.
    pub by_status: Vec<CategoryCount>,
}

impl WorkforceSummary {
    pub fn compute(df: &DataFrame) -> Result<Self, AnalyticsError> {
        require_column(df, DATE_OF_HIRE)?;

        let hires: Vec<Option<NaiveDate>> = string_values(df, DATE_OF_HIRE)?
            .iter()
            .map(|cell| cell.as_deref().and_then(parse_date))
            .collect();
        // a filled termination cell marks the row terminated even when the date is unreadable
        let termination_cells: Vec<Option<String>> = if has_column(df, DATE_OF_TERMINATION) {
            string_values(df, DATE_OF_TERMINATION)?
        } else {
            vec![None; df.height()]
        };
        let terminations: Vec<Option<NaiveDate>> = termination_cells
            .iter()
            .map(|cell| cell.as_deref().and_then(parse_date))
            .collect();

        let as_of = hires.iter().chain(terminations.iter()).flatten().max().copied();
        let terminated = termination_cells.iter().filter(|t| t.is_some()).count();

        let tenures: Vec<f64> = match as_of {
            Some(as_of) => hires
                .iter()
                .zip(termination_cells.iter().zip(terminations.iter()))
                .filter_map(|(hire, (cell, term))| {
                    let hire = (*hire)?;
                    let end = match (cell, term) {
                        (None, _) => as_of,
                        (Some(_), Some(date)) => *date,
                        // terminated on an unknown date: no tenure
                        (Some(_), None) => return None,
                    };
                    Some((end - hire).num_days().max(0) as f64 / DAYS_PER_YEAR)
                })
                .collect(),
            None => Vec::new(),
        };

        let (mean_tenure_years, median_tenure_years) = if tenures.is_empty() {
            (f64::NAN, f64::NAN)
        } else {
            (tenures.iter().mean(), Data::new(tenures.clone()).median())
        };

        let by_status = if has_column(df, EMPLOYMENT_STATUS) {
            CountCalculator::value_counts(df, EMPLOYMENT_STATUS, false)?
        } else {
            Vec::new()
        };

        Ok(Self {
            total: df.height(),
            active: df.height() - terminated,
            terminated,
            mean_tenure_years,
            median_tenure_years,
            as_of,
            by_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_active_and_terminated() {
        let df = df!(
            DATE_OF_HIRE => &["1/1/2018", "1/1/2019", "1/1/2020"],
            DATE_OF_TERMINATION => &[None, Some("1/1/2020"), None],
            EMPLOYMENT_STATUS => &["Active", "Voluntarily Terminated", "Active"],
        )
        .unwrap();

        let summary = WorkforceSummary::compute(&df).unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.active, 2);
        assert_eq!(summary.terminated, 1);
        assert_eq!(summary.as_of, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(summary.by_status[0].label, "Active");
        assert_eq!(summary.by_status[0].count, 2);
    }

    #[test]
    fn tenure_is_measured_to_termination_or_latest_date() {
        // tenures: 730 days, 365 days, 0 days
        let df = df!(
            DATE_OF_HIRE => &["1/1/2018", "1/1/2019", "1/1/2020"],
            DATE_OF_TERMINATION => &[None, Some("1/1/2020"), None],
        )
        .unwrap();

        let summary = WorkforceSummary::compute(&df).unwrap();
        let expected_mean = (730.0 + 365.0 + 0.0) / 3.0 / DAYS_PER_YEAR;
        assert!((summary.mean_tenure_years - expected_mean).abs() < 1e-9);
        assert!((summary.median_tenure_years - 365.0 / DAYS_PER_YEAR).abs() < 1e-9);
        assert!(summary.by_status.is_empty());
    }

    #[test]
    fn unreadable_termination_date_still_counts_as_terminated() {
        let df = df!(
            DATE_OF_HIRE => &["1/1/2018", "1/1/2019", "1/1/2020"],
            DATE_OF_TERMINATION => &[None, Some("sometime in 2019"), None],
        )
        .unwrap();

        let summary = WorkforceSummary::compute(&df).unwrap();
        assert_eq!(summary.active, 2);
        assert_eq!(summary.terminated, 1);
        // tenures 730 and 0 days; the row with no usable end date is left out
        let expected_mean = 730.0 / 2.0 / DAYS_PER_YEAR;
        assert!((summary.mean_tenure_years - expected_mean).abs() < 1e-9);
    }

    #[test]
    fn no_dates_gives_nan_tenure() {
        let df = df!(DATE_OF_HIRE => &[Option::<&str>::None]).unwrap();
        let summary = WorkforceSummary::compute(&df).unwrap();
        assert_eq!(summary.total, 1);
        assert!(summary.mean_tenure_years.is_nan());
        assert_eq!(summary.as_of, None);
    }
}
