//! Headcount & Attrition Module
//! Daily cumulative headcount and trailing-window attrition rate.

use crate::data::columns::{has_column, DATE_OF_HIRE, DATE_OF_TERMINATION};
use crate::data::dates::parse_date_column;
use crate::stats::error::{require_column, AnalyticsError};
use chrono::{Datelike, Months, NaiveDate};
use polars::prelude::*;
use tracing::{debug, warn};

/// Hire and termination dates pulled from the employee table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmploymentDates {
    pub hires: Vec<NaiveDate>,
    pub terminations: Vec<NaiveDate>,
    /// Cells in either date column that could not be parsed.
    pub invalid: usize,
}

/// Active employees per calendar day, starting at `start`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadcountSeries {
    pub start: NaiveDate,
    pub values: Vec<i64>,
}

impl HeadcountSeries {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn end(&self) -> Option<NaiveDate> {
        let last = self.values.len().checked_sub(1)?;
        self.start.checked_add_days(chrono::Days::new(last as u64))
    }

    /// Headcount on `date`: zero before the series starts, the final value after it ends.
    pub fn at(&self, date: NaiveDate) -> i64 {
        let Some(&last) = self.values.last() else {
            return 0;
        };
        if date < self.start {
            return 0;
        }
        let offset = (date - self.start).num_days() as usize;
        self.values.get(offset).copied().unwrap_or(last)
    }

    /// (date, headcount) pairs.
    pub fn points(&self) -> impl Iterator<Item = (NaiveDate, i64)> + '_ {
        self.start
            .iter_days()
            .zip(self.values.iter().copied())
    }
}

/// Attrition over one trailing window.
#[derive(Debug, Clone, PartialEq)]
pub struct AttritionRate {
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub terminations: usize,
    pub start_headcount: i64,
    pub end_headcount: i64,
    /// `None` when the average headcount over the window is zero.
    pub rate: Option<f64>,
}

impl AttritionRate {
    pub fn average_headcount(&self) -> f64 {
        (self.start_headcount + self.end_headcount) as f64 / 2.0
    }
}

pub struct HeadcountCalculator;

impl HeadcountCalculator {
    /// Extract hire and termination dates. The termination column is optional.
    pub fn from_frame(df: &DataFrame) -> Result<EmploymentDates, AnalyticsError> {
        require_column(df, DATE_OF_HIRE)?;

        let hires = parse_date_column(df, DATE_OF_HIRE)?;
        let terminations = if has_column(df, DATE_OF_TERMINATION) {
            parse_date_column(df, DATE_OF_TERMINATION)?
        } else {
            Default::default()
        };

        let invalid = hires.invalid + terminations.invalid;
        if invalid > 0 {
            warn!(invalid, "skipped unparseable hire/termination dates");
        }
        debug!(
            hires = hires.dates.len(),
            terminations = terminations.dates.len(),
            "parsed employment dates"
        );

        Ok(EmploymentDates {
            hires: hires.dates,
            terminations: terminations.dates,
            invalid,
        })
    }

    /// Per-day hires minus per-day terminations over the whole date range,
    /// zero-filled, then cumulatively summed.
    pub fn daily_headcount(hires: &[NaiveDate], terminations: &[NaiveDate]) -> HeadcountSeries {
        let all = hires.iter().chain(terminations.iter());
        let (Some(&start), Some(&end)) = (all.clone().min(), all.max()) else {
            return HeadcountSeries::default();
        };

        let days = (end - start).num_days() as usize + 1;
        let mut delta = vec![0i64; days];
        for &date in hires {
            delta[(date - start).num_days() as usize] += 1;
        }
        for &date in terminations {
            delta[(date - start).num_days() as usize] -= 1;
        }

        let values = delta
            .into_iter()
            .scan(0i64, |running, d| {
                *running += d;
                Some(*running)
            })
            .collect();

        HeadcountSeries { start, values }
    }

    /// Terminations in `(window_end - months, window_end]` divided by the mean of
    /// headcount at the window's start and end.
    pub fn attrition_rate(
        series: &HeadcountSeries,
        terminations: &[NaiveDate],
        window_end: NaiveDate,
        months: u32,
    ) -> AttritionRate {
        let window_start = window_end
            .checked_sub_months(Months::new(months))
            .unwrap_or(window_end);
        Self::window_rate(series, terminations, window_start, window_end)
    }

    /// Terminations in `(window_start, window_end]` over the mean of the headcount
    /// on both bounds.
    pub fn window_rate(
        series: &HeadcountSeries,
        terminations: &[NaiveDate],
        window_start: NaiveDate,
        window_end: NaiveDate,
    ) -> AttritionRate {
        let count = terminations
            .iter()
            .filter(|&&d| d > window_start && d <= window_end)
            .count();

        let start_headcount = series.at(window_start);
        let end_headcount = series.at(window_end);
        let average = (start_headcount + end_headcount) as f64 / 2.0;

        AttritionRate {
            window_start,
            window_end,
            terminations: count,
            start_headcount,
            end_headcount,
            rate: (average > 0.0).then(|| count as f64 / average),
        }
    }

    /// Attrition over the trailing window ending on the last day of the series.
    pub fn latest_attrition(
        series: &HeadcountSeries,
        terminations: &[NaiveDate],
        months: u32,
    ) -> Option<AttritionRate> {
        let end = series.end()?;
        Some(Self::attrition_rate(series, terminations, end, months))
    }

    /// Attrition per calendar month the series covers: each window runs from the
    /// previous month end to this month end, so no termination lands in two windows.
    /// The final window stops at the series end when it falls mid-month.
    pub fn monthly_attrition(
        series: &HeadcountSeries,
        terminations: &[NaiveDate],
    ) -> Vec<AttritionRate> {
        let Some(end) = series.end() else {
            return Vec::new();
        };

        let mut rates = Vec::new();
        let mut month = NaiveDate::from_ymd_opt(series.start.year(), series.start.month(), 1);
        while let Some(first) = month {
            if first > end {
                break;
            }
            let next = first.checked_add_months(Months::new(1));
            let month_end = next.and_then(|n| n.pred_opt()).unwrap_or(end).min(end);
            let previous_end = first.pred_opt().unwrap_or(first);
            rates.push(Self::window_rate(series, terminations, previous_end, month_end));
            month = next;
        }
        rates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Four hires on Jan 1, one on Jan 15; leavers on Jan 20 and Feb 10.
    fn fixture() -> (Vec<NaiveDate>, Vec<NaiveDate>) {
        let hires = vec![
            ymd(2020, 1, 1),
            ymd(2020, 1, 1),
            ymd(2020, 1, 1),
            ymd(2020, 1, 1),
            ymd(2020, 1, 15),
        ];
        let terms = vec![ymd(2020, 1, 20), ymd(2020, 2, 10)];
        (hires, terms)
    }

    #[test]
    fn headcount_is_cumulative_and_zero_filled() {
        let (hires, terms) = fixture();
        let series = HeadcountCalculator::daily_headcount(&hires, &terms);

        assert_eq!(series.start, ymd(2020, 1, 1));
        assert_eq!(series.end(), Some(ymd(2020, 2, 10)));
        assert_eq!(series.len(), 41);
        assert_eq!(series.at(ymd(2020, 1, 14)), 4);
        assert_eq!(series.at(ymd(2020, 1, 15)), 5);
        assert_eq!(series.at(ymd(2020, 1, 19)), 5);
        assert_eq!(series.at(ymd(2020, 1, 20)), 4);
        assert_eq!(series.at(ymd(2020, 2, 9)), 4);
        assert_eq!(series.at(ymd(2020, 2, 10)), 3);
    }

    #[test]
    fn headcount_outside_range() {
        let (hires, terms) = fixture();
        let series = HeadcountCalculator::daily_headcount(&hires, &terms);
        assert_eq!(series.at(ymd(2019, 12, 31)), 0);
        assert_eq!(series.at(ymd(2021, 6, 1)), 3);
    }

    #[test]
    fn empty_input_gives_empty_series() {
        let series = HeadcountCalculator::daily_headcount(&[], &[]);
        assert!(series.is_empty());
        assert_eq!(series.end(), None);
        assert_eq!(series.at(ymd(2020, 1, 1)), 0);
        assert!(HeadcountCalculator::latest_attrition(&series, &[], 1).is_none());
        assert!(HeadcountCalculator::monthly_attrition(&series, &[]).is_empty());
    }

    #[test]
    fn points_pair_dates_with_values() {
        let series = HeadcountCalculator::daily_headcount(&[ymd(2020, 3, 1)], &[ymd(2020, 3, 3)]);
        let points: Vec<_> = series.points().collect();
        assert_eq!(
            points,
            vec![(ymd(2020, 3, 1), 1), (ymd(2020, 3, 2), 1), (ymd(2020, 3, 3), 0)]
        );
    }

    #[test]
    fn trailing_month_attrition() {
        let (hires, terms) = fixture();
        let series = HeadcountCalculator::daily_headcount(&hires, &terms);
        let attrition = HeadcountCalculator::latest_attrition(&series, &terms, 1).unwrap();

        assert_eq!(attrition.window_start, ymd(2020, 1, 10));
        assert_eq!(attrition.window_end, ymd(2020, 2, 10));
        assert_eq!(attrition.terminations, 2);
        assert_eq!(attrition.start_headcount, 4);
        assert_eq!(attrition.end_headcount, 3);
        assert_eq!(attrition.average_headcount(), 3.5);
        let rate = attrition.rate.unwrap();
        assert!((rate - 2.0 / 3.5).abs() < 1e-12);
    }

    #[test]
    fn window_start_is_exclusive() {
        let (hires, terms) = fixture();
        let series = HeadcountCalculator::daily_headcount(&hires, &terms);
        // window (Jan 20, Feb 20]: the Jan 20 leaver falls outside
        let attrition =
            HeadcountCalculator::attrition_rate(&series, &terms, ymd(2020, 2, 20), 1);
        assert_eq!(attrition.terminations, 1);
        assert_eq!(attrition.start_headcount, 4);
        assert_eq!(attrition.end_headcount, 3);
    }

    #[test]
    fn zero_average_headcount_has_no_rate() {
        let series = HeadcountCalculator::daily_headcount(&[ymd(2020, 5, 1)], &[]);
        let attrition =
            HeadcountCalculator::attrition_rate(&series, &[], ymd(2020, 1, 31), 1);
        assert_eq!(attrition.average_headcount(), 0.0);
        assert_eq!(attrition.rate, None);
    }

    #[test]
    fn monthly_attrition_covers_each_month_end() {
        let (hires, terms) = fixture();
        let series = HeadcountCalculator::daily_headcount(&hires, &terms);
        let monthly = HeadcountCalculator::monthly_attrition(&series, &terms);

        let ends: Vec<NaiveDate> = monthly.iter().map(|a| a.window_end).collect();
        assert_eq!(ends, vec![ymd(2020, 1, 31), ymd(2020, 2, 10)]);

        // January: one leaver, headcount 0 on Dec 31 and 4 on Jan 31
        assert_eq!(monthly[0].terminations, 1);
        assert_eq!(monthly[0].rate, Some(0.5));
    }

    #[test]
    fn month_end_termination_lands_in_one_window() {
        let hires = vec![ymd(2020, 1, 1); 10];
        let terms = vec![ymd(2020, 3, 31), ymd(2020, 6, 30)];
        let series = HeadcountCalculator::daily_headcount(&hires, &terms);
        let monthly = HeadcountCalculator::monthly_attrition(&series, &terms);

        let windows: Vec<(NaiveDate, NaiveDate)> = monthly
            .iter()
            .map(|a| (a.window_start, a.window_end))
            .collect();
        assert_eq!(windows[3], (ymd(2020, 3, 31), ymd(2020, 4, 30)));

        let per_month: Vec<usize> = monthly.iter().map(|a| a.terminations).collect();
        assert_eq!(per_month, vec![0, 0, 1, 0, 0, 1]);
        assert_eq!(per_month.iter().sum::<usize>(), terms.len());

        // March: one leaver, 10 at the start, 9 at the end
        assert_eq!(monthly[2].rate, Some(1.0 / 9.5));
    }

    #[test]
    fn window_rate_uses_explicit_bounds() {
        let (hires, terms) = fixture();
        let series = HeadcountCalculator::daily_headcount(&hires, &terms);
        let attrition =
            HeadcountCalculator::window_rate(&series, &terms, ymd(2020, 1, 31), ymd(2020, 2, 10));
        assert_eq!(attrition.terminations, 1);
        assert_eq!(attrition.start_headcount, 4);
        assert_eq!(attrition.end_headcount, 3);
    }

    #[test]
    fn dates_from_frame() {
        let df = df!(
            DATE_OF_HIRE => &[Some("1/1/2020"), Some("1/15/2020"), Some("bad")],
            DATE_OF_TERMINATION => &[None, Some("2/10/2020"), None],
        )
        .unwrap();

        let dates = HeadcountCalculator::from_frame(&df).unwrap();
        assert_eq!(dates.hires, vec![ymd(2020, 1, 1), ymd(2020, 1, 15)]);
        assert_eq!(dates.terminations, vec![ymd(2020, 2, 10)]);
        assert_eq!(dates.invalid, 1);
    }

    #[test]
    fn termination_column_is_optional() {
        let df = df!(DATE_OF_HIRE => &["1/1/2020"]).unwrap();
        let dates = HeadcountCalculator::from_frame(&df).unwrap();
        assert!(dates.terminations.is_empty());
    }
}
