//! Category Counts Module
//! Value counts and two-way grouped counts behind the bar charts.

use crate::data::columns::{string_values, DEPARTMENT, RACE, SEX};
use crate::stats::error::{require_column, AnalyticsError};
use polars::prelude::*;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Number of rows carrying one category value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Counts of `category` values split by `group` values.
/// `counts[g][c]` is the number of rows with group `groups[g]` and category `categories[c]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupedCounts {
    pub category_column: String,
    pub group_column: String,
    pub categories: Vec<String>,
    pub groups: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

impl GroupedCounts {
    pub fn max_count(&self) -> usize {
        self.counts
            .iter()
            .flat_map(|row| row.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

/// Gender and race make-up of one department.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentDiversity {
    pub department: String,
    pub headcount: usize,
    pub gender: Vec<CategoryCount>,
    pub race: Vec<CategoryCount>,
}

pub struct CountCalculator;

impl CountCalculator {
    /// Count rows per non-null value of `column`.
    ///
    /// Sorted by count; ties are ordered by label so the result is stable.
    /// With `ascending` the largest category comes last, which puts it at the
    /// top of a horizontal bar chart.
    pub fn value_counts(
        df: &DataFrame,
        column: &str,
        ascending: bool,
    ) -> Result<Vec<CategoryCount>, AnalyticsError> {
        require_column(df, column)?;

        let mut tally: BTreeMap<String, usize> = BTreeMap::new();
        for value in string_values(df, column)?.into_iter().flatten() {
            *tally.entry(value).or_insert(0) += 1;
        }

        let mut counts: Vec<CategoryCount> = tally
            .into_iter()
            .map(|(label, count)| CategoryCount { label, count })
            .collect();

        counts.sort_by(|a, b| {
            let by_count = if ascending {
                a.count.cmp(&b.count)
            } else {
                b.count.cmp(&a.count)
            };
            by_count.then_with(|| a.label.cmp(&b.label))
        });

        Ok(counts)
    }

    /// Two-way counts, zero-filled. Rows with a null in either column are skipped.
    pub fn grouped_counts(
        df: &DataFrame,
        category_column: &str,
        group_column: &str,
    ) -> Result<GroupedCounts, AnalyticsError> {
        require_column(df, category_column)?;
        require_column(df, group_column)?;

        let categories_raw = string_values(df, category_column)?;
        let groups_raw = string_values(df, group_column)?;

        let pairs: Vec<(String, String)> = categories_raw
            .into_iter()
            .zip(groups_raw)
            .filter_map(|(c, g)| Some((c?, g?)))
            .collect();

        let categories: Vec<String> = pairs
            .iter()
            .map(|(c, _)| c.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let groups: Vec<String> = pairs
            .iter()
            .map(|(_, g)| g.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut counts = vec![vec![0usize; categories.len()]; groups.len()];
        for (c, g) in &pairs {
            // both indices exist: the vectors were built from these pairs
            if let (Ok(ci), Ok(gi)) = (categories.binary_search(c), groups.binary_search(g)) {
                counts[gi][ci] += 1;
            }
        }

        Ok(GroupedCounts {
            category_column: category_column.to_string(),
            group_column: group_column.to_string(),
            categories,
            groups,
            counts,
        })
    }

    /// Rows whose `column` equals `value` after trimming.
    pub fn filter_equals(
        df: &DataFrame,
        column: &str,
        value: &str,
    ) -> Result<DataFrame, AnalyticsError> {
        require_column(df, column)?;

        let mask: BooleanChunked = string_values(df, column)?
            .iter()
            .map(|v| v.as_deref() == Some(value))
            .collect();

        Ok(df.filter(&mask)?)
    }

    /// Gender and race counts for every department, computed in parallel.
    /// Sorted by department name.
    pub fn diversity_by_department(
        df: &DataFrame,
    ) -> Result<Vec<DepartmentDiversity>, AnalyticsError> {
        require_column(df, DEPARTMENT)?;
        require_column(df, SEX)?;
        require_column(df, RACE)?;

        let departments: BTreeSet<String> = string_values(df, DEPARTMENT)?
            .into_iter()
            .flatten()
            .collect();

        let departments: Vec<String> = departments.into_iter().collect();
        departments
            .par_iter()
            .map(|department| -> Result<DepartmentDiversity, AnalyticsError> {
                let dept_df = Self::filter_equals(df, DEPARTMENT, department)?;
                Ok(DepartmentDiversity {
                    department: department.clone(),
                    headcount: dept_df.height(),
                    gender: Self::value_counts(&dept_df, SEX, false)?,
                    race: Self::value_counts(&dept_df, RACE, false)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::columns::EMPLOYEE_SOURCE;

    fn sample() -> DataFrame {
        df!(
            EMPLOYEE_SOURCE => &[
                Some("Referral"), Some("Indeed"), Some("Referral"), Some("Website"),
                Some("Indeed"), Some("Referral"), None,
            ],
            DEPARTMENT => &[
                Some("Sales"), Some("Production"), Some("Production"), Some("Sales"),
                Some("Production"), Some("IT/IS"), Some("Sales"),
            ],
            SEX => &["Female", "Male", "Female", "Female", "Male", "Male", "Female"],
            RACE => &["White", "Asian", "White", "Black", "White", "White", "Asian"],
        )
        .unwrap()
    }

    fn labels(counts: &[CategoryCount]) -> Vec<(&str, usize)> {
        counts.iter().map(|c| (c.label.as_str(), c.count)).collect()
    }

    #[test]
    fn value_counts_ascending_puts_largest_last() {
        let counts = CountCalculator::value_counts(&sample(), EMPLOYEE_SOURCE, true).unwrap();
        assert_eq!(
            labels(&counts),
            vec![("Website", 1), ("Indeed", 2), ("Referral", 3)]
        );
    }

    #[test]
    fn value_counts_descending_breaks_ties_by_label() {
        let counts = CountCalculator::value_counts(&sample(), SEX, false).unwrap();
        assert_eq!(labels(&counts), vec![("Female", 4), ("Male", 3)]);

        let counts = CountCalculator::value_counts(&sample(), RACE, false).unwrap();
        assert_eq!(
            labels(&counts),
            vec![("White", 4), ("Asian", 2), ("Black", 1)]
        );
    }

    #[test]
    fn value_counts_missing_column() {
        let err = CountCalculator::value_counts(&sample(), "Position", true).unwrap_err();
        assert!(matches!(err, AnalyticsError::MissingColumn(ref c) if c == "Position"));
    }

    #[test]
    fn grouped_counts_are_zero_filled() {
        let grouped =
            CountCalculator::grouped_counts(&sample(), EMPLOYEE_SOURCE, DEPARTMENT).unwrap();

        assert_eq!(grouped.categories, vec!["Indeed", "Referral", "Website"]);
        assert_eq!(grouped.groups, vec!["IT/IS", "Production", "Sales"]);
        assert_eq!(
            grouped.counts,
            vec![vec![0, 1, 0], vec![2, 1, 0], vec![0, 1, 1]]
        );
        assert_eq!(grouped.max_count(), 2);
        // the row with no source is skipped
        assert_eq!(grouped.counts.iter().flatten().sum::<usize>(), 6);
    }

    #[test]
    fn filter_equals_keeps_matching_rows() {
        let sales = CountCalculator::filter_equals(&sample(), DEPARTMENT, "Sales").unwrap();
        assert_eq!(sales.height(), 3);
    }

    #[test]
    fn diversity_per_department() {
        let diversity = CountCalculator::diversity_by_department(&sample()).unwrap();
        let names: Vec<&str> = diversity.iter().map(|d| d.department.as_str()).collect();
        assert_eq!(names, vec!["IT/IS", "Production", "Sales"]);

        let production = &diversity[1];
        assert_eq!(production.headcount, 3);
        assert_eq!(labels(&production.gender), vec![("Male", 2), ("Female", 1)]);
        assert_eq!(labels(&production.race), vec![("White", 2), ("Asian", 1)]);
    }
}
