//! Column names of the HR data set and helpers to read them.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

pub const EMPLOYEE_SOURCE: &str = "Employee Source";
pub const DEPARTMENT: &str = "Department";
pub const STATE: &str = "State";
pub const SEX: &str = "Sex";
pub const RACE: &str = "RaceDesc";
pub const DATE_OF_HIRE: &str = "Date of Hire";
pub const DATE_OF_TERMINATION: &str = "Date of Termination";
pub const EMPLOYMENT_STATUS: &str = "Employment Status";

/// Columns without which the dashboard cannot be built.
pub const REQUIRED_COLUMNS: [&str; 3] = [EMPLOYEE_SOURCE, DEPARTMENT, DATE_OF_HIRE];

/// Category offered by the "Filter by" dropdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterDimension {
    #[default]
    Department,
    Location,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 2] = [FilterDimension::Department, FilterDimension::Location];

    /// Column backing this dimension.
    pub fn column(self) -> &'static str {
        match self {
            FilterDimension::Department => DEPARTMENT,
            FilterDimension::Location => STATE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterDimension::Department => "Department",
            FilterDimension::Location => "Location",
        }
    }
}

pub fn has_column(df: &DataFrame, column: &str) -> bool {
    df.get_column_names().iter().any(|name| name.as_str() == column)
}

/// Read a column as trimmed strings whatever dtype the CSV reader inferred.
/// Empty cells come back as `None`.
pub fn string_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<Option<String>>> {
    let series = df
        .column(column)?
        .as_materialized_series()
        .cast(&DataType::String)?;

    Ok(series
        .str()?
        .into_iter()
        .map(|v| {
            v.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_values_trims_and_drops_empty_cells() {
        let df = df!(
            DEPARTMENT => &[Some(" Sales "), Some(""), None, Some("IT/IS")],
        )
        .unwrap();

        let values = string_values(&df, DEPARTMENT).unwrap();
        assert_eq!(
            values,
            vec![Some("Sales".to_string()), None, None, Some("IT/IS".to_string())]
        );
    }

    #[test]
    fn string_values_casts_numeric_columns() {
        let df = df!("Zip" => &[1013i64, 2450]).unwrap();
        let values = string_values(&df, "Zip").unwrap();
        assert_eq!(values, vec![Some("1013".to_string()), Some("2450".to_string())]);
    }

    #[test]
    fn location_dimension_reads_state_column() {
        assert_eq!(FilterDimension::Location.column(), STATE);
        assert_eq!(FilterDimension::Department.column(), DEPARTMENT);
        assert!(has_column(&df!(STATE => &["MA"]).unwrap(), STATE));
    }

    #[test]
    fn department_is_the_default_dimension() {
        assert_eq!(FilterDimension::default(), FilterDimension::Department);
    }
}
