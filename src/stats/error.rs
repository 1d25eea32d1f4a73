use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column not found: {0}")]
    MissingColumn(String),
}

/// Fail early with a readable message instead of a Polars column error.
pub(crate) fn require_column(
    df: &polars::prelude::DataFrame,
    column: &str,
) -> Result<(), AnalyticsError> {
    if crate::data::columns::has_column(df, column) {
        Ok(())
    } else {
        Err(AnalyticsError::MissingColumn(column.to_string()))
    }
}
