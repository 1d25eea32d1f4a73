//! Employee CSV Loader Module
//! Loads the HR data set with Polars and checks it carries the columns the dashboard needs.

use crate::data::columns::{has_column, REQUIRED_COLUMNS};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("CSV file not found: {0}")]
    NotFound(PathBuf),
    #[error("Required column missing: {0}")]
    MissingColumn(String),
}

/// Holds the employee table once loaded. The table is never mutated afterwards.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Read and validate a CSV file without touching loader state.
    /// Used directly by the background loading thread.
    pub fn read_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }

        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        Self::validate(&df)?;
        info!(
            path = %file_path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded employee table"
        );
        Ok(df)
    }

    /// Check that every required column is present.
    pub fn validate(df: &DataFrame) -> Result<(), LoaderError> {
        for column in REQUIRED_COLUMNS {
            if !has_column(df, column) {
                return Err(LoaderError::MissingColumn(column.to_string()));
            }
        }
        debug!("all required columns present");
        Ok(())
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Distinct non-null values of a column, sorted.
    pub fn get_unique_values(&self, column: &str) -> Vec<String> {
        let Some(df) = &self.df else {
            return Vec::new();
        };

        let mut values: Vec<String> = crate::data::columns::string_values(df, column)
            .map(|cells| cells.into_iter().flatten().collect())
            .unwrap_or_default();
        values.sort();
        values.dedup();
        values
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Set DataFrame directly (used for background loading)
    pub fn set_dataframe(&mut self, df: DataFrame, file_path: PathBuf) {
        self.df = Some(df);
        self.file_path = Some(file_path);
    }
}
