//! Everything the dashboard tabs display, computed in one pass over the table.

use crate::data::columns::{DEPARTMENT, EMPLOYEE_SOURCE, RACE, SEX};
use crate::data::FilterDimension;
use crate::stats::counts::{CategoryCount, CountCalculator, DepartmentDiversity, GroupedCounts};
use crate::stats::error::AnalyticsError;
use crate::stats::headcount::{AttritionRate, HeadcountCalculator, HeadcountSeries};
use crate::stats::summary::WorkforceSummary;
use polars::prelude::*;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct DashboardData {
    /// Recruitment source counts, ascending.
    pub sources: Vec<CategoryCount>,
    pub dimension: FilterDimension,
    pub sources_by_dimension: Option<GroupedCounts>,
    pub gender_by_department: Option<GroupedCounts>,
    pub race_by_department: Option<GroupedCounts>,
    pub diversity: Vec<DepartmentDiversity>,
    pub headcount: HeadcountSeries,
    pub attrition_window_months: u32,
    pub attrition: Option<AttritionRate>,
    pub monthly_attrition: Vec<AttritionRate>,
    pub terminations: Vec<chrono::NaiveDate>,
    pub summary: WorkforceSummary,
    /// Views that could not be built, e.g. because an optional column is absent.
    pub warnings: Vec<String>,
}

impl DashboardData {
    /// Build every view. Only the recruitment source counts, the date columns and the
    /// summary are mandatory; the other views are dropped with a warning when they fail.
    pub fn compute(
        df: &DataFrame,
        dimension: FilterDimension,
        attrition_window_months: u32,
    ) -> Result<Self, AnalyticsError> {
        let mut warnings = Vec::new();

        let sources = CountCalculator::value_counts(df, EMPLOYEE_SOURCE, true)?;
        let sources_by_dimension = optional(
            CountCalculator::grouped_counts(df, EMPLOYEE_SOURCE, dimension.column()),
            &mut warnings,
        );
        let gender_by_department =
            optional(CountCalculator::grouped_counts(df, DEPARTMENT, SEX), &mut warnings);
        let race_by_department =
            optional(CountCalculator::grouped_counts(df, DEPARTMENT, RACE), &mut warnings);
        let diversity =
            optional(CountCalculator::diversity_by_department(df), &mut warnings).unwrap_or_default();

        let dates = HeadcountCalculator::from_frame(df)?;
        if dates.invalid > 0 {
            warnings.push(format!("{} dates could not be parsed", dates.invalid));
        }
        let headcount = HeadcountCalculator::daily_headcount(&dates.hires, &dates.terminations);
        let attrition = HeadcountCalculator::latest_attrition(
            &headcount,
            &dates.terminations,
            attrition_window_months,
        );
        let monthly_attrition =
            HeadcountCalculator::monthly_attrition(&headcount, &dates.terminations);

        let summary = WorkforceSummary::compute(df)?;

        // one missing column can disable several views
        let mut seen = std::collections::HashSet::new();
        warnings.retain(|w| seen.insert(w.clone()));

        info!(
            sources = sources.len(),
            departments = diversity.len(),
            days = headcount.len(),
            warnings = warnings.len(),
            "dashboard data computed"
        );

        Ok(Self {
            sources,
            dimension,
            sources_by_dimension,
            gender_by_department,
            race_by_department,
            diversity,
            headcount,
            attrition_window_months,
            attrition,
            monthly_attrition,
            terminations: dates.terminations,
            summary,
            warnings,
        })
    }

    /// Recompute the grouped recruitment chart for another dropdown value.
    pub fn set_dimension(
        &mut self,
        df: &DataFrame,
        dimension: FilterDimension,
    ) -> Result<(), AnalyticsError> {
        self.sources_by_dimension = Some(CountCalculator::grouped_counts(
            df,
            EMPLOYEE_SOURCE,
            dimension.column(),
        )?);
        self.dimension = dimension;
        Ok(())
    }

    /// Recompute the headline attrition rate for another window length.
    pub fn set_attrition_window(&mut self, months: u32) {
        self.attrition_window_months = months;
        self.attrition =
            HeadcountCalculator::latest_attrition(&self.headcount, &self.terminations, months);
    }

    /// Bring the data in line with the current control values. Used when a
    /// background computation finishes after the user changed a control.
    pub fn sync_settings(
        &mut self,
        df: &DataFrame,
        dimension: FilterDimension,
        attrition_window_months: u32,
    ) -> Result<(), AnalyticsError> {
        if self.attrition_window_months != attrition_window_months {
            self.set_attrition_window(attrition_window_months);
        }
        if self.dimension != dimension {
            // keep the chart title consistent with the dropdown even when the column is absent
            self.dimension = dimension;
            self.sources_by_dimension = None;
            self.set_dimension(df, dimension)?;
        }
        Ok(())
    }

    pub fn department(&self, name: &str) -> Option<&DepartmentDiversity> {
        self.diversity.iter().find(|d| d.department == name)
    }
}

fn optional<T>(result: Result<T, AnalyticsError>, warnings: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, "dashboard view unavailable");
            warnings.push(e.to_string());
            None
        }
    }
}
